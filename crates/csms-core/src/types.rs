use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// HR officer at an institution; submits requests.
    Hro,
    /// Head of HR management; may review every request type.
    Hhrmd,
    /// HR management officer.
    Hrmo,
    /// Disciplinary officer.
    Do,
    Employee,
    /// Civil service commission secretary; records commission decisions.
    Cscs,
    /// HR responsible personnel; read-only view of one institution.
    Hrrp,
    /// Planning officer; read-only, system wide.
    Po,
    Admin,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::Hro,
            Role::Hhrmd,
            Role::Hrmo,
            Role::Do,
            Role::Employee,
            Role::Cscs,
            Role::Hrrp,
            Role::Po,
            Role::Admin,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hro => "HRO",
            Role::Hhrmd => "HHRMD",
            Role::Hrmo => "HRMO",
            Role::Do => "DO",
            Role::Employee => "EMPLOYEE",
            Role::Cscs => "CSCS",
            Role::Hrrp => "HRRP",
            Role::Po => "PO",
            Role::Admin => "ADMIN",
        }
    }

    /// Roles whose visibility is limited to their own institution.
    pub fn is_institution_scoped(self) -> bool {
        matches!(self, Role::Hro | Role::Hrrp)
    }

    /// Roles that can see every request and employee.
    pub fn is_system_wide(self) -> bool {
        matches!(self, Role::Admin | Role::Cscs | Role::Po | Role::Hhrmd)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::CsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::all()
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::error::CsmsError::InvalidRole(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Confirmation,
    Promotion,
    Lwop,
    CadreChange,
    Retirement,
    Resignation,
    ServiceExtension,
    Termination,
    Dismissal,
    Complaint,
}

impl RequestType {
    pub fn all() -> &'static [RequestType] {
        &[
            RequestType::Confirmation,
            RequestType::Promotion,
            RequestType::Lwop,
            RequestType::CadreChange,
            RequestType::Retirement,
            RequestType::Resignation,
            RequestType::ServiceExtension,
            RequestType::Termination,
            RequestType::Dismissal,
            RequestType::Complaint,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Confirmation => "confirmation",
            RequestType::Promotion => "promotion",
            RequestType::Lwop => "lwop",
            RequestType::CadreChange => "cadre-change",
            RequestType::Retirement => "retirement",
            RequestType::Resignation => "resignation",
            RequestType::ServiceExtension => "service-extension",
            RequestType::Termination => "termination",
            RequestType::Dismissal => "dismissal",
            RequestType::Complaint => "complaint",
        }
    }

    /// Full display name used on forms and notifications.
    pub fn label(self) -> &'static str {
        match self {
            RequestType::Confirmation => "Employee Confirmation",
            RequestType::Promotion => "Promotion",
            RequestType::Lwop => "Leave Without Pay (LWOP)",
            RequestType::CadreChange => "Change of Cadre",
            RequestType::Retirement => "Retirement",
            RequestType::Resignation => "Resignation (Employee)",
            RequestType::ServiceExtension => "Service Extension",
            RequestType::Termination => "Termination",
            RequestType::Dismissal => "Dismissal",
            RequestType::Complaint => "Complaints",
        }
    }

    /// Short name used in tracking tables and activity feeds.
    pub fn short_label(self) -> &'static str {
        match self {
            RequestType::Confirmation => "Confirmation",
            RequestType::Promotion => "Promotion",
            RequestType::Lwop => "LWOP",
            RequestType::CadreChange => "Change of Cadre",
            RequestType::Retirement => "Retirement",
            RequestType::Resignation => "Resignation",
            RequestType::ServiceExtension => "Service Extension",
            RequestType::Termination => "Termination",
            RequestType::Dismissal => "Dismissal",
            RequestType::Complaint => "Complaint",
        }
    }

    /// Dashboard page that manages this request type.
    pub fn href(self) -> &'static str {
        match self {
            RequestType::Confirmation => "/dashboard/confirmation",
            RequestType::Promotion => "/dashboard/promotion",
            RequestType::Lwop => "/dashboard/lwop",
            RequestType::CadreChange => "/dashboard/cadre-change",
            RequestType::Retirement => "/dashboard/retirement",
            RequestType::Resignation => "/dashboard/resignation",
            RequestType::ServiceExtension => "/dashboard/service-extension",
            RequestType::Termination | RequestType::Dismissal => "/dashboard/termination",
            RequestType::Complaint => "/dashboard/complaints",
        }
    }

    pub fn is_disciplinary(self) -> bool {
        matches!(
            self,
            RequestType::Termination | RequestType::Dismissal | RequestType::Complaint
        )
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = crate::error::CsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        RequestType::all()
            .iter()
            .copied()
            .find(|t| {
                t.as_str() == needle
                    || t.as_str().replace('-', "_") == needle
                    || t.label().eq_ignore_ascii_case(needle)
                    || t.short_label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| crate::error::CsmsError::InvalidRequestType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NotApplicable => "N/A",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// EmployeeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    OnProbation,
    Confirmed,
    OnLwop,
    Retired,
    Resigned,
    Terminated,
    Dismissed,
}

impl EmployeeStatus {
    /// True once the employee has left the service.
    pub fn is_separated(self) -> bool {
        matches!(
            self,
            EmployeeStatus::Retired
                | EmployeeStatus::Resigned
                | EmployeeStatus::Terminated
                | EmployeeStatus::Dismissed
        )
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmployeeStatus::OnProbation => "On Probation",
            EmployeeStatus::Confirmed => "Confirmed",
            EmployeeStatus::OnLwop => "On LWOP",
            EmployeeStatus::Retired => "Retired",
            EmployeeStatus::Resigned => "Resigned",
            EmployeeStatus::Terminated => "Terminated",
            EmployeeStatus::Dismissed => "Dismissed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

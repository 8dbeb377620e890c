use crate::config::Policy;
use crate::dates;
use crate::details::RequestDetails;
use crate::error::{CsmsError, Result};
use crate::institution::Institution;
use crate::paths;
use crate::store::{self, Record};
use crate::types::{EmployeeStatus, Gender, Role};
use crate::user::User;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// e.g. "Certificate of Secondary Education", "Bachelor Degree", "IPA".
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub zan_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zssf_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ministry: Option<String>,
    pub institution_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Employee {
    const DIR: &'static str = paths::EMPLOYEES_DIR;

    fn id(&self) -> &str {
        &self.id
    }

    fn not_found(id: &str) -> CsmsError {
        CsmsError::EmployeeNotFound(id.to_string())
    }
}

/// Input for `Employee::create`. `status` defaults to on probation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub zan_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub institution_id: String,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub zssf_number: Option<String>,
    #[serde(default)]
    pub payroll_number: Option<String>,
    #[serde(default)]
    pub cadre: Option<String>,
    #[serde(default)]
    pub salary_scale: Option<String>,
    #[serde(default)]
    pub ministry: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub employment_date: Option<NaiveDate>,
    #[serde(default)]
    pub confirmation_date: Option<NaiveDate>,
    #[serde(default)]
    pub retirement_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrgentActions {
    pub probation_overdue: Vec<Employee>,
    pub nearing_retirement: Vec<Employee>,
}

impl Employee {
    pub fn create(root: &Path, new: NewEmployee) -> Result<Self> {
        let zan_id = new.zan_id.trim().to_string();
        if zan_id.is_empty() {
            return Err(CsmsError::validation("zan_id is required"));
        }
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(CsmsError::validation("name is required"));
        }
        if Self::find_by_zan_id(root, &zan_id)?.is_some() {
            return Err(CsmsError::EmployeeExists(zan_id));
        }
        Institution::load(root, &new.institution_id)?;

        let now = Utc::now();
        let emp = Self {
            id: uuid::Uuid::new_v4().to_string(),
            zan_id,
            name,
            gender: new.gender,
            date_of_birth: new.date_of_birth,
            place_of_birth: new.place_of_birth,
            region: new.region,
            phone_number: new.phone_number,
            zssf_number: new.zssf_number,
            payroll_number: new.payroll_number,
            cadre: new.cadre,
            salary_scale: new.salary_scale,
            ministry: new.ministry,
            institution_id: new.institution_id,
            department: new.department,
            appointment_type: new.appointment_type,
            contract_type: new.contract_type,
            employment_date: new.employment_date,
            confirmation_date: new.confirmation_date,
            retirement_date: new.retirement_date,
            status: new.status.unwrap_or(EmployeeStatus::OnProbation),
            certificates: new.certificates,
            created_at: now,
            updated_at: now,
        };
        store::save(root, &emp)?;
        info!(id = %emp.id, zan_id = %emp.zan_id, "employee created");
        Ok(emp)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::load(root, id)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::save(root, self)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list(root)?;
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    pub fn find_by_zan_id(root: &Path, zan_id: &str) -> Result<Option<Self>> {
        let wanted = zan_id.trim();
        Ok(store::list::<Self>(root)?
            .into_iter()
            .find(|e| e.zan_id.eq_ignore_ascii_case(wanted)))
    }

    /// Whether `actor` may see this employee's record.
    pub fn visible_to(&self, actor: &User) -> bool {
        match actor.role {
            role if role.is_institution_scoped() => self.institution_id == actor.institution_id,
            Role::Employee => actor.employee_id.as_deref() == Some(self.id.as_str()),
            _ => true,
        }
    }

    /// Employees visible to `actor` whose name, ZAN-ID, cadre or institution
    /// name contains `q`, sorted by name and capped at `limit`.
    pub fn search(root: &Path, actor: &User, q: Option<&str>, limit: usize) -> Result<Vec<Self>> {
        let needle = q.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let institutions: HashMap<String, String> = Institution::list(root)?
            .into_iter()
            .map(|i| (i.id, i.name.to_lowercase()))
            .collect();

        let mut hits: Vec<Self> = Self::list(root)?
            .into_iter()
            .filter(|e| e.visible_to(actor))
            .filter(|e| match &needle {
                None => true,
                Some(n) => {
                    e.name.to_lowercase().contains(n)
                        || e.zan_id.to_lowercase().contains(n)
                        || e.cadre.as_deref().is_some_and(|c| c.to_lowercase().contains(n))
                        || institutions
                            .get(&e.institution_id)
                            .is_some_and(|name| name.contains(n))
                }
            })
            .collect();
        hits.truncate(limit);
        Ok(hits)
    }

    /// Overdue probations and confirmed staff approaching compulsory
    /// retirement in one institution.
    pub fn urgent_actions(
        root: &Path,
        institution_id: &str,
        policy: &Policy,
        today: NaiveDate,
    ) -> Result<UrgentActions> {
        Institution::load(root, institution_id)?;
        let probation_cutoff = dates::sub_months(today, policy.probation_months);
        let compulsory_months = policy.compulsory_retirement_age * 12;
        let window_start = compulsory_months.saturating_sub(policy.nearing_retirement_window_months);

        let mut probation_overdue = Vec::new();
        let mut nearing_retirement = Vec::new();
        for emp in Self::list(root)? {
            if emp.institution_id != institution_id {
                continue;
            }
            match emp.status {
                EmployeeStatus::OnProbation => {
                    if emp.employment_date.is_some_and(|d| d <= probation_cutoff) {
                        probation_overdue.push(emp);
                    }
                }
                EmployeeStatus::Confirmed => {
                    let age_months = dates::full_months(emp.date_of_birth, today);
                    if (window_start..compulsory_months).contains(&age_months) {
                        nearing_retirement.push(emp);
                    }
                }
                _ => {}
            }
        }
        Ok(UrgentActions {
            probation_overdue,
            nearing_retirement,
        })
    }

    /// Apply the effect of a commission approval. Complaints change nothing.
    pub fn apply_outcome(&mut self, details: &RequestDetails, today: NaiveDate) -> Result<()> {
        match details {
            RequestDetails::Confirmation { .. } => {
                self.status = EmployeeStatus::Confirmed;
                self.confirmation_date = Some(today);
            }
            RequestDetails::Promotion { proposed_cadre, .. } => {
                self.cadre = Some(proposed_cadre.trim().to_string());
            }
            RequestDetails::CadreChange { new_cadre, .. } => {
                self.cadre = Some(new_cadre.trim().to_string());
            }
            RequestDetails::Lwop { .. } => self.status = EmployeeStatus::OnLwop,
            RequestDetails::Retirement { proposed_date, .. } => {
                self.status = EmployeeStatus::Retired;
                self.retirement_date = Some(*proposed_date);
            }
            RequestDetails::Resignation { .. } => self.status = EmployeeStatus::Resigned,
            RequestDetails::ServiceExtension {
                current_retirement_date,
                requested_extension_period,
                ..
            } => {
                let months = dates::parse_period_months(requested_extension_period).ok_or_else(|| {
                    CsmsError::validation(format!(
                        "unparseable extension period '{requested_extension_period}'"
                    ))
                })?;
                let base = self.retirement_date.unwrap_or(*current_retirement_date);
                self.retirement_date = Some(dates::add_months(base, months));
            }
            RequestDetails::Termination { .. } => self.status = EmployeeStatus::Terminated,
            RequestDetails::Dismissal { .. } => self.status = EmployeeStatus::Dismissed,
            RequestDetails::Complaint { .. } => return Ok(()),
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

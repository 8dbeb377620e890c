use crate::config::Policy;
use crate::dates;
use crate::employee::Employee;
use crate::error::{CsmsError, Result};
use crate::types::{EmployeeStatus, RequestType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MIN_SUBJECT_LEN: usize = 5;
const MIN_COMPLAINT_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Option enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionType {
    Experience,
    EducationAdvancement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementType {
    Compulsory,
    Voluntary,
    Illness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeType {
    ThreeMonthNotice,
    TwentyFourHourWithPayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintType {
    UnconfirmedEmployee,
    GeneralJobRelated,
    Other,
}

// ---------------------------------------------------------------------------
// RequestDetails
// ---------------------------------------------------------------------------

/// Type-specific payload of a request. The tag doubles as the request type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestDetails {
    Confirmation {
        #[serde(default)]
        documents: Vec<String>,
    },
    Promotion {
        proposed_cadre: String,
        promotion_type: PromotionType,
        #[serde(default)]
        studied_outside_country: bool,
        #[serde(default)]
        documents: Vec<String>,
    },
    Lwop {
        duration: String,
        reason: String,
        #[serde(default)]
        documents: Vec<String>,
    },
    CadreChange {
        new_cadre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default)]
        studied_outside_country: bool,
        #[serde(default)]
        documents: Vec<String>,
    },
    Retirement {
        retirement_type: RetirementType,
        proposed_date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        illness_description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delay_reason: Option<String>,
        #[serde(default)]
        documents: Vec<String>,
    },
    Resignation {
        effective_date: NaiveDate,
        notice_type: NoticeType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default)]
        documents: Vec<String>,
    },
    ServiceExtension {
        current_retirement_date: NaiveDate,
        requested_extension_period: String,
        justification: String,
        #[serde(default)]
        documents: Vec<String>,
    },
    Termination {
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scenario: Option<String>,
        #[serde(default)]
        documents: Vec<String>,
    },
    Dismissal {
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scenario: Option<String>,
        #[serde(default)]
        documents: Vec<String>,
    },
    Complaint {
        complaint_type: ComplaintType,
        subject: String,
        complaint_text: String,
        complainant_phone: String,
        next_of_kin_phone: String,
        #[serde(default)]
        attachments: Vec<String>,
    },
}

impl RequestDetails {
    pub fn request_type(&self) -> RequestType {
        match self {
            RequestDetails::Confirmation { .. } => RequestType::Confirmation,
            RequestDetails::Promotion { .. } => RequestType::Promotion,
            RequestDetails::Lwop { .. } => RequestType::Lwop,
            RequestDetails::CadreChange { .. } => RequestType::CadreChange,
            RequestDetails::Retirement { .. } => RequestType::Retirement,
            RequestDetails::Resignation { .. } => RequestType::Resignation,
            RequestDetails::ServiceExtension { .. } => RequestType::ServiceExtension,
            RequestDetails::Termination { .. } => RequestType::Termination,
            RequestDetails::Dismissal { .. } => RequestType::Dismissal,
            RequestDetails::Complaint { .. } => RequestType::Complaint,
        }
    }

    /// Employment-status preconditions of this request type. They are
    /// checked on submission and again when the commission approves, since
    /// another request may have changed the employee in between.
    pub fn check_standing(&self, employee: &Employee) -> Result<()> {
        if employee.status.is_separated() {
            return Err(CsmsError::Ineligible(format!(
                "{} is {} and no longer in service",
                employee.name,
                employee.status.to_string().to_lowercase()
            )));
        }
        match self {
            RequestDetails::Confirmation { .. } | RequestDetails::Dismissal { .. } => {
                require_status(employee, EmployeeStatus::OnProbation)
            }
            RequestDetails::Promotion { .. } | RequestDetails::Termination { .. } => {
                require_status(employee, EmployeeStatus::Confirmed)
            }
            RequestDetails::Lwop { .. } if employee.status == EmployeeStatus::OnLwop => {
                Err(CsmsError::Ineligible(format!(
                    "{} is already on leave without pay",
                    employee.name
                )))
            }
            _ => Ok(()),
        }
    }

    /// Check required fields and the employee's eligibility as of `today`.
    pub fn validate(&self, employee: &Employee, policy: &Policy, today: NaiveDate) -> Result<()> {
        self.check_standing(employee)?;

        match self {
            RequestDetails::Confirmation { .. } => {
                let served = employee
                    .employment_date
                    .map(|d| dates::full_months(d, today))
                    .unwrap_or(0);
                if served < policy.probation_months {
                    return Err(CsmsError::Ineligible(format!(
                        "confirmation requires {} months of probation; {} has served {served}",
                        policy.probation_months, employee.name
                    )));
                }
            }

            RequestDetails::Promotion { proposed_cadre, .. } => {
                require_text("proposed_cadre", proposed_cadre)?;
                let years = employee
                    .employment_date
                    .map(|d| dates::full_years(d, today))
                    .unwrap_or(0);
                if years < policy.promotion_min_service_years {
                    return Err(CsmsError::Ineligible(format!(
                        "promotion requires {} years of service; {} has {years}",
                        policy.promotion_min_service_years, employee.name
                    )));
                }
                let same = employee
                    .cadre
                    .as_deref()
                    .is_some_and(|c| c.trim().eq_ignore_ascii_case(proposed_cadre.trim()));
                if same {
                    return Err(CsmsError::validation(
                        "proposed_cadre must differ from the current cadre",
                    ));
                }
            }

            RequestDetails::Lwop { duration, reason, .. } => {
                require_text("duration", duration)?;
                require_text("reason", reason)?;
            }

            RequestDetails::CadreChange { new_cadre, .. } => {
                require_text("new_cadre", new_cadre)?;
            }

            RequestDetails::Retirement {
                retirement_type,
                proposed_date,
                illness_description,
                ..
            } => {
                let earliest = dates::add_months(today, policy.retirement_notice_months);
                if *proposed_date < earliest {
                    return Err(CsmsError::Ineligible(format!(
                        "proposed retirement date must be on or after {earliest} ({} months notice)",
                        policy.retirement_notice_months
                    )));
                }
                let age = dates::full_years(employee.date_of_birth, *proposed_date);
                match retirement_type {
                    RetirementType::Compulsory if age < policy.compulsory_retirement_age => {
                        return Err(CsmsError::Ineligible(format!(
                            "compulsory retirement requires age {}; {} will be {age}",
                            policy.compulsory_retirement_age, employee.name
                        )));
                    }
                    RetirementType::Voluntary if age < policy.voluntary_retirement_age => {
                        return Err(CsmsError::Ineligible(format!(
                            "voluntary retirement requires age {}; {} will be {age}",
                            policy.voluntary_retirement_age, employee.name
                        )));
                    }
                    RetirementType::Illness => {
                        require_text(
                            "illness_description",
                            illness_description.as_deref().unwrap_or(""),
                        )?;
                    }
                    _ => {}
                }
            }

            RequestDetails::Resignation { .. } => {}

            RequestDetails::ServiceExtension {
                requested_extension_period,
                justification,
                ..
            } => {
                require_text("justification", justification)?;
                if dates::parse_period_months(requested_extension_period).is_none() {
                    return Err(CsmsError::validation(format!(
                        "requested_extension_period '{requested_extension_period}' is not a period like '2 years' or '6 months'"
                    )));
                }
            }

            RequestDetails::Termination { reason, .. } | RequestDetails::Dismissal { reason, .. } => {
                require_text("reason", reason)?;
            }

            RequestDetails::Complaint {
                subject,
                complaint_text,
                complainant_phone,
                next_of_kin_phone,
                ..
            } => {
                require_min("subject", subject, MIN_SUBJECT_LEN)?;
                require_min("complaint_text", complaint_text, MIN_COMPLAINT_LEN)?;
                require_text("complainant_phone", complainant_phone)?;
                require_text("next_of_kin_phone", next_of_kin_phone)?;
            }
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CsmsError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_min(field: &str, value: &str, min: usize) -> Result<()> {
    if value.trim().chars().count() < min {
        return Err(CsmsError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

fn require_status(employee: &Employee, wanted: EmployeeStatus) -> Result<()> {
    if employee.status != wanted {
        return Err(CsmsError::Ineligible(format!(
            "{} is '{}', expected '{wanted}'",
            employee.name, employee.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::tests::sample_employee;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn today() -> NaiveDate {
        d(2025, 6, 1)
    }

    #[test]
    fn tag_names_the_type() {
        let json = r#"{"type":"cadre_change","new_cadre":"Accountant"}"#;
        let details: RequestDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.request_type(), RequestType::CadreChange);
    }

    #[test]
    fn separated_employees_are_never_eligible() {
        let mut emp = sample_employee();
        emp.status = EmployeeStatus::Retired;
        let details = RequestDetails::CadreChange {
            new_cadre: "Driver".into(),
            reason: None,
            studied_outside_country: false,
            documents: vec![],
        };
        assert!(matches!(
            details.validate(&emp, &Policy::default(), today()),
            Err(CsmsError::Ineligible(_))
        ));
    }

    #[test]
    fn confirmation_needs_full_probation() {
        let mut emp = sample_employee();
        emp.status = EmployeeStatus::OnProbation;
        let details = RequestDetails::Confirmation { documents: vec![] };

        emp.employment_date = Some(d(2024, 6, 2));
        assert!(details.validate(&emp, &Policy::default(), today()).is_err());

        emp.employment_date = Some(d(2024, 6, 1));
        details.validate(&emp, &Policy::default(), today()).unwrap();
    }

    #[test]
    fn promotion_rules() {
        let mut emp = sample_employee();
        emp.cadre = Some("Nurse".into());
        emp.employment_date = Some(d(2023, 1, 1));
        let details = RequestDetails::Promotion {
            proposed_cadre: "Senior Nurse".into(),
            promotion_type: PromotionType::Experience,
            studied_outside_country: false,
            documents: vec![],
        };
        assert!(matches!(
            details.validate(&emp, &Policy::default(), today()),
            Err(CsmsError::Ineligible(_))
        ));

        emp.employment_date = Some(d(2022, 6, 1));
        details.validate(&emp, &Policy::default(), today()).unwrap();

        let same = RequestDetails::Promotion {
            proposed_cadre: "nurse".into(),
            promotion_type: PromotionType::Experience,
            studied_outside_country: false,
            documents: vec![],
        };
        assert!(matches!(
            same.validate(&emp, &Policy::default(), today()),
            Err(CsmsError::Validation(_))
        ));
    }

    #[test]
    fn retirement_notice_and_age() {
        let mut emp = sample_employee();
        emp.date_of_birth = d(1965, 3, 1);
        let policy = Policy::default();

        let too_soon = RequestDetails::Retirement {
            retirement_type: RetirementType::Compulsory,
            proposed_date: d(2025, 11, 30),
            illness_description: None,
            delay_reason: None,
            documents: vec![],
        };
        assert!(too_soon.validate(&emp, &policy, today()).is_err());

        let ok = RequestDetails::Retirement {
            retirement_type: RetirementType::Compulsory,
            proposed_date: d(2025, 12, 1),
            illness_description: None,
            delay_reason: None,
            documents: vec![],
        };
        ok.validate(&emp, &policy, today()).unwrap();

        emp.date_of_birth = d(1975, 3, 1);
        assert!(ok.validate(&emp, &policy, today()).is_err());

        let illness = RequestDetails::Retirement {
            retirement_type: RetirementType::Illness,
            proposed_date: d(2026, 1, 1),
            illness_description: Some("  ".into()),
            delay_reason: None,
            documents: vec![],
        };
        assert!(matches!(
            illness.validate(&emp, &policy, today()),
            Err(CsmsError::Validation(_))
        ));
    }

    #[test]
    fn termination_and_dismissal_status_guards() {
        let mut emp = sample_employee();
        let term = RequestDetails::Termination {
            reason: "Absconded".into(),
            scenario: None,
            documents: vec![],
        };
        let dismiss = RequestDetails::Dismissal {
            reason: "Misconduct".into(),
            scenario: None,
            documents: vec![],
        };

        emp.status = EmployeeStatus::Confirmed;
        term.validate(&emp, &Policy::default(), today()).unwrap();
        assert!(dismiss.validate(&emp, &Policy::default(), today()).is_err());

        emp.status = EmployeeStatus::OnProbation;
        dismiss.validate(&emp, &Policy::default(), today()).unwrap();
        assert!(term.validate(&emp, &Policy::default(), today()).is_err());
    }

    #[test]
    fn complaint_length_rules() {
        let emp = sample_employee();
        let mut details = RequestDetails::Complaint {
            complaint_type: ComplaintType::GeneralJobRelated,
            subject: "Pay".into(),
            complaint_text: "My salary has not been paid for three months.".into(),
            complainant_phone: "0777000000".into(),
            next_of_kin_phone: "0777000001".into(),
            attachments: vec![],
        };
        assert!(details.validate(&emp, &Policy::default(), today()).is_err());
        if let RequestDetails::Complaint { subject, .. } = &mut details {
            *subject = "Unpaid salary".into();
        }
        details.validate(&emp, &Policy::default(), today()).unwrap();
    }

    #[test]
    fn extension_period_must_parse() {
        let emp = sample_employee();
        let details = RequestDetails::ServiceExtension {
            current_retirement_date: d(2026, 1, 1),
            requested_extension_period: "a while".into(),
            justification: "Critical skills".into(),
            documents: vec![],
        };
        assert!(matches!(
            details.validate(&emp, &Policy::default(), today()),
            Err(CsmsError::Validation(_))
        ));
    }

    #[test]
    fn standing_tracks_current_status() {
        let mut emp = sample_employee();
        emp.status = EmployeeStatus::OnProbation;
        let confirmation = RequestDetails::Confirmation { documents: vec![] };
        confirmation.check_standing(&emp).unwrap();

        emp.status = EmployeeStatus::Dismissed;
        assert!(matches!(
            confirmation.check_standing(&emp),
            Err(CsmsError::Ineligible(_))
        ));

        emp.status = EmployeeStatus::Confirmed;
        assert!(confirmation.check_standing(&emp).is_err());
        RequestDetails::CadreChange {
            new_cadre: "Driver".into(),
            reason: None,
            studied_outside_country: false,
            documents: vec![],
        }
        .check_standing(&emp)
        .unwrap();
    }

    #[test]
    fn lwop_refused_when_already_on_lwop() {
        let mut emp = sample_employee();
        emp.status = EmployeeStatus::OnLwop;
        let details = RequestDetails::Lwop {
            duration: "1 year".into(),
            reason: "Studies".into(),
            documents: vec![],
        };
        assert!(matches!(
            details.validate(&emp, &Policy::default(), today()),
            Err(CsmsError::Ineligible(_))
        ));
    }
}

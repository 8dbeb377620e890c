use crate::dates;
use crate::employee::Employee;
use crate::error::{CsmsError, Result};
use crate::institution::Institution;
use crate::request::Request;
use crate::types::{Gender, RequestType, Role};
use crate::user::User;
use crate::workflow::Status;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

const NA: &str = "N/A";
const FULL_TIME: &str = "Full-time";

// ---------------------------------------------------------------------------
// ReportKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Confirmation,
    Promotion,
    Contractual,
    RequestStatus,
}

impl ReportKind {
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::Confirmation,
            ReportKind::Promotion,
            ReportKind::Contractual,
            ReportKind::RequestStatus,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Confirmation => "confirmation",
            ReportKind::Promotion => "promotion",
            ReportKind::Contractual => "contractual",
            ReportKind::RequestStatus => "request-status",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = CsmsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().replace('_', "-").to_lowercase();
        ReportKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CsmsError::InvalidReportKind(s))
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub institution_id: Option<String>,
}

/// A titled table. `data_keys[i]` is the row key rendered under `headers[i]`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub headers: Vec<String>,
    pub data_keys: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub totals: Map<String, Value>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// Shared lookups for one report run.
struct Scope {
    institution_id: Option<String>,
    window: Option<(NaiveDate, NaiveDate)>,
    employees: HashMap<String, Employee>,
    institutions: HashMap<String, String>,
}

impl Scope {
    fn institution_name(&self, id: &str) -> String {
        self.institutions
            .get(id)
            .cloned()
            .unwrap_or_else(|| NA.to_string())
    }

    fn in_scope(&self, institution_id: &str) -> bool {
        self.institution_id
            .as_deref()
            .map_or(true, |id| id == institution_id)
    }

    fn in_window(&self, r: &Request) -> bool {
        self.window.map_or(true, |(from, to)| {
            let day = r.created_at.date_naive();
            from <= day && day <= to
        })
    }

    /// Approved requests of one type, oldest first.
    fn approved(&self, requests: &[Request], request_type: RequestType) -> Vec<Request> {
        let mut hits: Vec<Request> = requests
            .iter()
            .filter(|r| r.request_type == request_type)
            .filter(|r| r.status == Status::ApprovedByCommission)
            .filter(|r| self.in_scope(&r.institution_id) && self.in_window(r))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        hits
    }
}

/// Build a report. HRRP users always get their own institution.
pub fn generate(root: &Path, actor: &User, kind: ReportKind, filter: &ReportFilter) -> Result<Report> {
    let institution_id = match actor.role {
        role if role.is_system_wide() => filter
            .institution_id
            .clone()
            .filter(|s| !s.trim().is_empty()),
        Role::Hrrp => Some(actor.institution_id.clone()),
        role => {
            return Err(CsmsError::forbidden(format!("{role} cannot generate reports")));
        }
    };
    if let Some(id) = institution_id.as_deref() {
        Institution::load(root, id)?;
    }

    let scope = Scope {
        institution_id,
        window: dates::date_window(filter.from.as_deref(), filter.to.as_deref()),
        employees: Employee::list(root)?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect(),
        institutions: Institution::list(root)?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect(),
    };

    match kind {
        ReportKind::Confirmation => confirmation(&scope, &Request::list(root)?),
        ReportKind::Promotion => promotion(&scope, &Request::list(root)?),
        ReportKind::Contractual => contractual(&scope),
        ReportKind::RequestStatus => request_status(&scope, &Request::list(root)?),
    }
}

fn fmt_date(d: Option<NaiveDate>, pattern: &str) -> String {
    d.map_or_else(|| NA.to_string(), |d| d.format(pattern).to_string())
}

fn confirmation(scope: &Scope, requests: &[Request]) -> Result<Report> {
    let mut male = 0;
    let mut female = 0;
    let mut rows = Vec::new();

    for r in scope.approved(requests, RequestType::Confirmation) {
        let Some(emp) = scope.employees.get(&r.employee_id) else {
            continue;
        };
        match emp.gender {
            Gender::Male => male += 1,
            Gender::Female => female += 1,
            Gender::NotApplicable => {}
        }
        let decided = r
            .history
            .iter()
            .rev()
            .find(|h| h.to == Status::ApprovedByCommission)
            .map(|h| h.at.date_naive());
        let has_ipa = emp
            .certificates
            .iter()
            .any(|c| c.kind.to_uppercase().contains("IPA"))
            || match &r.details {
                crate::details::RequestDetails::Confirmation { documents } => documents
                    .iter()
                    .any(|d| d.to_uppercase().contains("IPA")),
                _ => false,
            };
        rows.push(row(json!({
            "nam": rows.len() + 1,
            "jina": emp.name,
            "jinsia": emp.gender.to_string(),
            "wizara": scope.institution_name(&emp.institution_id),
            "cheo": emp.cadre.clone().unwrap_or_else(|| NA.to_string()),
            "trh_ajira": fmt_date(emp.employment_date, "%d/%m/%Y"),
            "trh_kuthibitishwa": fmt_date(decided.or(emp.confirmation_date), "%d/%m/%Y"),
            "cheti_ipa": if has_ipa { "Yes" } else { "No" },
            "simu": emp.phone_number.clone().unwrap_or_else(|| NA.to_string()),
        })));
    }

    Ok(Report {
        kind: ReportKind::Confirmation,
        title: "Ripoti ya Kuthibitishwa Kazini".to_string(),
        headers: strings(&[
            "NAM",
            "JINA KAMILI",
            "JINSIA",
            "WIZARA/TAASISI",
            "CHEO/WADHIFA",
            "TAREHE YA AJIRA",
            "TAREHE YA KUTHIBITISHWA",
            "CHETI CHA IPA",
            "NAM. YA SIMU",
        ]),
        data_keys: strings(&[
            "nam",
            "jina",
            "jinsia",
            "wizara",
            "cheo",
            "trh_ajira",
            "trh_kuthibitishwa",
            "cheti_ipa",
            "simu",
        ]),
        rows,
        totals: row(json!({
            "description_male": "JUMLA YA WANAUME",
            "value_male": male,
            "description_female": "JUMLA YA WANAWAKE",
            "value_female": female,
            "description_total": "JUMLA KUU",
            "value_total": male + female,
        })),
    })
}

fn promotion(scope: &Scope, requests: &[Request]) -> Result<Report> {
    let mut per_institution: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for r in scope.approved(requests, RequestType::Promotion) {
        let Some(emp) = scope.employees.get(&r.employee_id) else {
            continue;
        };
        let counts = per_institution
            .entry(scope.institution_name(&r.institution_id))
            .or_default();
        match emp.gender {
            Gender::Male => counts.0 += 1,
            Gender::Female => counts.1 += 1,
            Gender::NotApplicable => {}
        }
    }

    let (mut total_m, mut total_f) = (0, 0);
    let rows = per_institution
        .into_iter()
        .enumerate()
        .map(|(i, (wizara, (m, f)))| {
            total_m += m;
            total_f += f;
            row(json!({ "sno": i + 1, "wizara": wizara, "m": m, "f": f, "jumla": m + f }))
        })
        .collect();

    Ok(Report {
        kind: ReportKind::Promotion,
        title: "Ripoti ya Kupandishwa Cheo (Jumla)".to_string(),
        headers: strings(&["S.NO", "WIZARA/TAASISI", "MALE", "FEMALE", "JUMLA"]),
        data_keys: strings(&["sno", "wizara", "m", "f", "jumla"]),
        rows,
        totals: row(json!({
            "sno": "JUMLA",
            "wizara": "",
            "m": total_m,
            "f": total_f,
            "jumla": total_m + total_f,
        })),
    })
}

/// Current contract staff; not date filtered.
fn contractual(scope: &Scope) -> Result<Report> {
    let mut employees: Vec<&Employee> = scope
        .employees
        .values()
        .filter(|e| scope.in_scope(&e.institution_id))
        .filter(|e| {
            e.contract_type
                .as_deref()
                .is_some_and(|c| !c.trim().eq_ignore_ascii_case(FULL_TIME))
        })
        .collect();
    employees.sort_by(|a, b| a.name.cmp(&b.name));

    let (mut total_m, mut total_f) = (0, 0);
    let rows = employees
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let m = u64::from(e.gender == Gender::Male);
            let f = u64::from(e.gender == Gender::Female);
            total_m += m;
            total_f += f;
            row(json!({
                "nam": i + 1,
                "wizara": scope.institution_name(&e.institution_id),
                "kada": e.cadre.clone().unwrap_or_else(|| NA.to_string()),
                "jina": e.name,
                "muda": e.contract_type,
                "mme": m,
                "mke": f,
                "jumla": 1,
                "trh_kibali": fmt_date(e.employment_date, "%d-%b-%y"),
                "hali": "AJIRA MPYA",
            }))
        })
        .collect();

    Ok(Report {
        kind: ReportKind::Contractual,
        title: "Ripoti ya Ajira za Mikataba".to_string(),
        headers: strings(&[
            "NAM",
            "WIZARA/TAASISI",
            "KADA/CHEO",
            "JINA KAMILI",
            "MUDA WA MKATABA",
            "M'ME",
            "M'KE",
            "JUMLA",
            "TAREHE YA KUTOKA KIBALI",
            "HALI YA MKATABA",
        ]),
        data_keys: strings(&[
            "nam",
            "wizara",
            "kada",
            "jina",
            "muda",
            "mme",
            "mke",
            "jumla",
            "trh_kibali",
            "hali",
        ]),
        rows,
        totals: row(json!({
            "nam": "JUMLA KUU",
            "mme": total_m,
            "mke": total_f,
            "jumla": total_m + total_f,
        })),
    })
}

/// Request counts per type and status label.
fn request_status(scope: &Scope, requests: &[Request]) -> Result<Report> {
    let mut counts: BTreeMap<(&'static str, String), u64> = BTreeMap::new();
    for r in requests
        .iter()
        .filter(|r| scope.in_scope(&r.institution_id) && scope.in_window(r))
    {
        *counts
            .entry((r.request_type.short_label(), r.status_label()))
            .or_default() += 1;
    }

    let total: u64 = counts.values().sum();
    let rows = counts
        .into_iter()
        .enumerate()
        .map(|(i, ((aina, hali), idadi))| {
            row(json!({ "nam": i + 1, "aina": aina, "hali": hali, "idadi": idadi }))
        })
        .collect();

    Ok(Report {
        kind: ReportKind::RequestStatus,
        title: format!("Ripoti ya Hali ya Maombi ({})", Utc::now().format("%d/%m/%Y")),
        headers: strings(&["NAM", "AINA YA OMBI", "HALI YA OMBI", "IDADI"]),
        data_keys: strings(&["nam", "aina", "hali", "idadi"]),
        rows,
        totals: row(json!({ "nam": "JUMLA KUU", "idadi": total })),
    })
}

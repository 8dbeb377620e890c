use crate::dates;
use crate::employee::Employee;
use crate::error::Result;
use crate::institution::Institution;
use crate::request::Request;
use crate::types::Gender;
use crate::user::User;
use crate::workflow::ReviewStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const UNKNOWN: &str = "N/A";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackQuery {
    #[serde(default)]
    pub zan_id: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    /// Matched against the status label, ignoring case.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// One row of the request tracking table.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedRequest {
    pub id: String,
    pub employee_name: String,
    pub zan_id: String,
    pub request_type: &'static str,
    pub submission_date: DateTime<Utc>,
    pub status: String,
    pub last_updated: DateTime<Utc>,
    pub current_stage: ReviewStage,
    pub employee_institution: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Flattened view of every request visible to `actor` that matches `query`,
/// most recently updated first.
pub fn track(root: &Path, actor: &User, query: &TrackQuery) -> Result<Vec<TrackedRequest>> {
    let employees: HashMap<String, Employee> = Employee::list(root)?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();
    let institutions: HashMap<String, String> = Institution::list(root)?
        .into_iter()
        .map(|i| (i.id, i.name))
        .collect();
    let window = dates::date_window(query.from.as_deref(), query.to.as_deref());
    let blank = |o: &Option<String>| o.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    let zan_id = blank(&query.zan_id);
    let institution_name = blank(&query.institution_name);
    let status = blank(&query.status);

    let mut rows: Vec<TrackedRequest> = Request::list(root)?
        .into_iter()
        .filter(|r| r.visible_to(actor))
        .map(|r| {
            let employee = employees.get(&r.employee_id);
            TrackedRequest {
                employee_name: employee.map_or(UNKNOWN.to_string(), |e| e.name.clone()),
                zan_id: employee.map_or(UNKNOWN.to_string(), |e| e.zan_id.clone()),
                request_type: r.request_type.short_label(),
                submission_date: r.created_at,
                status: r.status_label(),
                last_updated: r.updated_at,
                current_stage: r.status.stage(),
                employee_institution: institutions
                    .get(&r.institution_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                gender: employee.map(|e| e.gender).unwrap_or_default(),
                rejection_reason: r.status.rejection_reason().map(str::to_string),
                id: r.id,
            }
        })
        .filter(|t| zan_id.as_deref().map_or(true, |z| t.zan_id.eq_ignore_ascii_case(z)))
        .filter(|t| {
            institution_name
                .as_deref()
                .map_or(true, |n| t.employee_institution.eq_ignore_ascii_case(n))
        })
        .filter(|t| status.as_deref().map_or(true, |s| t.status.eq_ignore_ascii_case(s)))
        .filter(|t| {
            window.map_or(true, |(from, to)| {
                let day = t.submission_date.date_naive();
                from <= day && day <= to
            })
        })
        .collect();

    rows.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::tests::{confirmation, fixture, make_user, today};
    use crate::types::Role;
    use crate::workflow::Action;

    #[test]
    fn tracks_visible_requests_with_filters() {
        let f = fixture();
        let root = f.dir.path();
        let r = Request::submit(root, &f.hro, confirmation(&f), today()).unwrap().request;
        Request::apply(
            root,
            &f.hrmo,
            &r.id,
            Action::Return {
                reason: "Missing appraisal".into(),
            },
            None,
            today(),
        )
        .unwrap();

        let rows = track(root, &f.hhrmd, &TrackQuery::default()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.zan_id, "Z100");
        assert_eq!(row.request_type, "Confirmation");
        assert_eq!(row.employee_institution, "Wizara ya Afya");
        assert_eq!(row.status, "Rejected by HRMO - Awaiting HRO Correction");
        assert_eq!(row.rejection_reason.as_deref(), Some("Missing appraisal"));
        assert_eq!(row.current_stage, ReviewStage::Initial);

        let q = TrackQuery {
            zan_id: Some("z100".into()),
            status: Some("rejected by hrmo - awaiting hro correction".into()),
            ..Default::default()
        };
        assert_eq!(track(root, &f.hhrmd, &q).unwrap().len(), 1);

        let q = TrackQuery {
            institution_name: Some("Wizara ya Elimu".into()),
            ..Default::default()
        };
        assert!(track(root, &f.hhrmd, &q).unwrap().is_empty());

        let q = TrackQuery {
            from: Some("2000-01-01".into()),
            to: Some("2000-12-31".into()),
            ..Default::default()
        };
        assert!(track(root, &f.hhrmd, &q).unwrap().is_empty());

        let outsider = make_user(root, "hrrp2", Role::Hrrp, &f.other_inst.id, None);
        assert!(track(root, &outsider, &TrackQuery::default()).unwrap().is_empty());
    }
}

use crate::config::Config;
use crate::employee::Employee;
use crate::error::Result;
use crate::request::Request;
use crate::types::{EmployeeStatus, RequestType};
use crate::user::User;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_employees: usize,
    pub pending_confirmations: usize,
    pub pending_promotions: usize,
    pub employees_on_lwop: usize,
    /// Open termination and dismissal requests.
    pub pending_terminations: usize,
    pub open_complaints: usize,
    /// Overdue probations plus staff nearing retirement; only for
    /// institution-scoped roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent_actions: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub request_type: &'static str,
    pub employee: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub recent_activities: Vec<Activity>,
}

/// Headline counts and recent activity, limited to what `actor` can see.
pub fn summary(root: &Path, actor: &User, today: NaiveDate) -> Result<DashboardSummary> {
    let policy = Config::load(root)?.policy;
    let employees: Vec<Employee> = Employee::list(root)?
        .into_iter()
        .filter(|e| e.visible_to(actor))
        .collect();
    let names: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    let mut requests: Vec<Request> = Request::list(root)?
        .into_iter()
        .filter(|r| r.visible_to(actor))
        .collect();

    let open = |types: &[RequestType]| {
        requests
            .iter()
            .filter(|r| types.contains(&r.request_type) && !r.status.is_terminal())
            .count()
    };

    let urgent_actions = if actor.role.is_institution_scoped() {
        let urgent = Employee::urgent_actions(root, &actor.institution_id, &policy, today)?;
        Some(urgent.probation_overdue.len() + urgent.nearing_retirement.len())
    } else {
        None
    };

    let stats = DashboardStats {
        total_employees: employees.len(),
        pending_confirmations: open(&[RequestType::Confirmation]),
        pending_promotions: open(&[RequestType::Promotion]),
        employees_on_lwop: employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::OnLwop)
            .count(),
        pending_terminations: open(&[RequestType::Termination, RequestType::Dismissal]),
        open_complaints: open(&[RequestType::Complaint]),
        urgent_actions,
    };

    requests.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_activities = requests
        .iter()
        .take(policy.recent_activity_limit)
        .map(|r| Activity {
            id: r.id.clone(),
            request_type: r.request_type.short_label(),
            employee: names
                .get(r.employee_id.as_str())
                .map_or_else(|| "N/A".to_string(), |n| n.to_string()),
            status: r.status_label(),
            updated_at: r.updated_at,
            href: r.request_type.href(),
        })
        .collect();

    Ok(DashboardSummary {
        stats,
        recent_activities,
    })
}

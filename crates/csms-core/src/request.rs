use crate::config::Config;
use crate::details::RequestDetails;
use crate::employee::Employee;
use crate::error::{CsmsError, Result};
use crate::notification;
use crate::paths;
use crate::store::{self, Record};
use crate::types::{RequestType, Role};
use crate::user::User;
use crate::workflow::{self, Action, ReviewStage, Status, TransitionContext};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// "submit" or one of the workflow action names.
    pub action: String,
    pub actor_id: String,
    pub actor_role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Status>,
    pub to: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub request_type: RequestType,
    pub employee_id: String,
    /// User id of the submitter.
    pub submitted_by: String,
    /// The employee's institution at submission time.
    pub institution_id: String,
    pub status: Status,
    pub details: RequestDetails,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl Record for Request {
    const DIR: &'static str = paths::REQUESTS_DIR;

    fn id(&self) -> &str {
        &self.id
    }

    fn not_found(id: &str) -> CsmsError {
        CsmsError::RequestNotFound(id.to_string())
    }
}

/// A request with its derived display fields, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: Request,
    pub type_label: &'static str,
    pub status_label: String,
    pub stage: ReviewStage,
}

impl From<Request> for RequestView {
    fn from(request: Request) -> Self {
        Self {
            type_label: request.request_type.label(),
            status_label: request.status_label(),
            stage: request.status.stage(),
            request,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Required for HRO submissions; EMPLOYEE complaints default to the
    /// complainant's own record.
    #[serde(default)]
    pub employee_id: Option<String>,
    pub details: RequestDetails,
    #[serde(default)]
    pub route_to: Option<Role>,
    #[serde(default)]
    pub client_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Submitted {
    pub request: Request,
    /// False when an earlier submission with the same client token was
    /// returned instead.
    pub created: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    #[serde(default)]
    pub request_type: Option<RequestType>,
    #[serde(default)]
    pub stage: Option<ReviewStage>,
    #[serde(default)]
    pub assigned_to_me: bool,
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl Request {
    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::load(root, id)
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        store::list(root)
    }

    pub fn status_label(&self) -> String {
        self.status.label(self.request_type)
    }

    /// Role-based read access.
    pub fn visible_to(&self, actor: &User) -> bool {
        match actor.role {
            Role::Hrmo | Role::Do => workflow::can_review(actor.role, self.request_type),
            role if role.is_institution_scoped() => self.institution_id == actor.institution_id,
            Role::Employee => {
                self.submitted_by == actor.id
                    || actor.employee_id.as_deref() == Some(self.employee_id.as_str())
            }
            role => role.is_system_wide(),
        }
    }

    fn context_for(&self, actor: &User) -> TransitionContext {
        let is_submitter = self.submitted_by == actor.id;
        let may_correct = if self.request_type == RequestType::Complaint {
            is_submitter
        } else {
            actor.role == Role::Hro && actor.institution_id == self.institution_id
        };
        TransitionContext {
            request_type: self.request_type,
            actor_role: actor.role,
            is_submitter,
            may_correct,
        }
    }

    /// True when the next move on this request belongs to `actor`.
    pub fn awaits(&self, actor: &User) -> bool {
        match &self.status {
            Status::Returned { .. } => self.context_for(actor).may_correct,
            status => status.awaits(actor.role),
        }
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    pub fn submit(root: &Path, actor: &User, input: SubmitRequest, today: NaiveDate) -> Result<Submitted> {
        let request_type = input.details.request_type();

        if let Some(token) = input.client_token.as_deref() {
            let earlier = Self::list(root)?.into_iter().find(|r| {
                r.submitted_by == actor.id && r.client_token.as_deref() == Some(token)
            });
            if let Some(request) = earlier {
                info!(id = %request.id, "duplicate submission returned");
                return Ok(Submitted {
                    request,
                    created: false,
                });
            }
        }

        let employee_id = match (actor.role, request_type, input.employee_id) {
            (Role::Employee, RequestType::Complaint, requested) => {
                let own = actor.employee_id.clone().ok_or_else(|| {
                    CsmsError::forbidden("this account is not linked to an employee record")
                })?;
                if requested.is_some_and(|r| r != own) {
                    return Err(CsmsError::forbidden(
                        "employees can only file complaints about themselves",
                    ));
                }
                own
            }
            (Role::Employee, _, _) => {
                return Err(CsmsError::forbidden("employees may only submit complaints"));
            }
            (Role::Hro, RequestType::Complaint, _) => {
                return Err(CsmsError::forbidden("complaints are filed by the employee"));
            }
            (Role::Hro, _, Some(id)) => id,
            (Role::Hro, _, None) => return Err(CsmsError::validation("employee_id is required")),
            (role, _, _) => {
                return Err(CsmsError::forbidden(format!("{role} cannot submit requests")));
            }
        };

        let employee = Employee::load(root, &employee_id)?;
        if actor.role == Role::Hro && employee.institution_id != actor.institution_id {
            return Err(CsmsError::forbidden(
                "HROs can only submit requests for employees of their own institution",
            ));
        }

        let reviewer = match input.route_to {
            Some(role) if workflow::can_review(role, request_type) => role,
            Some(role) => {
                return Err(CsmsError::validation(format!(
                    "{role} does not review {} requests",
                    request_type.short_label()
                )));
            }
            None => workflow::default_reviewer(request_type),
        };

        let policy = Config::load(root)?.policy;
        input.details.validate(&employee, &policy, today)?;

        if request_type != RequestType::Complaint {
            let open = Self::list(root)?.into_iter().find(|r| {
                r.employee_id == employee.id
                    && r.request_type == request_type
                    && !r.status.is_terminal()
            });
            if let Some(open) = open {
                return Err(CsmsError::Ineligible(format!(
                    "{} already has an open {} request ({})",
                    employee.name,
                    request_type.short_label(),
                    open.id
                )));
            }
        }

        let now = Utc::now();
        let status = Status::PendingReview { reviewer };
        let request = Self {
            id: uuid::Uuid::new_v4().to_string(),
            request_type,
            employee_id: employee.id.clone(),
            submitted_by: actor.id.clone(),
            institution_id: employee.institution_id.clone(),
            status: status.clone(),
            details: input.details,
            version: 1,
            created_at: now,
            updated_at: now,
            history: vec![HistoryEntry {
                action: "submit".to_string(),
                actor_id: actor.id.clone(),
                actor_role: actor.role,
                from: None,
                to: status,
                reason: None,
                at: now,
            }],
            client_token: input.client_token,
        };
        store::save(root, &request)?;
        info!(
            id = %request.id,
            request_type = %request.request_type,
            employee = %employee.zan_id,
            reviewer = %reviewer,
            "request submitted"
        );
        Ok(Submitted {
            request,
            created: true,
        })
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Apply a workflow action. When `expected_version` is given it must
    /// match the stored version.
    pub fn apply(
        root: &Path,
        actor: &User,
        id: &str,
        action: Action,
        expected_version: Option<u64>,
        today: NaiveDate,
    ) -> Result<Self> {
        let mut request = Self::get_visible(root, actor, id)?;

        if let Some(expected) = expected_version {
            if expected != request.version {
                warn!(id, expected, actual = request.version, "stale request version");
                return Err(CsmsError::VersionConflict {
                    expected,
                    actual: request.version,
                });
            }
        }

        let ctx = request.context_for(actor);
        let next = workflow::next_status(&request.status, &action, &ctx).inspect_err(|e| {
            warn!(id, action = action.as_str(), actor = %actor.username, error = %e, "action refused");
        })?;

        let mut employee = Employee::load(root, &request.employee_id)?;
        if let Action::Resubmit {
            details: Some(details),
            ..
        } = &action
        {
            if details.request_type() != request.request_type {
                return Err(CsmsError::validation(format!(
                    "corrected details must be for a {} request",
                    request.request_type.short_label()
                )));
            }
            let policy = Config::load(root)?.policy;
            details.validate(&employee, &policy, today)?;
            request.details = details.clone();
        }

        let approved = next == Status::ApprovedByCommission;
        if approved {
            if request.request_type != RequestType::Complaint {
                request.details.check_standing(&employee)?;
            }
            employee.apply_outcome(&request.details, today)?;
        }

        let now = Utc::now();
        request.history.push(HistoryEntry {
            action: action.as_str().to_string(),
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            from: Some(request.status.clone()),
            to: next.clone(),
            reason: action
                .reason()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            at: now,
        });
        request.status = next;
        request.version += 1;
        request.updated_at = now;
        store::save(root, &request)?;
        info!(
            id = %request.id,
            action = action.as_str(),
            status = %request.status_label(),
            version = request.version,
            "request updated"
        );

        if approved && request.request_type != RequestType::Complaint {
            employee.save(root)?;
            info!(employee = %employee.zan_id, status = %employee.status, "employee record updated");
        }

        request.notify_parties(root, actor, &employee);
        Ok(request)
    }

    /// Tell the submitter and the employee's own login about the new status.
    /// The actor is not notified of their own action. Delivery failures are
    /// logged; the transition itself is already stored.
    fn notify_parties(&self, root: &Path, actor: &User, employee: &Employee) {
        let message = format!(
            "Your {} request for {} has been updated to: {}.",
            self.request_type.short_label(),
            employee.name,
            self.status_label()
        );
        let link = self.request_type.href();

        let mut recipients = vec![self.submitted_by.clone()];
        match User::find_by_employee(root, &employee.id) {
            Ok(Some(linked)) if !recipients.contains(&linked.id) => recipients.push(linked.id),
            Ok(_) => {}
            Err(e) => warn!(id = %self.id, error = %e, "could not look up employee login"),
        }
        for user_id in recipients.iter().filter(|id| **id != actor.id) {
            if let Err(e) = notification::notify(root, user_id, &message, Some(link)) {
                warn!(id = %self.id, user = %user_id, error = %e, "notification not delivered");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_visible(root: &Path, actor: &User, id: &str) -> Result<Self> {
        let request = Self::load(root, id)?;
        if !request.visible_to(actor) {
            return Err(CsmsError::forbidden(format!(
                "{} cannot view request {id}",
                actor.role
            )));
        }
        Ok(request)
    }

    /// Requests `actor` may see, newest first.
    pub fn list_visible(root: &Path, actor: &User, filter: &RequestFilter) -> Result<Vec<Self>> {
        let mut hits: Vec<Self> = Self::list(root)?
            .into_iter()
            .filter(|r| r.visible_to(actor))
            .filter(|r| filter.request_type.map_or(true, |t| r.request_type == t))
            .filter(|r| filter.stage.map_or(true, |s| r.status.stage() == s))
            .filter(|r| {
                filter
                    .employee_id
                    .as_deref()
                    .map_or(true, |e| r.employee_id == e)
            })
            .filter(|r| !filter.assigned_to_me || r.awaits(actor))
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(hits)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Review workflow: status model, actions and the transition function.
//!
//! A request starts `PendingReview` with one reviewer role. The reviewer
//! either forwards it to the commission or returns it for correction; the
//! commission (or the forwarding role) decides. Submitters can withdraw an
//! undecided request and complainants can close their complaint.

use crate::details::RequestDetails;
use crate::error::{CsmsError, Result};
use crate::types::{RequestType, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ReviewStage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Initial,
    CommissionReview,
    Completed,
}

impl ReviewStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStage::Initial => "initial",
            ReviewStage::CommissionReview => "commission_review",
            ReviewStage::Completed => "completed",
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewStage {
    type Err = CsmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "initial" => Ok(ReviewStage::Initial),
            "commission_review" | "commission-review" => Ok(ReviewStage::CommissionReview),
            "completed" => Ok(ReviewStage::Completed),
            other => Err(CsmsError::validation(format!("unknown review stage '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    PendingReview { reviewer: Role },
    Returned { by: Role, reason: String },
    AwaitingCommission { forwarded_by: Role },
    ApprovedByCommission,
    RejectedByCommission { reason: String },
    Closed,
    Withdrawn,
}

impl Status {
    /// Human-readable status as shown in tracking and notifications.
    pub fn label(&self, request_type: RequestType) -> String {
        let complaint = request_type == RequestType::Complaint;
        match self {
            Status::PendingReview { reviewer } if request_type == RequestType::Resignation => {
                format!("Pending {reviewer} Acknowledgement")
            }
            Status::PendingReview { reviewer } => format!("Pending {reviewer} Review"),
            Status::Returned { by, .. } if complaint => {
                format!("Rejected by {by} - Awaiting Complainant Correction")
            }
            Status::Returned { by, .. } => format!("Rejected by {by} - Awaiting HRO Correction"),
            Status::AwaitingCommission { .. } => {
                "Request Received – Awaiting Commission Decision".to_string()
            }
            Status::ApprovedByCommission if complaint => {
                "Resolved - Approved by Commission".to_string()
            }
            Status::ApprovedByCommission => "Approved by Commission".to_string(),
            Status::RejectedByCommission { .. } if complaint => {
                "Resolved - Rejected by Commission".to_string()
            }
            Status::RejectedByCommission { .. } => "Rejected by Commission".to_string(),
            Status::Closed => "Closed - Satisfied".to_string(),
            Status::Withdrawn => "Withdrawn by Submitter".to_string(),
        }
    }

    pub fn stage(&self) -> ReviewStage {
        match self {
            Status::PendingReview { .. } | Status::Returned { .. } => ReviewStage::Initial,
            Status::AwaitingCommission { .. } => ReviewStage::CommissionReview,
            _ => ReviewStage::Completed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage() == ReviewStage::Completed
    }

    /// The reason recorded with the most recent rejection, if the request
    /// currently sits in a rejected state.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Status::Returned { reason, .. } | Status::RejectedByCommission { reason } => {
                Some(reason.as_str())
            }
            _ => None,
        }
    }

    /// True when `role` is expected to act next.
    pub fn awaits(&self, role: Role) -> bool {
        match self {
            Status::PendingReview { reviewer } => *reviewer == role,
            Status::AwaitingCommission { forwarded_by } => {
                role == Role::Cscs || *forwarded_by == role
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Forward,
    Return {
        reason: String,
    },
    /// Send a returned request back to its reviewer, optionally with
    /// corrected details and a note on what was rectified.
    Resubmit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<RequestDetails>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Decide {
        approve: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Close,
    Withdraw,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Return { .. } => "return",
            Action::Resubmit { .. } => "resubmit",
            Action::Decide { .. } => "decide",
            Action::Close => "close",
            Action::Withdraw => "withdraw",
        }
    }

    /// Reason text carried by the action, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Action::Return { reason } => Some(reason.as_str()),
            Action::Decide { reason, .. } | Action::Resubmit { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reviewer routing
// ---------------------------------------------------------------------------

/// Roles allowed to perform the initial review of `request_type`.
pub fn reviewers_for(request_type: RequestType) -> &'static [Role] {
    if request_type.is_disciplinary() {
        &[Role::Hhrmd, Role::Do]
    } else {
        &[Role::Hhrmd, Role::Hrmo]
    }
}

pub fn can_review(role: Role, request_type: RequestType) -> bool {
    reviewers_for(request_type).contains(&role)
}

pub fn default_reviewer(request_type: RequestType) -> Role {
    if request_type.is_disciplinary() {
        Role::Do
    } else {
        Role::Hrmo
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Who is acting, relative to the request being changed.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub request_type: RequestType,
    pub actor_role: Role,
    /// The actor submitted the request.
    pub is_submitter: bool,
    /// The actor may correct a returned request: the complainant for a
    /// complaint, an HRO of the employee's institution otherwise.
    pub may_correct: bool,
}

/// Compute the status that results from applying `action` to `current`.
///
/// Wrong-state actions yield `InvalidTransition`; wrong-actor actions yield
/// `Forbidden`; a missing mandatory reason yields `Validation`.
pub fn next_status(current: &Status, action: &Action, ctx: &TransitionContext) -> Result<Status> {
    let invalid = |reason: &str| CsmsError::InvalidTransition {
        from: current.label(ctx.request_type),
        action: action.as_str().to_string(),
        reason: reason.to_string(),
    };

    match (current, action) {
        (Status::PendingReview { reviewer }, Action::Forward) => {
            require_role(ctx.actor_role, *reviewer, "forward")?;
            Ok(Status::AwaitingCommission {
                forwarded_by: *reviewer,
            })
        }
        (_, Action::Forward) => Err(invalid("only requests pending review can be forwarded")),

        (Status::PendingReview { reviewer }, Action::Return { reason }) => {
            require_role(ctx.actor_role, *reviewer, "return")?;
            let reason = require_reason(reason)?;
            Ok(Status::Returned {
                by: *reviewer,
                reason,
            })
        }
        (_, Action::Return { .. }) => Err(invalid("only requests pending review can be returned")),

        (Status::Returned { by, .. }, Action::Resubmit { .. }) => {
            if !ctx.may_correct {
                return Err(CsmsError::forbidden(if ctx.request_type == RequestType::Complaint {
                    "only the complainant can resubmit a complaint"
                } else {
                    "only an HRO of the employee's institution can resubmit"
                }));
            }
            Ok(Status::PendingReview { reviewer: *by })
        }
        (_, Action::Resubmit { .. }) => Err(invalid("only returned requests can be resubmitted")),

        (Status::AwaitingCommission { forwarded_by }, Action::Decide { approve, reason }) => {
            if ctx.actor_role != Role::Cscs && ctx.actor_role != *forwarded_by {
                return Err(CsmsError::forbidden(format!(
                    "commission decisions are recorded by CSCS or {forwarded_by}"
                )));
            }
            if *approve {
                Ok(Status::ApprovedByCommission)
            } else {
                let reason = require_reason(reason.as_deref().unwrap_or(""))?;
                Ok(Status::RejectedByCommission { reason })
            }
        }
        (_, Action::Decide { .. }) => {
            Err(invalid("only requests awaiting the commission can be decided"))
        }

        (status, Action::Close) => {
            if ctx.request_type != RequestType::Complaint {
                return Err(invalid("only complaints can be closed"));
            }
            if status.is_terminal() {
                return Err(invalid("the complaint is already resolved"));
            }
            if !ctx.is_submitter {
                return Err(CsmsError::forbidden("only the complainant can close a complaint"));
            }
            Ok(Status::Closed)
        }

        (Status::PendingReview { .. } | Status::Returned { .. }, Action::Withdraw) => {
            if !ctx.is_submitter {
                return Err(CsmsError::forbidden("only the submitter can withdraw a request"));
            }
            Ok(Status::Withdrawn)
        }
        (_, Action::Withdraw) => Err(invalid("requests can only be withdrawn before forwarding")),
    }
}

fn require_role(actor: Role, assigned: Role, verb: &str) -> Result<()> {
    if actor != assigned {
        return Err(CsmsError::forbidden(format!(
            "this request is assigned to {assigned}; {actor} cannot {verb} it"
        )));
    }
    Ok(())
}

fn require_reason(reason: &str) -> Result<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CsmsError::validation("a reason is required when rejecting"));
    }
    Ok(reason.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

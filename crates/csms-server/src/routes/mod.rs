pub mod auth;
pub mod config;
pub mod dashboard;
pub mod employees;
pub mod events;
pub mod institutions;
pub mod notifications;
pub mod reports;
pub mod requests;
pub mod track;
pub mod users;

use chrono::NaiveDate;
use csms_core::types::Role;
use csms_core::user::User;

use crate::error::AppError;

/// Calendar day used for eligibility checks and outcomes.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn require_role(actor: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "{} is not permitted to perform this action",
            actor.role
        )))
    }
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError(anyhow::anyhow!("task join error: {e}"))
}

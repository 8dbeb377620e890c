pub mod config;
pub mod dashboard;
pub mod employee;
pub mod init;
pub mod institution;
pub mod report;
pub mod request;
pub mod serve;
pub mod user;

use anyhow::Context;
use csms_core::user::User;
use std::path::Path;

/// Look up the account a command acts as (`--as <username>`).
pub fn resolve_actor(root: &Path, username: &str) -> anyhow::Result<User> {
    let user = User::find_by_username(root, username)
        .context("failed to load users")?
        .with_context(|| format!("no user named '{username}'"))?;
    if !user.active {
        anyhow::bail!("user '{username}' is deactivated");
    }
    Ok(user)
}

/// Today's date in local time.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

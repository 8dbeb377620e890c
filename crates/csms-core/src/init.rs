use crate::config::Config;
use crate::error::Result;
use crate::institution::Institution;
use crate::io;
use crate::paths;
use crate::state::State;
use crate::types::Role;
use crate::user::{NewUser, User};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// The institution new admin accounts belong to.
const COMMISSION_INSTITUTION: &str = "KAMISHENI YA UTUMISHI WA UMMA";

pub struct InitOptions {
    pub commission_name: String,
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub created_config: bool,
    pub created_state: bool,
    pub institutions_seeded: usize,
    /// Id of the admin account, when one was created.
    pub admin_created: Option<String>,
}

/// Create the data tree, config and state, load the standard institutions
/// and an ADMIN account. Running it again only fills in what is missing.
pub fn init(root: &Path, opts: &InitOptions) -> Result<InitReport> {
    for dir in paths::DATA_DIRS {
        io::ensure_dir(&root.join(dir))?;
    }

    let created_config = io::write_if_missing(
        &paths::config_path(root),
        serde_yaml::to_string(&Config::new(&opts.commission_name))?.as_bytes(),
    )?;
    let created_state = io::write_if_missing(
        &paths::state_path(root),
        serde_yaml::to_string(&State::new())?.as_bytes(),
    )?;

    let institutions_seeded = Institution::seed_default(root)?;

    let admin_created = if User::find_by_username(root, &opts.admin_username)?.is_some() {
        None
    } else {
        let institutions = Institution::list(root)?;
        let home = institutions
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(COMMISSION_INSTITUTION))
            .or_else(|| institutions.first())
            .map(|i| i.id.clone())
            .unwrap_or_default();
        let admin = User::create(
            root,
            NewUser {
                name: "System Administrator".to_string(),
                username: opts.admin_username.clone(),
                password: opts.admin_password.clone(),
                role: Role::Admin,
                institution_id: home,
                employee_id: None,
            },
        )?;
        Some(admin.id)
    };

    info!(
        root = %root.display(),
        created_config,
        institutions_seeded,
        "store initialised"
    );
    Ok(InitReport {
        created_config,
        created_state,
        institutions_seeded,
        admin_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn opts() -> InitOptions {
        InitOptions {
            commission_name: "Civil Service Commission".into(),
            admin_username: "admin".into(),
            admin_password: "admin123".into(),
        }
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let first = init(dir.path(), &opts()).unwrap();
        assert!(first.created_config);
        assert!(first.created_state);
        assert_eq!(first.institutions_seeded, 41);
        assert!(first.admin_created.is_some());

        let second = init(dir.path(), &opts()).unwrap();
        assert!(!second.created_config);
        assert_eq!(second.institutions_seeded, 0);
        assert!(second.admin_created.is_none());

        let admin = User::authenticate(dir.path(), "admin", "admin123").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.institution_id, "inst_5");
        assert_eq!(
            Config::load(dir.path()).unwrap().commission.name,
            "Civil Service Commission"
        );
    }
}

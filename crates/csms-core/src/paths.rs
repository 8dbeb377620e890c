use crate::error::{CsmsError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CSMS_DIR: &str = ".csms";
pub const INSTITUTIONS_DIR: &str = ".csms/institutions";
pub const USERS_DIR: &str = ".csms/users";
pub const EMPLOYEES_DIR: &str = ".csms/employees";
pub const REQUESTS_DIR: &str = ".csms/requests";
pub const NOTIFICATIONS_DIR: &str = ".csms/notifications";

pub const CONFIG_FILE: &str = ".csms/config.yaml";
pub const STATE_FILE: &str = ".csms/state.yaml";

/// Every directory `csms init` creates.
pub const DATA_DIRS: &[&str] = &[
    INSTITUTIONS_DIR,
    USERS_DIR,
    EMPLOYEES_DIR,
    REQUESTS_DIR,
    NOTIFICATIONS_DIR,
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn csms_dir(root: &Path) -> PathBuf {
    root.join(CSMS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

/// `<root>/<dir>/<id>.yaml`
pub fn record_path(root: &Path, dir: &str, id: &str) -> PathBuf {
    root.join(dir).join(format!("{id}.yaml"))
}

pub fn notifications_path(root: &Path, user_id: &str) -> PathBuf {
    record_path(root, NOTIFICATIONS_DIR, user_id)
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").unwrap())
}

/// Record ids become file names, so reject anything that could escape the
/// data directory.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(CsmsError::validation(format!("invalid identifier '{id}'")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["inst_1", "a", "6f1c2d3e-0000-4000-8000-000000000000", "REQ-12"] {
            validate_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "../etc", "has space", "_leading", "a/b"] {
            assert!(validate_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/srv/csms");
        assert_eq!(
            config_path(root),
            PathBuf::from("/srv/csms/.csms/config.yaml")
        );
        assert_eq!(
            record_path(root, USERS_DIR, "u1"),
            PathBuf::from("/srv/csms/.csms/users/u1.yaml")
        );
        assert_eq!(
            notifications_path(root, "u1"),
            PathBuf::from("/srv/csms/.csms/notifications/u1.yaml")
        );
    }
}

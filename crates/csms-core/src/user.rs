use crate::employee::Employee;
use crate::error::{CsmsError, Result};
use crate::institution::Institution;
use crate::password;
use crate::paths;
use crate::store::{self, Record};
use crate::types::Role;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

const MIN_NAME_LEN: usize = 2;
const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_re() -> &'static Regex {
    USERNAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9._-]+$").unwrap())
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub institution_id: String,
    /// Set for EMPLOYEE accounts; links the login to an employee record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Record for User {
    const DIR: &'static str = paths::USERS_DIR;

    fn id(&self) -> &str {
        &self.id
    }

    fn not_found(id: &str) -> CsmsError {
        CsmsError::UserNotFound(id.to_string())
    }
}

/// A user as exposed to API and CLI callers: never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub institution_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            name: u.name.clone(),
            role: u.role,
            institution_id: u.institution_id.clone(),
            employee_id: u.employee_id.clone(),
            active: u.active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub institution_id: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub institution_id: Option<String>,
    pub employee_id: Option<String>,
    pub active: Option<bool>,
}

impl User {
    pub fn create(root: &Path, new: NewUser) -> Result<Self> {
        let name = check_name(&new.name)?;
        let username = check_username(&new.username)?;
        check_password(&new.password)?;
        if Self::find_by_username(root, &username)?.is_some() {
            return Err(CsmsError::UsernameTaken(username));
        }
        check_links(root, new.role, &new.institution_id, new.employee_id.as_deref())?;

        let now = Utc::now();
        let user = Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            name,
            role: new.role,
            institution_id: new.institution_id,
            employee_id: new.employee_id,
            active: true,
            password_hash: password::hash(&new.password)?,
            created_at: now,
            updated_at: now,
        };
        store::save(root, &user)?;
        info!(id = %user.id, username = %user.username, role = %user.role, "user created");
        Ok(user)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::load(root, id)
    }

    /// All users sorted by display name.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list(root)?;
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    pub fn find_by_username(root: &Path, username: &str) -> Result<Option<Self>> {
        let wanted = username.trim().to_lowercase();
        Ok(store::list::<Self>(root)?
            .into_iter()
            .find(|u| u.username == wanted))
    }

    /// The active login linked to `employee_id`, if any.
    pub fn find_by_employee(root: &Path, employee_id: &str) -> Result<Option<Self>> {
        Ok(store::list::<Self>(root)?
            .into_iter()
            .find(|u| u.active && u.employee_id.as_deref() == Some(employee_id)))
    }

    /// Apply a partial update with the same rules as `create`.
    pub fn update(root: &Path, id: &str, update: UserUpdate) -> Result<Self> {
        let mut user = Self::load(root, id)?;

        if let Some(name) = update.name {
            user.name = check_name(&name)?;
        }
        if let Some(username) = update.username {
            let username = check_username(&username)?;
            if let Some(other) = Self::find_by_username(root, &username)? {
                if other.id != user.id {
                    return Err(CsmsError::UsernameTaken(username));
                }
            }
            user.username = username;
        }
        if let Some(pw) = update.password {
            check_password(&pw)?;
            user.password_hash = password::hash(&pw)?;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(inst) = update.institution_id {
            user.institution_id = inst;
        }
        if let Some(emp) = update.employee_id {
            user.employee_id = if emp.trim().is_empty() { None } else { Some(emp) };
        }
        if let Some(active) = update.active {
            user.active = active;
        }
        check_links(root, user.role, &user.institution_id, user.employee_id.as_deref())?;

        user.updated_at = Utc::now();
        store::save(root, &user)?;
        info!(id = %user.id, "user updated");
        Ok(user)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        store::remove::<Self>(root, id)?;
        info!(id, "user deleted");
        Ok(())
    }

    /// Verify credentials. Every failure yields the same `Unauthorized`.
    pub fn authenticate(root: &Path, username: &str, pw: &str) -> Result<Self> {
        let Some(user) = Self::find_by_username(root, username)? else {
            // Keep the cost of a miss close to the cost of a hit.
            let _ = password::verify(pw, "v1$10000$AAAAAAAAAAAAAAAAAAAAAA==$AA==");
            warn!(username, "login failed");
            return Err(CsmsError::Unauthorized);
        };
        if !user.active || !password::verify(pw, &user.password_hash) {
            warn!(username, "login failed");
            return Err(CsmsError::Unauthorized);
        }
        info!(id = %user.id, "login succeeded");
        Ok(user)
    }

    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(CsmsError::validation(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn check_username(username: &str) -> Result<String> {
    let username = username.trim().to_lowercase();
    if username.len() < MIN_USERNAME_LEN {
        return Err(CsmsError::validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if !username_re().is_match(&username) {
        return Err(CsmsError::validation(
            "username may only contain a-z, 0-9, '.', '_' and '-'",
        ));
    }
    Ok(username)
}

fn check_password(pw: &str) -> Result<()> {
    if pw.chars().count() < MIN_PASSWORD_LEN {
        return Err(CsmsError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn check_links(root: &Path, role: Role, institution_id: &str, employee_id: Option<&str>) -> Result<()> {
    Institution::load(root, institution_id)?;
    match employee_id {
        Some(emp) => {
            Employee::load(root, emp)?;
        }
        None if role == Role::Employee => {
            return Err(CsmsError::validation(
                "EMPLOYEE accounts must be linked to an employee record",
            ));
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Institution) {
        let dir = TempDir::new().unwrap();
        State::new().save(dir.path()).unwrap();
        let inst = Institution::create(dir.path(), "Wizara ya Afya").unwrap();
        (dir, inst)
    }

    fn new_user(inst: &Institution, username: &str) -> NewUser {
        NewUser {
            name: "Asha Juma".into(),
            username: username.into(),
            password: "secret1".into(),
            role: Role::Hro,
            institution_id: inst.id.clone(),
            employee_id: None,
        }
    }

    #[test]
    fn create_normalises_username_and_hides_hash() {
        let (dir, inst) = setup();
        let user = User::create(dir.path(), new_user(&inst, " Asha.J ")).unwrap();
        assert_eq!(user.username, "asha.j");
        let json = serde_json::to_string(&user.view()).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let (dir, inst) = setup();
        User::create(dir.path(), new_user(&inst, "asha")).unwrap();
        assert!(matches!(
            User::create(dir.path(), new_user(&inst, "ASHA")),
            Err(CsmsError::UsernameTaken(_))
        ));
    }

    #[test]
    fn field_rules() {
        let (dir, inst) = setup();
        let mut u = new_user(&inst, "ab");
        assert!(User::create(dir.path(), u.clone()).is_err());
        u.username = "has space".into();
        assert!(User::create(dir.path(), u.clone()).is_err());
        u.username = "okname".into();
        u.password = "12345".into();
        assert!(User::create(dir.path(), u.clone()).is_err());
        u.password = "123456".into();
        u.name = "A".into();
        assert!(User::create(dir.path(), u.clone()).is_err());
        u.name = "Al".into();
        u.institution_id = "missing".into();
        assert!(matches!(
            User::create(dir.path(), u),
            Err(CsmsError::InstitutionNotFound(_))
        ));
    }

    #[test]
    fn employee_role_needs_employee_link() {
        let (dir, inst) = setup();
        let mut u = new_user(&inst, "emp");
        u.role = Role::Employee;
        assert!(matches!(
            User::create(dir.path(), u),
            Err(CsmsError::Validation(_))
        ));
    }

    #[test]
    fn authenticate_paths() {
        let (dir, inst) = setup();
        let user = User::create(dir.path(), new_user(&inst, "asha")).unwrap();
        assert_eq!(
            User::authenticate(dir.path(), "asha", "secret1").unwrap().id,
            user.id
        );
        assert!(matches!(
            User::authenticate(dir.path(), "asha", "wrong!!"),
            Err(CsmsError::Unauthorized)
        ));
        assert!(matches!(
            User::authenticate(dir.path(), "nobody", "secret1"),
            Err(CsmsError::Unauthorized)
        ));

        User::update(
            dir.path(),
            &user.id,
            UserUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(matches!(
            User::authenticate(dir.path(), "asha", "secret1"),
            Err(CsmsError::Unauthorized)
        ));
    }

    #[test]
    fn update_rehashes_password_and_checks_username() {
        let (dir, inst) = setup();
        let a = User::create(dir.path(), new_user(&inst, "asha")).unwrap();
        User::create(dir.path(), new_user(&inst, "bakari")).unwrap();

        assert!(matches!(
            User::update(
                dir.path(),
                &a.id,
                UserUpdate {
                    username: Some("bakari".into()),
                    ..Default::default()
                }
            ),
            Err(CsmsError::UsernameTaken(_))
        ));

        User::update(
            dir.path(),
            &a.id,
            UserUpdate {
                password: Some("newpass".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(User::authenticate(dir.path(), "asha", "newpass").is_ok());
    }

    #[test]
    fn institution_with_users_cannot_be_deleted() {
        let (dir, inst) = setup();
        let user = User::create(dir.path(), new_user(&inst, "asha")).unwrap();
        assert!(matches!(
            Institution::delete(dir.path(), &inst.id),
            Err(CsmsError::InstitutionInUse(_))
        ));
        User::delete(dir.path(), &user.id).unwrap();
        Institution::delete(dir.path(), &inst.id).unwrap();
    }
}

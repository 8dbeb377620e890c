use crate::error::{CsmsError, Result};
use crate::paths;
use crate::store::{self, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Oldest notifications beyond this many are dropped on write.
const MAX_STORED: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// All notifications of one user, stored as a single document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Inbox {
    user_id: String,
    #[serde(default)]
    notifications: Vec<Notification>,
}

impl Record for Inbox {
    const DIR: &'static str = paths::NOTIFICATIONS_DIR;

    fn id(&self) -> &str {
        &self.user_id
    }

    fn not_found(id: &str) -> CsmsError {
        CsmsError::UserNotFound(id.to_string())
    }
}

impl Inbox {
    fn load_or_empty(root: &Path, user_id: &str) -> Result<Self> {
        if store::exists::<Self>(root, user_id) {
            store::load(root, user_id)
        } else {
            Ok(Self {
                user_id: user_id.to_string(),
                notifications: Vec::new(),
            })
        }
    }
}

pub fn notify(root: &Path, user_id: &str, message: &str, link: Option<&str>) -> Result<Notification> {
    let mut inbox = Inbox::load_or_empty(root, user_id)?;
    let n = Notification {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        message: message.to_string(),
        link: link.map(str::to_string),
        is_read: false,
        created_at: Utc::now(),
    };
    inbox.notifications.push(n.clone());
    if inbox.notifications.len() > MAX_STORED {
        let excess = inbox.notifications.len() - MAX_STORED;
        inbox.notifications.drain(..excess);
    }
    store::save(root, &inbox)?;
    debug!(user_id, id = %n.id, "notification stored");
    Ok(n)
}

/// The newest `limit` notifications, newest first.
pub fn recent(root: &Path, user_id: &str, limit: usize) -> Result<Vec<Notification>> {
    let inbox = Inbox::load_or_empty(root, user_id)?;
    let mut all = inbox.notifications;
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    all.truncate(limit);
    Ok(all)
}

pub fn unread_count(root: &Path, user_id: &str) -> Result<usize> {
    let inbox = Inbox::load_or_empty(root, user_id)?;
    Ok(inbox.notifications.iter().filter(|n| !n.is_read).count())
}

/// Mark the caller's own notifications read. Ids that belong to someone
/// else, or are already read, are ignored. Returns how many changed.
pub fn mark_read(root: &Path, user_id: &str, ids: &[String]) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut inbox = Inbox::load_or_empty(root, user_id)?;
    let mut changed = 0;
    for n in inbox.notifications.iter_mut() {
        if !n.is_read && ids.iter().any(|id| *id == n.id) {
            n.is_read = true;
            changed += 1;
        }
    }
    if changed > 0 {
        store::save(root, &inbox)?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use tempfile::TempDir;

    fn root() -> TempDir {
        let dir = TempDir::new().unwrap();
        State::new().save(dir.path()).unwrap();
        dir
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let dir = root();
        for i in 0..3 {
            notify(dir.path(), "u1", &format!("m{i}"), None).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        let got = recent(dir.path(), "u1", 2).unwrap();
        let msgs: Vec<_> = got.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(msgs, vec!["m2", "m1"]);
        assert!(recent(dir.path(), "nobody", 20).unwrap().is_empty());
    }

    #[test]
    fn mark_read_only_touches_own_notifications() {
        let dir = root();
        let mine = notify(dir.path(), "u1", "hello", Some("/dashboard")).unwrap();
        let theirs = notify(dir.path(), "u2", "other", None).unwrap();

        let ids = vec![mine.id.clone(), theirs.id.clone()];
        assert_eq!(mark_read(dir.path(), "u1", &ids).unwrap(), 1);
        assert_eq!(mark_read(dir.path(), "u1", &ids).unwrap(), 0);
        assert_eq!(unread_count(dir.path(), "u1").unwrap(), 0);
        assert_eq!(unread_count(dir.path(), "u2").unwrap(), 1);
        assert_eq!(mark_read(dir.path(), "u2", &[]).unwrap(), 0);
    }
}

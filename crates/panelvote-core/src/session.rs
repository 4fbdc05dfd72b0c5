//! Logged-in user session
//!
//! A session is created by a successful login and destroyed by logout. It is
//! persisted as `session.json` in the config directory so that it survives
//! between invocations.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::criteria::Criterion;
use crate::error::{PanelError, Result};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Panelist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Panelist => write!(f, "panelist"),
        }
    }
}

/// A verified user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
    /// Display name; defaults to the username
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(flatten)]
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
    /// Scores from the last accepted vote in this session
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ballot: BTreeMap<Criterion, u8>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            logged_in_at: Utc::now(),
            ballot: BTreeMap::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Fail unless the session holds `role`
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(PanelError::WrongRole {
                required: role.to_string(),
                actual: self.user.role.to_string(),
            })
        }
    }
}

/// File-backed session persistence
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the standard config directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(ClientConfig::config_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current session, if any
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| PanelError::io_operation("read session", &self.path, e))?;
        let session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    /// Current session, or `NotLoggedIn`
    pub fn require(&self) -> Result<Session> {
        self.load()?.ok_or(PanelError::NotLoggedIn)
    }

    /// Begin a session for a verified user, replacing any previous one
    pub fn login(&self, user: User) -> Result<Session> {
        let session = Session::new(user);
        self.save(&session)?;
        debug!(user = %session.user.username, role = %session.user.role, "session started");
        Ok(session)
    }

    /// Write `session` back, e.g. after its ballot changed
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| PanelError::io_operation("create config directory", dir, e))?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)
            .map_err(|e| PanelError::io_operation("write session", &self.path, e))
    }

    /// End the session. Returns whether one existed.
    pub fn logout(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .map_err(|e| PanelError::io_operation("remove session", &self.path, e))?;
        debug!("session ended");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user(role: Role) -> User {
        User {
            username: "zeynep".into(),
            role,
            name: "Zeynep".into(),
        }
    }

    #[test]
    fn test_login_load_logout() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        assert!(matches!(store.require(), Err(PanelError::NotLoggedIn)));

        let session = store.login(user(Role::Admin)).unwrap();
        assert_eq!(store.load().unwrap(), Some(session.clone()));
        assert_eq!(store.require().unwrap().username(), "zeynep");

        assert!(store.logout().unwrap());
        assert!(!store.logout().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_session_file_shape() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.login(user(Role::Panelist)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["username"], "zeynep");
        assert_eq!(raw["role"], "panelist");
        assert!(raw["loggedInAt"].is_string());
        assert!(raw.get("ballot").is_none());
    }

    #[test]
    fn test_save_keeps_ballot() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut session = store.login(user(Role::Panelist)).unwrap();
        session.ballot = BTreeMap::from([(Criterion::Yontem, 5), (Criterion::OzgunDeger, 1)]);
        store.save(&session).unwrap();

        let loaded = store.require().unwrap();
        assert_eq!(loaded.ballot[&Criterion::Yontem], 5);
        assert_eq!(loaded, session);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["ballot"]["yontem"], 5);
    }

    #[test]
    fn test_require_role() {
        let session = Session::new(user(Role::Panelist));
        assert!(session.require_role(Role::Panelist).is_ok());
        let err = session.require_role(Role::Admin).unwrap_err();
        assert!(matches!(err, PanelError::WrongRole { .. }));
    }

    #[test]
    fn test_corrupt_session_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            SessionStore::new(path).load(),
            Err(PanelError::Json(_))
        ));
    }
}

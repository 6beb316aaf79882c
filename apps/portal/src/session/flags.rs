//! Legacy `isLoggedIn` / `username` flags persisted next to the app.
//!
//! Older screens read these instead of the session store. They are kept in
//! sync from a store subscription and are never used for authorization.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::identity::Identity;
use crate::session::{SessionStore, Subscription};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFlags {
    pub is_logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SessionFlags {
    pub fn for_identity(identity: Option<&Identity>) -> Self {
        match identity {
            Some(identity) => Self {
                is_logged_in: true,
                username: Some(identity.handle.clone()),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlagsFile {
    path: PathBuf,
}

impl FlagsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as "logged out".
    pub fn read(&self) -> SessionFlags {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn write(&self, flags: &SessionFlags) -> Result<()> {
        let raw = serde_json::to_string_pretty(flags)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write session flags to {}", self.path.display()))
    }

    /// Keeps the file in step with `store` until the subscription is dropped.
    ///
    /// Writes happen inline on the store's emit path with a blocking
    /// `fs::write`. Keeping them inline preserves emission order; the
    /// document is a few dozen bytes.
    pub fn mirror(self, store: &SessionStore) -> Subscription {
        store.subscribe(move |identity| {
            if let Err(e) = self.write(&SessionFlags::for_identity(identity)) {
                warn!("{e:#}");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::identity::memory::InMemoryIdentityProvider;

    #[test]
    fn test_missing_file_reads_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let flags = FlagsFile::new(dir.path().join("absent.json"));
        assert_eq!(flags.read(), SessionFlags::default());
    }

    #[test]
    fn test_wire_names() {
        let flags = SessionFlags {
            is_logged_in: true,
            username: Some("ada".to_string()),
        };
        let json = serde_json::to_value(&flags).unwrap();
        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(json["username"], "ada");
    }

    #[tokio::test]
    async fn test_mirror_tracks_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        let provider = Arc::new(InMemoryIdentityProvider::new().with_account(
            "ada@example.com",
            "hunter22",
            "ada",
        ));
        let store = SessionStore::new(provider);
        let _sub = FlagsFile::new(&path).mirror(&store);
        let reader = FlagsFile::new(&path);

        assert!(!reader.read().is_logged_in);

        store.sign_in("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(reader.read().username.as_deref(), Some("ada"));

        store.sign_out().await.unwrap();
        assert_eq!(reader.read(), SessionFlags::default());
    }
}

//! Identity provider: resolves the user id records are scoped to.
//!
//! Sign-in is either anonymous or with an externally injected token. The
//! [`LocalIdentityProvider`] keeps the anonymous user id in a small JSON file
//! so the same user sees the same records across runs; an injected token
//! names the user id directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::{
    error::{Result, TimelineError},
    models::OwnerId,
};

/// Abstraction over identity providers.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with `token` when given, anonymously otherwise.
    async fn sign_in(&self, token: Option<&str>) -> Result<OwnerId>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    uid: String,
}

/// Identity provider backed by a local file.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    state_path: PathBuf,
}

impl LocalIdentityProvider {
    pub fn new<P: AsRef<Path>>(state_path: P) -> Self {
        Self {
            state_path: state_path.as_ref().to_path_buf(),
        }
    }

    /// Returns the default identity file path following the XDG Base
    /// Directory specification: `$XDG_DATA_HOME/growthline/identity.json`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("growthline")
            .place_data_file("identity.json")
            .map_err(|e| TimelineError::XdgDirectory(e.to_string()))
    }

    fn load_or_create_anonymous(path: &Path) -> Result<OwnerId> {
        let fs_err = |source| TimelineError::FileSystem {
            path: path.to_path_buf(),
            source,
        };

        if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(fs_err)?;
            let stored: StoredIdentity = serde_json::from_str(&raw)?;
            debug!("Restored anonymous identity from {}", path.display());
            return Ok(OwnerId(stored.uid));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| TimelineError::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let stored = StoredIdentity {
            uid: uuid::Uuid::new_v4().simple().to_string(),
        };
        std::fs::write(path, serde_json::to_string(&stored)?).map_err(fs_err)?;
        info!("Created anonymous identity at {}", path.display());
        Ok(OwnerId(stored.uid))
    }
}

/// Validates a user id carried by an injected token.
fn owner_from_token(token: &str) -> Result<OwnerId> {
    let uid = token.trim();
    if uid.is_empty() || uid.contains('/') {
        return Err(TimelineError::validation("token")
            .with_reason("the injected token does not name a usable user id"));
    }
    Ok(OwnerId(uid.to_string()))
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, token: Option<&str>) -> Result<OwnerId> {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let owner = owner_from_token(token)?;
            debug!("Signed in with injected token");
            return Ok(owner);
        }

        let path = self.state_path.clone();
        task::spawn_blocking(move || Self::load_or_create_anonymous(&path))
            .await
            .map_err(|e| TimelineError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_anonymous_identity_is_stable_across_sign_ins() {
        let temp_dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path().join("nested/identity.json"));

        let first = provider.sign_in(None).await.unwrap();
        let second = provider.sign_in(None).await.unwrap();

        assert_eq!(first, second);
        assert!(!first.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_token_names_the_user() {
        let temp_dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path().join("identity.json"));

        let owner = provider.sign_in(Some(" user-42 ")).await.unwrap();
        assert_eq!(owner.as_str(), "user-42");
        assert!(!temp_dir.path().join("identity.json").exists());
    }

    #[tokio::test]
    async fn test_blank_token_falls_back_to_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path().join("identity.json"));

        provider.sign_in(Some("   ")).await.unwrap();
        assert!(temp_dir.path().join("identity.json").exists());
    }

    #[tokio::test]
    async fn test_token_with_path_separator_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let provider = LocalIdentityProvider::new(temp_dir.path().join("identity.json"));
        assert!(provider.sign_in(Some("a/b")).await.is_err());
    }
}

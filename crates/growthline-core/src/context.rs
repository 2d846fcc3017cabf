//! Readiness context: the opened store plus the signed-in owner.
//!
//! The board receives an [`AppContext`] once identity and store are
//! initialized; until then every data operation reports `NotReady`. A failed
//! sign-in is not fatal: the context is still built, with no owner, and record
//! operations report `NotAuthenticated`.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::{debug, warn};

use crate::{
    config::Settings,
    error::{Result, TimelineError},
    identity::{IdentityProvider, LocalIdentityProvider},
    models::{AppNamespace, OwnerId},
    store::{DocumentStore, SqliteDocumentStore},
};

/// Initialized store and identity.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn DocumentStore>,
    namespace: AppNamespace,
    owner: Option<OwnerId>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        namespace: AppNamespace,
        owner: Option<OwnerId>,
    ) -> Self {
        Self {
            store,
            namespace,
            owner,
        }
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    pub fn namespace(&self) -> &AppNamespace {
        &self.namespace
    }

    /// The signed-in user, if sign-in succeeded.
    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("namespace", &self.namespace)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Builder for creating an [`AppContext`].
#[derive(Default)]
pub struct AppContextBuilder {
    database_path: Option<PathBuf>,
    identity_path: Option<PathBuf>,
    namespace: AppNamespace,
    auth_token: Option<String>,
    poll_interval: Option<Duration>,
    store: Option<Arc<dyn DocumentStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from resolved runtime settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            database_path: settings.store.database_path.clone(),
            identity_path: settings.store.identity_path.clone(),
            namespace: settings.namespace.clone(),
            auth_token: settings.auth_token.clone(),
            ..Self::default()
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses `$XDG_DATA_HOME/growthline/growthline.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets a custom identity file path.
    pub fn with_identity_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.identity_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    pub fn with_namespace(mut self, namespace: AppNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Signs in with this token instead of anonymously.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.auth_token = token;
        }
        self
    }

    /// Subscription poll interval of the SQLite store.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Uses an already opened store instead of the SQLite file.
    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses a custom identity provider.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Opens the store and signs in.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::FileSystem`, `TimelineError::XdgDirectory` or
    /// `TimelineError::Store` if the store cannot be opened. Sign-in failures
    /// do not fail the build.
    pub async fn build(self) -> Result<AppContext> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let path = match self.database_path {
                    Some(path) => path,
                    None => SqliteDocumentStore::default_path()?,
                };
                let mut sqlite = SqliteDocumentStore::open(path).await?;
                if let Some(interval) = self.poll_interval {
                    sqlite = sqlite.with_poll_interval(interval);
                }
                Arc::new(sqlite) as Arc<dyn DocumentStore>
            }
        };

        let identity: Option<Arc<dyn IdentityProvider>> = match self.identity {
            Some(identity) => Some(identity),
            None => {
                let path = match self.identity_path {
                    Some(path) => Ok(path),
                    None => LocalIdentityProvider::default_path(),
                };
                match path {
                    Ok(path) => Some(Arc::new(LocalIdentityProvider::new(path))),
                    Err(e) => {
                        warn!("No identity file location available: {e}");
                        None
                    }
                }
            }
        };

        let owner = match identity {
            Some(identity) => sign_in(identity.as_ref(), self.auth_token.as_deref()).await,
            None => None,
        };

        Ok(AppContext::new(store, self.namespace, owner))
    }
}

async fn sign_in(identity: &dyn IdentityProvider, token: Option<&str>) -> Option<OwnerId> {
    match identity.sign_in(token).await {
        Ok(owner) => {
            debug!("Signed in as {owner}");
            Some(owner)
        }
        Err(e) => {
            warn!("Sign-in failed, continuing without a user: {e}");
            None
        }
    }
}

/// Returns `TimelineError::NotReady` when no context is attached.
pub(crate) fn require_context(context: Option<&AppContext>) -> Result<&AppContext> {
    context.ok_or_else(|| TimelineError::not_ready("Authentication or database"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_build_opens_store_and_signs_in_anonymously() {
        let temp_dir = TempDir::new().unwrap();
        let context = AppContextBuilder::new()
            .with_database_path(Some(temp_dir.path().join("g.db")))
            .with_identity_path(Some(temp_dir.path().join("identity.json")))
            .build()
            .await
            .unwrap();

        assert!(context.owner().is_some());
        assert_eq!(context.namespace().as_str(), AppNamespace::DEFAULT);
        assert!(temp_dir.path().join("g.db").exists());
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_owner_empty() {
        let temp_dir = TempDir::new().unwrap();
        let context = AppContextBuilder::new()
            .with_database_path(Some(temp_dir.path().join("g.db")))
            .with_identity_path(Some(temp_dir.path().join("identity.json")))
            .with_auth_token(Some("not/a/user".to_string()))
            .build()
            .await
            .unwrap();

        assert!(context.owner().is_none());
    }

    #[test]
    fn test_missing_context_is_not_ready() {
        let err = require_context(None).unwrap_err();
        assert!(matches!(err, TimelineError::NotReady { .. }));
    }
}

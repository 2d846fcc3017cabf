//! Runtime settings sourced from the process environment.
//!
//! Every value has a fallback so the tool runs locally without any
//! configuration. Front ends apply their own flags on top.
//!
//! | Variable                    | Meaning                                   |
//! |-----------------------------|-------------------------------------------|
//! | `GROWTHLINE_STORE_CONFIG`   | JSON store descriptor (`databasePath`)    |
//! | `GROWTHLINE_APP_ID`         | application namespace                     |
//! | `GROWTHLINE_AUTH_TOKEN`     | injected identity token                   |
//! | `GEMINI_API_KEY`            | generation endpoint credential            |
//! | `GROWTHLINE_API_BASE_URL`   | generation endpoint API root              |
//! | `GROWTHLINE_MODEL`          | generation model name                     |

use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    error::{Result, ResultExt},
    generator::GeminiConfig,
    models::AppNamespace,
};

pub const STORE_CONFIG_VAR: &str = "GROWTHLINE_STORE_CONFIG";
pub const APP_ID_VAR: &str = "GROWTHLINE_APP_ID";
pub const AUTH_TOKEN_VAR: &str = "GROWTHLINE_AUTH_TOKEN";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const API_BASE_URL_VAR: &str = "GROWTHLINE_API_BASE_URL";
pub const MODEL_VAR: &str = "GROWTHLINE_MODEL";

/// Store connection descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDescriptor {
    /// SQLite file holding the documents; XDG default when absent
    pub database_path: Option<PathBuf>,
    /// Identity file; XDG default when absent
    pub identity_path: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Clone, Default)]
pub struct Settings {
    pub store: StoreDescriptor,
    pub namespace: AppNamespace,
    pub auth_token: Option<String>,
    pub api_key: Option<String>,
    pub generator: GeminiConfig,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("store", &self.store)
            .field("namespace", &self.namespace)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generator", &self.generator)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Configuration` if the store descriptor is not
    /// valid JSON.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match var(STORE_CONFIG_VAR) {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(format!("Invalid {STORE_CONFIG_VAR}"))?,
            None => StoreDescriptor::default(),
        };

        let mut generator = GeminiConfig::default();
        if let Some(base_url) = var(API_BASE_URL_VAR) {
            generator.base_url = base_url;
        }
        if let Some(model) = var(MODEL_VAR) {
            generator.model = model;
        }

        Ok(Self {
            store,
            namespace: var(APP_ID_VAR).map(AppNamespace).unwrap_or_default(),
            auth_token: var(AUTH_TOKEN_VAR),
            api_key: var(API_KEY_VAR),
            generator,
        })
    }
}

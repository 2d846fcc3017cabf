//! Strongly-typed identifiers for records, owners and namespaces.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-generated identifier of a timeline record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generates a fresh random identifier. Collisions are not defended
    /// against.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User id issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static partition key separating deployments that share one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppNamespace(pub String);

impl AppNamespace {
    /// Namespace used when nothing is configured.
    pub const DEFAULT: &'static str = "default-growth-timeline-app";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AppNamespace {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl From<&str> for AppNamespace {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AppNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

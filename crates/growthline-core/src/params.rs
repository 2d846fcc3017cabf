//! Parameter structures for growthline operations.
//!
//! These structures are shared by every front end (the CLI today) without
//! framework-specific derives. Interface layers define their own argument
//! types (clap derives, help text) and convert into these via `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Board / Records
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TimelineError},
    models::{BusinessInputs, RecordId},
};

/// Parameters for generating a new timeline.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GenerateTimeline {
    /// Business type or industry
    pub business_type: String,
    /// Current business position
    pub business_position: String,
    /// Key growth goals
    pub growth_goals: String,
    /// Optional credential for the generation endpoint. Held in memory only.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl GenerateTimeline {
    /// Checks that all three inputs are present.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Validation` naming the first empty field.
    /// Whitespace-only input counts as empty.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("businessType", &self.business_type),
            ("businessPosition", &self.business_position),
            ("growthGoals", &self.growth_goals),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(TimelineError::validation(field).with_reason(
                    "Please fill in all fields: Growth Goals, Business Type, and Current Position.",
                ));
            }
        }
        Ok(())
    }

    /// The inputs persisted alongside the generated timeline.
    pub fn inputs(&self) -> BusinessInputs {
        BusinessInputs {
            growth_goals: self.growth_goals.clone(),
            business_type: self.business_type.clone(),
            business_position: self.business_position.clone(),
        }
    }
}

impl fmt::Debug for GenerateTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateTimeline")
            .field("business_type", &self.business_type)
            .field("business_position", &self.business_position)
            .field("growth_goals", &self.growth_goals)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Generic parameters for operations on one saved record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRef {
    /// The ID of the record to operate on
    pub id: RecordId,
}

/// Parameters for toggling the completion flag of one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePhase {
    /// Record holding the phase
    pub id: RecordId,
    /// Zero-based phase index
    pub phase_index: usize,
}

/// Parameters for deleting a saved record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecord {
    /// Record to delete
    pub id: RecordId,
    /// Whether the user already confirmed the deletion
    pub confirmed: bool,
}

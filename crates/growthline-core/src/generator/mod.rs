//! Timeline generation through an external text-generation endpoint.
//!
//! [`TimelineGenerator`] is the seam used by the board; [`GeminiClient`] is the
//! production implementation. A request is validated, turned into a prompt
//! plus a declarative response schema ([`prompt`]), sent once, and the nested
//! text payload of the response is parsed as a [`Timeline`].
//!
//! Failure classes are kept apart so callers can tell them apart:
//!
//! | Condition                           | Error                               |
//! |-------------------------------------|-------------------------------------|
//! | an input is empty                   | `TimelineError::Validation`         |
//! | connection could not be made        | `TimelineError::Transport`          |
//! | non-success HTTP status             | `TimelineError::Upstream`           |
//! | envelope lacks the candidate text   | `TimelineError::UpstreamProtocol`   |
//! | candidate text is not a timeline    | `TimelineError::MalformedPayload`   |

use async_trait::async_trait;

use crate::{error::Result, models::Timeline, params::GenerateTimeline};

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};

/// Abstraction over timeline generation providers.
#[async_trait]
pub trait TimelineGenerator: Send + Sync {
    /// Generates a timeline for the given inputs. Never persists anything.
    async fn generate(&self, params: &GenerateTimeline) -> Result<Timeline>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

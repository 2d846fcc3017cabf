//! Core library for the Growthline timeline generator.
//!
//! Growthline turns three free-text answers about a business (type, current
//! position, growth goals) into a phased growth timeline using a hosted
//! text-generation model, saves every generated timeline for the signed-in
//! user and lets the user tick off phases as they complete them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────────┐   ┌──────────────────┐
//! │  Board   │──▶│ TimelineGenerator  │──▶│ generation API   │
//! │          │   └────────────────────┘   └──────────────────┘
//! │          │   ┌────────────────────┐   ┌──────────────────┐
//! │          │──▶│  TimelineRecords   │──▶│  DocumentStore   │
//! └──────────┘   └────────────────────┘   └──────────────────┘
//!      ▲
//!      │ AppContext (store + signed-in owner)
//! ```
//!
//! - [`generator`]: prompt, response schema and the Gemini client
//! - [`records`]: persistence and the in-memory history with optimistic edits
//! - [`store`]: hierarchical document store trait and its SQLite backend
//! - [`identity`]: anonymous or token sign-in
//! - [`board`]: presentation state and feature switches
//! - [`display`]: markdown rendering
//! - [`config`]: environment settings
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use growthline_core::{
//!     AppContextBuilder, Board, Features, GeminiClient, GenerateTimeline,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = AppContextBuilder::new()
//!     .with_database_path(Some("growthline.db"))
//!     .build()
//!     .await?;
//!
//! let mut board = Board::new(Arc::new(GeminiClient::default()), Features::full());
//! board.attach(context);
//!
//! let generated = board
//!     .generate(&GenerateTimeline {
//!         business_type: "Local bakery".to_string(),
//!         business_position: "1 year old, 2 employees".to_string(),
//!         growth_goals: "Open second location in 18 months".to_string(),
//!         api_key: std::env::var("GEMINI_API_KEY").ok(),
//!     })
//!     .await?;
//! println!("{}", generated.timeline);
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod generator;
pub mod identity;
pub mod models;
pub mod params;
pub mod records;
pub mod store;

// Re-export commonly used types
pub use board::{Board, DeleteOutcome, Features, Generated};
pub use config::{Settings, StoreDescriptor};
pub use context::{AppContext, AppContextBuilder};
pub use display::{
    CreateResult, DeleteResult, OperationStatus, RecordSummaries, TimelineDetail,
    TimelineOverview, UpdateResult,
};
pub use error::{Result, TimelineError};
pub use generator::{GeminiClient, GeminiConfig, TimelineGenerator};
pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use models::{
    AppNamespace, BusinessInputs, OwnerId, Phase, RecordId, RecordSummary, Timeline,
    TimelineRecord,
};
pub use params::{DeleteRecord, GenerateTimeline, RecordRef, TogglePhase};
pub use records::{RecordStream, TimelineRecords};
pub use store::{DocumentStore, SqliteDocumentStore};

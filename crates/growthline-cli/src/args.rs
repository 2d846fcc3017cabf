use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DeleteArgs, GenerateArgs, ShowArgs, ToggleArgs};

/// Generate and track phased growth timelines for a business
///
/// Growthline asks a hosted text-generation model for a strategic growth
/// timeline based on the business type, its current position and its growth
/// goals. Every generated timeline is saved for the signed-in user so phases
/// can be ticked off as they are completed.
#[derive(Parser)]
#[command(version, about, name = "growthline")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/growthline/growthline.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to the file holding the anonymous user id. Defaults to
    /// $XDG_DATA_HOME/growthline/identity.json
    #[arg(long, global = true)]
    pub identity_file: Option<PathBuf>,

    /// Namespace separating deployments that share one database
    #[arg(long, global = true)]
    pub app_id: Option<String>,

    /// Sign in with this token instead of anonymously. Falls back to
    /// GROWTHLINE_AUTH_TOKEN
    #[arg(long, global = true)]
    pub auth_token: Option<String>,

    /// API root of the generation endpoint
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Generation model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// Without a command the saved timelines are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new growth timeline and save it
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// List saved timelines, newest first
    #[command(alias = "ls")]
    List,
    /// Show a saved timeline
    Show(ShowArgs),
    /// Mark a phase as completed, or open again
    #[command(alias = "t")]
    Toggle(ToggleArgs),
    /// Delete a saved timeline
    #[command(alias = "rm")]
    Delete(DeleteArgs),
    /// Follow saved timelines as they change
    Watch,
}

//! Command handlers.
//!
//! Each subcommand has a clap argument wrapper converted into the core
//! parameter type, so clap attributes never leak into the library:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Board
//! ```
//!
//! [`Cli`] then drives the [`Board`] and hands the markdown produced by the
//! display layer to the [`TerminalRenderer`].

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use clap::Args;
use futures::StreamExt;
use growthline_core::{
    display::RecordSummaries,
    params::{DeleteRecord, GenerateTimeline, RecordRef, TogglePhase},
    Board, CreateResult, DeleteOutcome, DeleteResult, OperationStatus, RecordId, TimelineError,
    UpdateResult,
};
use log::{debug, info};

use crate::renderer::TerminalRenderer;

/// Generate a new timeline
#[derive(Args)]
pub struct GenerateArgs {
    /// Business type or industry, e.g. "Local bakery"
    #[arg(long, short = 't')]
    pub business_type: String,
    /// Current business position, e.g. "1 year old, 2 employees"
    #[arg(long, short = 'p')]
    pub business_position: String,
    /// Key growth goals, e.g. "Open second location in 18 months"
    #[arg(long, short = 'g')]
    pub growth_goals: String,
    /// Credential for the generation endpoint. Falls back to GEMINI_API_KEY
    #[arg(long)]
    pub api_key: Option<String>,
}

impl From<GenerateArgs> for GenerateTimeline {
    fn from(val: GenerateArgs) -> Self {
        GenerateTimeline {
            business_type: val.business_type,
            business_position: val.business_position,
            growth_goals: val.growth_goals,
            api_key: val.api_key,
        }
    }
}

/// Show a saved timeline
#[derive(Args)]
pub struct ShowArgs {
    /// ID of the saved timeline
    pub id: String,
}

impl From<ShowArgs> for RecordRef {
    fn from(val: ShowArgs) -> Self {
        RecordRef {
            id: RecordId(val.id),
        }
    }
}

/// Toggle completion of a phase
#[derive(Args)]
pub struct ToggleArgs {
    /// ID of the saved timeline
    pub id: String,
    /// Phase number as shown in the timeline (starting at 1)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub phase: u32,
}

impl From<ToggleArgs> for TogglePhase {
    fn from(val: ToggleArgs) -> Self {
        TogglePhase {
            id: RecordId(val.id),
            phase_index: val.phase.saturating_sub(1) as usize,
        }
    }
}

/// Delete a saved timeline
#[derive(Args)]
pub struct DeleteArgs {
    /// ID of the saved timeline
    pub id: String,
    /// Delete without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl From<DeleteArgs> for DeleteRecord {
    fn from(val: DeleteArgs) -> Self {
        DeleteRecord {
            id: RecordId(val.id),
            confirmed: val.yes,
        }
    }
}

/// Turns a failed board operation into the message the board recorded.
fn fail(board: &Board, err: TimelineError, action: &str) -> anyhow::Error {
    let message = board
        .error()
        .map(str::to_string)
        .unwrap_or_else(|| err.user_message(action));
    anyhow!(message)
}

pub struct Cli {
    board: Board,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(board: Board, renderer: TerminalRenderer) -> Self {
        Self { board, renderer }
    }

    pub async fn generate(mut self, params: GenerateTimeline) -> Result<()> {
        let generated = match self.board.generate(&params).await {
            Ok(generated) => generated,
            Err(e) => return Err(fail(&self.board, e, "generate timeline")),
        };

        let saved = match &generated.saved {
            Some(id) => self.board.history().await.into_iter().find(|r| &r.id == id),
            None => None,
        };
        match saved {
            Some(record) => self
                .renderer
                .render(&CreateResult::new(record).to_string())?,
            None => self.renderer.render(&generated.timeline.to_string())?,
        }

        if let Some(message) = self.board.error() {
            return Err(anyhow!(message.to_string()));
        }
        Ok(())
    }

    pub async fn list(mut self) -> Result<()> {
        let records = match self.board.refresh_history().await {
            Ok(records) => records,
            Err(e) => return Err(fail(&self.board, e, "load saved timelines")),
        };
        self.renderer
            .render(&RecordSummaries::from(records.as_slice()).to_string())
    }

    pub async fn show(mut self, params: RecordRef) -> Result<()> {
        let record = match self.board.load_saved(&params.id).await {
            Ok(record) => record,
            Err(e) => return Err(fail(&self.board, e, "load timeline")),
        };
        self.renderer.render(&record.to_string())
    }

    pub async fn toggle(mut self, params: TogglePhase) -> Result<()> {
        let record = match self.board.toggle_phase(&params.id, params.phase_index).await {
            Ok(record) => record,
            Err(e) => return Err(fail(&self.board, e, "update phase status")),
        };

        let number = params.phase_index + 1;
        let change = match record.phase(params.phase_index) {
            Some(phase) if phase.completed => format!("Marked phase {number} as completed"),
            Some(_) => format!("Marked phase {number} as open"),
            None => format!("Updated phase {number}"),
        };
        self.renderer
            .render(&UpdateResult::with_changes(record, vec![change]).to_string())
    }

    pub async fn delete(mut self, params: DeleteRecord) -> Result<()> {
        // Deletes act on the history as currently stored.
        if let Err(e) = self.board.refresh_history().await {
            return Err(fail(&self.board, e, "delete timeline"));
        }

        let mut outcome = match self.board.request_delete(&params.id).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(fail(&self.board, e, "delete timeline")),
        };

        if let DeleteOutcome::NeedsConfirmation(id) = &outcome {
            if params.confirmed || confirm(&format!("Delete timeline {id}?"))? {
                outcome = match self.board.confirm_delete().await {
                    Ok(outcome) => outcome,
                    Err(e) => return Err(fail(&self.board, e, "delete timeline")),
                };
            } else {
                self.board.cancel_delete();
                return self
                    .renderer
                    .render(&OperationStatus::success("Delete cancelled.").to_string());
            }
        }

        match outcome {
            DeleteOutcome::Deleted(record) => {
                self.renderer.render(&DeleteResult::new(record).to_string())
            }
            DeleteOutcome::NotLoaded(id) => self.renderer.render(
                &OperationStatus::success(format!(
                    "No saved timeline with ID {id}; nothing deleted."
                ))
                .to_string(),
            ),
            DeleteOutcome::NeedsConfirmation(_) | DeleteOutcome::NothingPending => Ok(()),
        }
    }

    /// Re-renders the history on every store change until interrupted.
    pub async fn watch(mut self) -> Result<()> {
        let mut stream = match self.board.watch().await {
            Ok(stream) => stream,
            Err(e) => return Err(fail(&self.board, e, "subscribe to saved timelines")),
        };
        info!("Watching saved timelines; press Ctrl-C to stop");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted");
                    return Ok(());
                }
                snapshot = stream.next() => {
                    let Some(snapshot) = snapshot else {
                        return Ok(());
                    };
                    match self.board.apply_snapshot(snapshot).await {
                        Ok(records) => self
                            .renderer
                            .render(&RecordSummaries::from(records.as_slice()).to_string())?,
                        Err(_) => {
                            let message = self.board.error().unwrap_or_default().to_string();
                            self.renderer
                                .render(&OperationStatus::failure(message).to_string())?;
                            self.board.dismiss_error();
                        }
                    }
                }
            }
        }
    }
}

/// Asks a yes/no question on the terminal. Anything but "y"/"yes" is a no.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

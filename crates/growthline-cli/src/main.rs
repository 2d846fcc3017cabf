//! Growthline CLI
//!
//! Command-line front end for generating, saving and tracking growth
//! timelines.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use growthline_core::{
    AppContextBuilder, AppNamespace, Board, Features, GeminiClient, GenerateTimeline, Settings,
};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        identity_file,
        app_id,
        auth_token,
        api_base_url,
        model,
        no_color,
        command,
    } = Args::parse();

    let mut settings = Settings::from_env().context("Failed to read settings")?;
    if let Some(app_id) = app_id {
        settings.namespace = AppNamespace(app_id);
    }
    if let Some(base_url) = api_base_url {
        settings.generator.base_url = base_url;
    }
    if let Some(model) = model {
        settings.generator.model = model;
    }

    let context = AppContextBuilder::from_settings(&settings)
        .with_database_path(database_file)
        .with_identity_path(identity_file)
        .with_auth_token(auth_token)
        .build()
        .await
        .context("Failed to initialize the timeline store")?;

    let generator = GeminiClient::new(settings.generator.clone());
    let mut board = Board::new(Arc::new(generator), Features::full());
    board.attach(context);

    let cli = Cli::new(board, TerminalRenderer::new(!no_color));

    info!("Growthline started");

    match command {
        Some(Generate(args)) => {
            let mut params = GenerateTimeline::from(args);
            if params.api_key.is_none() {
                params.api_key = settings.api_key.clone();
            }
            cli.generate(params).await
        }
        Some(List) | None => cli.list().await,
        Some(Show(args)) => cli.show(args.into()).await,
        Some(Toggle(args)) => cli.toggle(args.into()).await,
        Some(Delete(args)) => cli.delete(args.into()).await,
        Some(Watch) => cli.watch().await,
    }
}

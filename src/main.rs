//! Terminal shell and composition root.
//!
//! Wires the configured store, country source, and search controller into an
//! [`AppState`], then runs two things concurrently:
//!
//! - commands read line by line from stdin, dispatched through
//!   [`handle_event`]
//! - search status changes from the controller's watch channel, printed while
//!   the search view is active
//!
//! ```text
//! stdin ──▶ Event::parse ──▶ handle_event ──▶ Vec<Action> ──▶ stdout
//!                                 │
//!                         SearchController ──watch──▶ render_status ──▶ stdout
//! ```
//!
//! # Usage
//!
//! ```text
//! jsonland [CONFIG.toml]
//! ```

#![allow(clippy::multiple_crate_versions)]

use jsonland::observability::init_tracing;
use jsonland::search::{CountrySource, RestCountriesClient};
use jsonland::storage::{JsonFileStore, KeyValueStore};
use jsonland::{handle_event, ui, Action, AppState, Config, Event, Result};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("jsonland: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    init_tracing(&config);
    tracing::info!(data_dir = %config.data_dir().display(), "starting jsonland");

    let kv: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(config.store_path())?);
    let source: Arc<dyn CountrySource> = Arc::new(RestCountriesClient::new(
        &config.api_base_url,
        config.request_timeout(),
    )?);

    let mut state = AppState::start(kv, source, config.quiet_period()).await?;
    let mut status = state.search.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    emit(&mut out, &ui::render_banner(state.session.user())).await?;
    emit(&mut out, "Type `help` for commands.\n").await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let event = match Event::parse(&line) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => {
                        emit(&mut out, &format!("{e}\n")).await?;
                        continue;
                    }
                };
                let actions = match handle_event(&mut state, event).await {
                    Ok(actions) => actions,
                    Err(e) => {
                        tracing::error!(error = %e, "command failed");
                        emit(&mut out, &format!("Error: {e}\n")).await?;
                        continue;
                    }
                };
                for action in actions {
                    match action {
                        Action::Print(text) => emit(&mut out, &text).await?,
                        Action::Quit => return Ok(()),
                    }
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(text) = state.search_text() {
                    emit(&mut out, &text).await?;
                }
            }
        }
    }

    tracing::info!("input closed");
    Ok(())
}

async fn emit(out: &mut Stdout, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

pub mod auth;
pub mod commands;
pub mod config;
pub mod court;
pub mod errors;
pub mod features;
pub mod prediction;
pub mod presenter;
pub mod session;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::auth::authenticator::{HttpLogin, SessionAuthenticator, StaticCredentials};
use crate::commands::{parse_command, Command, HELP};
use crate::config::AppConfig;
use crate::errors::ShotCallResult;
use crate::prediction::client::{PredictionClient, PredictionService};
use crate::presenter::DisplayStyle;
use crate::session::engine::{ClickSession, SessionHandle};
use crate::session::state::{SessionEvent, UiUpdate};

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config; starting with defaults");
            config::defaults_from_env()
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to start async runtime");
            return;
        }
    };

    if let Err(e) = runtime.block_on(run_session(config)) {
        tracing::error!(error = %e, "session ended with error");
    }
}

/// Wires login, the click session and the terminal together, then reads
/// commands from stdin until `quit` or end of input.
pub async fn run_session(config: AppConfig) -> ShotCallResult<()> {
    let surface = config.surface_spec()?;
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;

    let auth = SessionAuthenticator::new(Arc::new(HttpLogin::new(
        config.endpoint("login"),
        http.clone(),
    )));
    let service: Arc<dyn PredictionService> =
        Arc::new(PredictionClient::new(config.endpoint("predict"), http));

    // Login runs once in the background; clicks never wait for it.
    let provider = StaticCredentials::new(config.credentials());
    let login = auth.clone();
    tokio::spawn(async move {
        login.authenticate_with(&provider).await;
    });

    let (mut session, handle) = ClickSession::new(surface, auth, service);
    tracing::info!(
        session_id = %session.session_id(),
        api = %config.api.base_url,
        width_px = surface.width_px(),
        height_px = surface.height_px(),
        "spawning click session"
    );
    let session_task = tokio::spawn(async move { session.run_loop().await });

    let SessionHandle { tx, ui_rx } = handle;
    let printer = tokio::spawn(print_updates(ui_rx));

    println!(
        "Pick a spot on the {}x{} px court (origin top-left) to predict the shot on the lower basket.",
        surface.width_px(),
        surface.height_px()
    );
    println!("Type 'help' for commands.");

    // `quit` drops pending results; end of input (piped clicks) waits for them.
    let mut finish = SessionEvent::Drain;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => {
                finish = SessionEvent::Stop;
                break;
            }
            Ok(Some(Command::Help)) => {
                println!("{HELP}");
                continue;
            }
            Ok(Some(Command::Status)) => SessionEvent::StatusRequested,
            Ok(Some(Command::Click(point))) => SessionEvent::Click(point),
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if tx.send(event).await.is_err() {
            tracing::warn!("click session is no longer running");
            break;
        }
    }

    let _ = tx.send(finish).await;
    // A closed event channel stops the loop, so the sender lives until it has finished.
    if let Err(e) = session_task.await {
        tracing::error!(error = %e, "click session task failed");
    }
    drop(tx);
    let _ = printer.await;
    Ok(())
}

async fn print_updates(mut ui_rx: mpsc::UnboundedReceiver<UiUpdate>) {
    while let Some(update) = ui_rx.recv().await {
        match update {
            UiUpdate::CoordinateSelected { coordinate, .. } => {
                println!("Selected Coordinates: {coordinate}");
            }
            UiUpdate::Display { display, .. } => {
                let stamp = chrono::Local::now().format("%H:%M:%S");
                match display.style {
                    DisplayStyle::Normal => println!("[{stamp}] \x1b[1m{}\x1b[0m", display.text),
                    DisplayStyle::Error => println!("[{stamp}] \x1b[1;31m{}\x1b[0m", display.text),
                }
            }
            UiUpdate::Discarded { seq } => {
                tracing::debug!(seq, "late result not shown");
            }
            UiUpdate::Status(report) => {
                println!("session    {}", report.session_id);
                println!("login      {}", report.auth);
                println!(
                    "result     {}",
                    report
                        .display
                        .as_ref()
                        .map(|d| d.text.as_str())
                        .unwrap_or("(none yet)")
                );
                println!(
                    "requests   {} sent, {} shown, {} late, {} pending",
                    report.dispatched, report.accepted, report.discarded, report.in_flight
                );
            }
        }
    }
}

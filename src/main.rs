//! Terminal console for a TurboCloud backend.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

mod api;
mod app;
mod config;
mod events;
mod form;
mod hints;
mod input;
mod layout;
mod menu;
mod message;
mod refresh;
mod rows;
mod shortcuts;
mod table;
mod ui;
mod workflows;
mod worker;

/// Log to a file; the terminal belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
    let log_file = "turbocloud_tui.log";
    let file_appender = tracing_appender::rolling::never(".", log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    tracing::info!("logging to {}", log_file);
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_guard = init_logging()?;
    tracing::info!("app starting");

    let mut terminal = match ui::init_terminal() {
        Ok(t) => t,
        Err(e) => {
            // Leave the shell usable even if setup got halfway.
            let _ = ui::restore_terminal();
            tracing::error!("cannot start terminal UI: {e}");
            eprintln!("cannot start terminal UI: {e}");
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let res = app::run_app(&mut terminal).await;
    ui::restore_terminal()?;
    if let Err(ref e) = res {
        tracing::error!("app error: {e}");
    }
    tracing::info!("app exiting");
    drop(log_guard);
    res
}

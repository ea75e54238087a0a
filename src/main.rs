use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_logging()?;

    expense_tracker::cli::run().await
}

/// Log to a file; the TUI owns the terminal.
fn init_logging() -> Result<()> {
    let path = std::env::var("EXPENSE_TRACKER_LOG")
        .unwrap_or_else(|_| "expense-tracker.log".to_string());
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

mod config;
mod db;
mod errors;
mod importer;
mod lookup;
mod models;
mod normalize;
mod report;
mod spreadsheet;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::importer::Importer;

/// Main entry point: load configuration and the spreadsheet, reconcile every
/// row against the database, then emit the run report. Exits non-zero when
/// the run was halted by a connectivity failure.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contract_import=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Load the source spreadsheet
    let records = spreadsheet::load_records(&config.spreadsheet_path)?;

    // Reconcile records one at a time, in source order
    let mut importer = Importer::new(db.pool.clone()).await?;
    let run_report = importer.run(&records).await;

    report::write(&run_report)?;

    if let Some(reason) = &run_report.halted {
        anyhow::bail!("import halted: {}", reason);
    }
    Ok(())
}

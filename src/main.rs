mod app;
mod commands;
mod config;
mod event;
mod model;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use model::store::Store;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "osserva")]
#[command(about = "A terminal UI for browsing leveled weather observations")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/osserva/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Path to the observation database
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Import a CSV file of observations before starting
  #[arg(short, long)]
  import: Option<PathBuf>,
}

/// Log to a file in the data directory; stderr is owned by the TUI
fn init_logging() -> Result<WorkerGuard> {
  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("osserva");
  std::fs::create_dir_all(&log_dir)?;

  let appender = tracing_appender::rolling::never(log_dir, "osserva.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Command line overrides the configured database
  let config = if let Some(database) = args.database {
    config::Config {
      database: Some(database),
      ..config
    }
  } else {
    config
  };

  let database_path = match &config.database {
    Some(path) => path.clone(),
    None => Store::default_path()?,
  };
  let store = Store::open(&database_path)?;

  if let Some(import_path) = &args.import {
    model::import::import_file(&store, import_path)?;
  }

  // Initialize and run the app
  let mut app = app::App::new(config, store, database_path);
  app.run().await?;

  Ok(())
}

//! `oruma` — command-line front end for the Oruma contact book.
//!
//! # Usage
//!
//! ```text
//! oruma init
//! oruma sync
//! oruma contacts list
//! oruma contacts update 3 --birthday 1990-05-03
//! oruma birthdays schedule-all
//! ```
//!
//! Settings come from `oruma.toml` (or `--config`) and `ORUMA_*` environment
//! variables; log verbosity from `RUST_LOG`.

mod cli;
mod commands;
mod host;
mod settings;

use clap::Parser;
use cli::Cli;
use commands::Context;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  tracing::debug!(?settings, "loaded settings");

  let ctx = Context::open(settings).await?;
  commands::run(&ctx, cli.command).await
}

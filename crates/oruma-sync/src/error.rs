//! Error type for `oruma-sync`.

use thiserror::Error;

/// Failures that abort a sync outright. Per-entry problems are counted in
/// the [`SyncReport`](crate::SyncReport) instead.
#[derive(Debug, Error)]
pub enum Error {
  #[error("schema initialisation failed: {0}")]
  Schema(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error type for `oruma-notify`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("schema initialisation failed: {0}")]
  Schema(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("notification service error: {0}")]
  Notifier(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error type for `oruma-store-sqlite`.

use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE constraint rejected the write.
  #[error("{0} already exists")]
  Duplicate(String),

  /// A FOREIGN KEY constraint rejected the write.
  #[error("{0} does not exist")]
  MissingReference(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Classify a failed statement, naming the record it was writing.
  pub(crate) fn from_write(err: tokio_rusqlite::Error, what: impl FnOnce() -> String) -> Self {
    match constraint_code(&err) {
      Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => Self::Duplicate(what()),
      Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Self::MissingReference(what()),
      _ => Self::Database(err),
    }
  }

  /// `true` for uniqueness violations, the one failure callers routinely
  /// expect.
  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate(_)) }
}

/// Extended result code of a constraint violation, if `err` is one.
fn constraint_code(err: &tokio_rusqlite::Error) -> Option<i32> {
  match err {
    tokio_rusqlite::Error::Rusqlite(e) => rusqlite_constraint_code(e),
    _ => None,
  }
}

pub(crate) fn rusqlite_constraint_code(err: &rusqlite::Error) -> Option<i32> {
  match err {
    rusqlite::Error::SqliteFailure(e, _)
      if e.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(e.extended_code)
    }
    _ => None,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error types for `oruma-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("birthday {0:?} is not of the form YYYY-MM-DD")]
  BirthdayShape(String),

  #[error("birthday {0:?} has a non-numeric month or day")]
  BirthdayNotNumeric(String),

  #[error("birthday {value:?} has month {month}, expected 1-12")]
  MonthOutOfRange { value: String, month: u32 },

  #[error("birthday {value:?} has day {day}, expected 1-31")]
  DayOutOfRange { value: String, day: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

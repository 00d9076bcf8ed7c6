//! Annual birthday reminders for the Oruma contact book.
//!
//! Each contact with a birthday owns at most one pending local notification,
//! identified as `birthday-<contact id>`. Scheduling always cancels that
//! identifier first, so re-running it after a birthday changes replaces the
//! old reminder instead of adding a second one.

mod reminder;
mod scheduler;

pub mod error;

pub use error::{Error, Result};
pub use reminder::{
  REMINDER_HOUR, REMINDER_MINUTE, birthday_request, default_channel, notification_id,
};
pub use scheduler::{BirthdayScheduler, ScheduleAllOutcome, ScheduleOutcome, ScheduleReport};

//! Birthday representations.
//!
//! Birthdays are stored on a contact as free text in `YYYY-MM-DD` form. Two
//! conversions live here: turning an address-book birthday into that text,
//! and reading the month/day back out of it for annual reminders.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Device birthday ─────────────────────────────────────────────────────────

/// A birthday as reported by the host address book. Any component may be
/// missing (e.g. a contact with only month and day recorded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBirthday {
  pub year:  Option<i32>,
  /// 1-12.
  pub month: Option<u32>,
  pub day:   Option<u32>,
}

impl DeviceBirthday {
  /// The stored `YYYY-MM-DD` text, or `None` unless year, month and day are
  /// all present and non-zero. Partial birthdays are dropped, never guessed.
  pub fn to_stored(&self) -> Option<String> {
    match (self.year, self.month, self.day) {
      (Some(year), Some(month), Some(day))
        if year != 0 && month != 0 && day != 0 =>
      {
        Some(format!("{year}-{month:02}-{day:02}"))
      }
      _ => None,
    }
  }
}

// ─── Month/day ───────────────────────────────────────────────────────────────

/// The recurring part of a stored birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
  pub month: u32,
  pub day:   u32,
}

impl MonthDay {
  /// Parse the month and day out of a stored `YYYY-MM-DD` birthday.
  ///
  /// The value must split into exactly three `-`-separated parts with a
  /// numeric month in 1-12 and day in 1-31. The year is ignored and the day
  /// is not checked against the month's length.
  pub fn parse_stored(value: &str) -> Result<Self> {
    let parts: Vec<&str> = value.split('-').collect();
    let [_, month, day] = parts.as_slice() else {
      return Err(Error::BirthdayShape(value.to_owned()));
    };

    let (Ok(month), Ok(day)) =
      (month.trim().parse::<u32>(), day.trim().parse::<u32>())
    else {
      return Err(Error::BirthdayNotNumeric(value.to_owned()));
    };

    if !(1..=12).contains(&month) {
      return Err(Error::MonthOutOfRange { value: value.to_owned(), month });
    }
    if !(1..=31).contains(&day) {
      return Err(Error::DayOutOfRange { value: value.to_owned(), day });
    }

    Ok(Self { month, day })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_device_birthday_is_zero_padded() {
    let b = DeviceBirthday { year: Some(1990), month: Some(5), day: Some(3) };
    assert_eq!(b.to_stored().as_deref(), Some("1990-05-03"));
  }

  #[test]
  fn partial_device_birthday_is_dropped() {
    let month_only = DeviceBirthday { year: None, month: Some(5), day: None };
    assert_eq!(month_only.to_stored(), None);

    let no_year = DeviceBirthday { year: None, month: Some(5), day: Some(3) };
    assert_eq!(no_year.to_stored(), None);

    let zero_day = DeviceBirthday { year: Some(1990), month: Some(5), day: Some(0) };
    assert_eq!(zero_day.to_stored(), None);
  }

  #[test]
  fn parses_month_and_day() {
    assert_eq!(
      MonthDay::parse_stored("1990-05-03"),
      Ok(MonthDay { month: 5, day: 3 })
    );
    // No cross-check of day against month length.
    assert_eq!(
      MonthDay::parse_stored("2001-02-31"),
      Ok(MonthDay { month: 2, day: 31 })
    );
  }

  #[test]
  fn rejects_malformed_birthdays() {
    assert!(matches!(
      MonthDay::parse_stored("13-40"),
      Err(Error::BirthdayShape(_))
    ));
    assert!(matches!(
      MonthDay::parse_stored("2020-13-01"),
      Err(Error::MonthOutOfRange { month: 13, .. })
    ));
    assert!(matches!(
      MonthDay::parse_stored("2020-00-10"),
      Err(Error::MonthOutOfRange { month: 0, .. })
    ));
    assert!(matches!(
      MonthDay::parse_stored("2020-01-32"),
      Err(Error::DayOutOfRange { day: 32, .. })
    ));
    assert!(matches!(
      MonthDay::parse_stored("2020-ab-01"),
      Err(Error::BirthdayNotNumeric(_))
    ));
    assert!(matches!(
      MonthDay::parse_stored("2020-01-01-01"),
      Err(Error::BirthdayShape(_))
    ));
  }
}

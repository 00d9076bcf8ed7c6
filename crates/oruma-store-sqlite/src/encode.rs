//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written by SQLite itself (`CURRENT_TIMESTAMP`, UTC, second
//! precision). Everything else maps onto a column one-to-one.

use chrono::{DateTime, NaiveDateTime, Utc};
use oruma_core::contact::{Contact, ContactEvent, ContactNews, ContactPatch};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Format produced by SQLite's `CURRENT_TIMESTAMP`.
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP) {
    return Ok(naive.and_utc());
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Optional text ───────────────────────────────────────────────────────────

/// Empty strings become NULL.
pub fn blank_to_null(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.is_empty())
}

fn text(value: Option<String>) -> Value {
  value.map_or(Value::Null, Value::Text)
}

fn integer(value: Option<i64>) -> Value {
  value.map_or(Value::Null, Value::Integer)
}

// ─── Contact patch ───────────────────────────────────────────────────────────

/// The `(column, value)` pairs a patch writes, in column order.
pub fn encode_patch(patch: ContactPatch) -> Vec<(&'static str, Value)> {
  let ContactPatch {
    native_id,
    first_name,
    last_name,
    phone_number,
    email,
    category_id,
    birthday,
    food_preferences,
    notes,
  } = patch;

  let texts = [
    ("native_id", native_id),
    ("first_name", first_name),
    ("last_name", last_name),
    ("phone_number", phone_number),
    ("email", email),
  ];
  let trailing = [
    ("birthday", birthday),
    ("food_preferences", food_preferences),
    ("notes", notes),
  ];

  let mut out: Vec<(&'static str, Value)> = texts
    .into_iter()
    .filter_map(|(col, v)| v.map(|v| (col, text(v))))
    .collect();
  if let Some(v) = category_id {
    out.push(("category_id", integer(v)));
  }
  out.extend(
    trailing
      .into_iter()
      .filter_map(|(col, v)| v.map(|v| (col, text(v)))),
  );
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CONTACT_COLUMNS: &str = "id, native_id, first_name, last_name, phone_number, email, \
   category_id, birthday, food_preferences, notes, created_at, updated_at";

/// Values read directly from a `contacts` row, timestamps still as text.
pub struct RawContact {
  pub id:               i64,
  pub native_id:        Option<String>,
  pub first_name:       Option<String>,
  pub last_name:        Option<String>,
  pub phone_number:     Option<String>,
  pub email:            Option<String>,
  pub category_id:      Option<i64>,
  pub birthday:         Option<String>,
  pub food_preferences: Option<String>,
  pub notes:            Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawContact {
  /// Map a row selected with [`CONTACT_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      native_id:        row.get(1)?,
      first_name:       row.get(2)?,
      last_name:        row.get(3)?,
      phone_number:     row.get(4)?,
      email:            row.get(5)?,
      category_id:      row.get(6)?,
      birthday:         row.get(7)?,
      food_preferences: row.get(8)?,
      notes:            row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:               self.id,
      native_id:        self.native_id,
      first_name:       self.first_name,
      last_name:        self.last_name,
      phone_number:     self.phone_number,
      email:            self.email,
      category_id:      self.category_id,
      birthday:         self.birthday,
      food_preferences: self.food_preferences,
      notes:            self.notes,
      created_at:       decode_timestamp(&self.created_at)?,
      updated_at:       decode_timestamp(&self.updated_at)?,
    })
  }
}

pub fn event_from_row(row: &Row<'_>) -> rusqlite::Result<ContactEvent> {
  Ok(ContactEvent {
    id:          row.get(0)?,
    contact_id:  row.get(1)?,
    event_name:  row.get(2)?,
    event_date:  row.get(3)?,
    description: row.get(4)?,
  })
}

/// Values read directly from a `contact_news` row.
pub struct RawNews {
  pub id:            i64,
  pub contact_id:    i64,
  pub news_item:     String,
  pub date_recorded: String,
}

impl RawNews {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      contact_id:    row.get(1)?,
      news_item:     row.get(2)?,
      date_recorded: row.get(3)?,
    })
  }

  pub fn into_news(self) -> Result<ContactNews> {
    Ok(ContactNews {
      id:            self.id,
      contact_id:    self.contact_id,
      news_item:     self.news_item,
      date_recorded: decode_timestamp(&self.date_recorded)?,
    })
  }
}

//! Records persisted by the contact book and the inputs used to create or
//! change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Categories ──────────────────────────────────────────────────────────────

/// Category names guaranteed to exist once the schema is initialised.
pub const DEFAULT_CATEGORIES: [&str; 4] = [
  "Friends",
  "Family",
  "Work Colleagues",
  "Buddies / Casual Connections",
];

/// Category assigned to contacts imported from the device address book.
pub const IMPORT_CATEGORY: &str = "Buddies / Casual Connections";

/// A user-facing grouping of contacts. Names are unique; rows are never
/// updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:   i64,
  pub name: String,
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:               i64,
  /// Identifier assigned by the device address book; `None` for contacts
  /// entered by hand.
  pub native_id:        Option<String>,
  pub first_name:       Option<String>,
  pub last_name:        Option<String>,
  pub phone_number:     Option<String>,
  pub email:            Option<String>,
  pub category_id:      Option<i64>,
  /// `YYYY-MM-DD`. Not validated on write.
  pub birthday:         Option<String>,
  pub food_preferences: Option<String>,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  /// Refreshed by the database on every update.
  pub updated_at:       DateTime<Utc>,
}

impl Contact {
  /// "First Last", skipping whichever half is missing.
  pub fn display_name(&self) -> String {
    [self.first_name.as_deref(), self.last_name.as_deref()]
      .into_iter()
      .flatten()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Input to [`crate::store::ContactStore::add_contact`]. Identifiers and
/// timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub native_id:        Option<String>,
  pub first_name:       Option<String>,
  pub last_name:        Option<String>,
  pub phone_number:     Option<String>,
  pub email:            Option<String>,
  pub category_id:      Option<i64>,
  pub birthday:         Option<String>,
  pub food_preferences: Option<String>,
  pub notes:            Option<String>,
}

/// A partial update to a contact.
///
/// The outer `Option` says whether a column is written at all; the inner one
/// is the new value, where `None` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
  pub native_id:        Option<Option<String>>,
  pub first_name:       Option<Option<String>>,
  pub last_name:        Option<Option<String>>,
  pub phone_number:     Option<Option<String>>,
  pub email:            Option<Option<String>>,
  pub category_id:      Option<Option<i64>>,
  pub birthday:         Option<Option<String>>,
  pub food_preferences: Option<Option<String>>,
  pub notes:            Option<Option<String>>,
}

impl ContactPatch {
  /// `true` when no column would be written.
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Events & news ───────────────────────────────────────────────────────────

/// Something that happened (or will happen) to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
  pub id:          i64,
  pub contact_id:  i64,
  pub event_name:  String,
  /// `YYYY-MM-DD`, free text.
  pub event_date:  Option<String>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactEvent {
  pub event_name:  String,
  /// Empty strings are stored as NULL.
  pub event_date:  Option<String>,
  /// Empty strings are stored as NULL.
  pub description: Option<String>,
}

/// A free-form news item about a contact, timestamped when recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactNews {
  pub id:            i64,
  pub contact_id:    i64,
  pub news_item:     String,
  pub date_recorded: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactNews {
  pub news_item: String,
}

// ─── Write results ───────────────────────────────────────────────────────────

/// What a write statement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
  /// Row id of the most recent successful insert on the connection.
  pub last_insert_id: i64,
  /// Rows inserted, updated or deleted by the statement.
  pub changes:        usize,
}

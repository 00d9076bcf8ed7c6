//! The sync loop.

use oruma_core::{
  contact::{IMPORT_CATEGORY, NewContact},
  host::{AddressBook, DeviceContact},
  store::ContactStore,
};
use serde::Serialize;

use crate::{Error, Result};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
  /// Entries in the address-book snapshot.
  pub fetched:         usize,
  /// New contacts written to the store.
  pub added:           usize,
  /// Entries whose native id is already in the store.
  pub already_present: usize,
  /// Entries without a native id.
  pub missing_id:      usize,
  /// Entries whose lookup or insert failed.
  pub failed:          usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
  /// The host refused address-book access; nothing was read.
  PermissionDenied,
  Completed(SyncReport),
}

enum Entry {
  Added,
  AlreadyPresent,
  MissingId,
  Failed,
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

fn non_empty(value: Option<&str>) -> Option<String> {
  value.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Build the store row for an address-book entry.
///
/// Takes the first phone number and first email only, and a birthday only
/// when year, month and day are all known. Notes and food preferences start
/// empty.
pub fn map_device_contact(
  device: &DeviceContact,
  native_id: &str,
  category_id: Option<i64>,
) -> NewContact {
  NewContact {
    native_id: Some(native_id.to_owned()),
    first_name: non_empty(device.first_name.as_deref()),
    last_name: non_empty(device.last_name.as_deref()),
    phone_number: non_empty(
      device
        .phone_numbers
        .first()
        .and_then(|p| p.number.as_deref()),
    ),
    email: non_empty(device.emails.first().and_then(|e| e.email.as_deref())),
    category_id,
    birthday: device.birthday.and_then(|b| b.to_stored()),
    food_preferences: None,
    notes: None,
  }
}

// ─── Importer ────────────────────────────────────────────────────────────────

/// Imports the device address book into a [`ContactStore`].
///
/// Existing contacts are matched on `native_id` and left untouched; fields
/// changed on the device after the first import are not carried over.
pub struct ContactImporter<S, A> {
  store:        S,
  address_book: A,
}

impl<S, A> ContactImporter<S, A>
where
  S: ContactStore,
  A: AddressBook,
{
  pub fn new(store: S, address_book: A) -> Self { Self { store, address_book } }

  pub fn store(&self) -> &S { &self.store }

  pub fn address_book(&self) -> &A { &self.address_book }

  /// Run one import pass.
  ///
  /// Only a schema failure is an error. A refused permission is reported as
  /// [`SyncOutcome::PermissionDenied`]; an unreadable address book counts as
  /// an empty one; failing entries are logged, counted and skipped.
  pub async fn sync(&self) -> Result<SyncOutcome> {
    self
      .store
      .ensure_schema()
      .await
      .map_err(|e| Error::Schema(Box::new(e)))?;

    match self.address_book.request_permission().await {
      Ok(true) => {}
      Ok(false) => {
        tracing::info!("contacts permission denied; sync aborted");
        return Ok(SyncOutcome::PermissionDenied);
      }
      Err(e) => {
        tracing::warn!(error = %e, "contacts permission request failed; sync aborted");
        return Ok(SyncOutcome::PermissionDenied);
      }
    }

    let snapshot = self.address_book.fetch_contacts().await.unwrap_or_else(|e| {
      tracing::error!(error = %e, "failed to read device contacts");
      Vec::new()
    });

    let mut report = SyncReport { fetched: snapshot.len(), ..Default::default() };
    if snapshot.is_empty() {
      tracing::info!("no device contacts found");
      return Ok(SyncOutcome::Completed(report));
    }
    tracing::info!(count = snapshot.len(), "fetched device contacts; starting sync");

    let category_id = self.import_category().await;

    for device in &snapshot {
      match self.import_one(device, category_id).await {
        Entry::Added => report.added += 1,
        Entry::AlreadyPresent => report.already_present += 1,
        Entry::MissingId => report.missing_id += 1,
        Entry::Failed => report.failed += 1,
      }
    }

    tracing::info!(
      added = report.added,
      already_present = report.already_present,
      missing_id = report.missing_id,
      failed = report.failed,
      "sync complete"
    );
    Ok(SyncOutcome::Completed(report))
  }

  /// The id of the category new imports go into, if it can be found.
  async fn import_category(&self) -> Option<i64> {
    match self.store.get_category_by_name(IMPORT_CATEGORY).await {
      Ok(Some(category)) => Some(category.id),
      Ok(None) => {
        tracing::warn!(
          category = IMPORT_CATEGORY,
          "import category not found; new contacts will have no category"
        );
        None
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to look up import category");
        None
      }
    }
  }

  async fn import_one(&self, device: &DeviceContact, category_id: Option<i64>) -> Entry {
    let Some(native_id) = device.id.as_deref().filter(|id| !id.is_empty()) else {
      tracing::warn!(
        first_name = ?device.first_name,
        last_name = ?device.last_name,
        "skipping device contact without an id"
      );
      return Entry::MissingId;
    };

    match self.store.get_contact_by_native_id(native_id).await {
      Ok(Some(_)) => return Entry::AlreadyPresent,
      Ok(None) => {}
      Err(e) => {
        tracing::error!(native_id, error = %e, "failed to check for existing contact");
        return Entry::Failed;
      }
    }

    let contact = map_device_contact(device, native_id, category_id);
    match self.store.add_contact(contact).await {
      Ok(outcome) => {
        tracing::debug!(native_id, contact_id = outcome.last_insert_id, "imported contact");
        Entry::Added
      }
      Err(e) => {
        tracing::warn!(native_id, error = %e, "failed to add device contact");
        Entry::Failed
      }
    }
  }
}

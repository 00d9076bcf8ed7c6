//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `oruma-store-sqlite`).
//! The importer and the birthday scheduler depend on this abstraction, not on
//! any concrete backend, and receive the store they work against explicitly.

use std::future::Future;

use crate::contact::{
  Category, Contact, ContactEvent, ContactNews, ContactPatch, NewContact,
  NewContactEvent, NewContactNews, WriteOutcome,
};

/// Abstraction over an Oruma contact book backend.
///
/// Failures never panic across this boundary: every method reports them
/// through `Self::Error` so callers can tell "did not happen" apart from
/// "found nothing". Lookups by key return `Ok(None)` when no row matches.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create any missing tables and triggers and seed the default
  /// categories. Idempotent; safe to call before every unit of work.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Categories ────────────────────────────────────────────────────────

  /// Insert a category. Fails if the name is already taken.
  fn add_category<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + 'a;

  fn get_category_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  fn get_category_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + 'a;

  /// All categories, ordered by name.
  fn get_all_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Insert a contact. Fails if `native_id` is already present.
  fn add_contact(
    &self,
    contact: NewContact,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + '_;

  /// Write only the columns present in `patch`.
  ///
  /// Returns `Ok(None)` without touching storage when the patch is empty.
  fn update_contact(
    &self,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<WriteOutcome>, Self::Error>> + Send + '_;

  fn get_contact_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn get_contact_by_native_id<'a>(
    &'a self,
    native_id: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// All contacts, ordered by last name then first name.
  fn get_all_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Contacts in one category, ordered by last name then first name.
  fn get_contacts_by_category(
    &self,
    category_id: i64,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Delete a contact together with its events and news.
  fn delete_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + '_;

  // ── Events & news (append-only) ───────────────────────────────────────

  fn add_event_for_contact(
    &self,
    contact_id: i64,
    event: NewContactEvent,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + '_;

  /// Events for a contact, newest date first; ties and undated events are
  /// ordered by id, newest first.
  fn get_events_for_contact(
    &self,
    contact_id: i64,
  ) -> impl Future<Output = Result<Vec<ContactEvent>, Self::Error>> + Send + '_;

  fn add_news_for_contact(
    &self,
    contact_id: i64,
    news: NewContactNews,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + '_;

  /// News for a contact, most recently recorded first.
  fn get_news_for_contact(
    &self,
    contact_id: i64,
  ) -> impl Future<Output = Result<Vec<ContactNews>, Self::Error>> + Send + '_;
}

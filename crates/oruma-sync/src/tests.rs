//! Import tests against an in-memory store and a scripted address book.

use std::sync::atomic::{AtomicUsize, Ordering};

use oruma_core::{
  birthday::DeviceBirthday,
  contact::{IMPORT_CATEGORY, NewContact},
  host::{AddressBook, DeviceContact, DeviceEmail, DevicePhoneNumber},
  store::ContactStore,
};
use oruma_store_sqlite::SqliteStore;

use crate::{ContactImporter, SyncOutcome, SyncReport, map_device_contact};

// ─── Fake address book ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("address book unavailable")]
struct Unavailable;

#[derive(Default)]
struct FakeAddressBook {
  granted:     bool,
  unreadable:  bool,
  contacts:    Vec<DeviceContact>,
  fetch_calls: AtomicUsize,
}

impl FakeAddressBook {
  fn granted(contacts: Vec<DeviceContact>) -> Self {
    Self { granted: true, contacts, ..Default::default() }
  }
}

impl AddressBook for FakeAddressBook {
  type Error = Unavailable;

  async fn request_permission(&self) -> Result<bool, Unavailable> { Ok(self.granted) }

  async fn fetch_contacts(&self) -> Result<Vec<DeviceContact>, Unavailable> {
    self.fetch_calls.fetch_add(1, Ordering::SeqCst);
    if self.unreadable {
      return Err(Unavailable);
    }
    Ok(self.contacts.clone())
  }
}

fn device(id: &str, first: &str, last: &str) -> DeviceContact {
  DeviceContact {
    id: Some(id.into()),
    first_name: Some(first.into()),
    last_name: Some(last.into()),
    ..Default::default()
  }
}

async fn importer(book: FakeAddressBook) -> ContactImporter<SqliteStore, FakeAddressBook> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  ContactImporter::new(store, book)
}

fn completed(outcome: SyncOutcome) -> SyncReport {
  match outcome {
    SyncOutcome::Completed(report) => report,
    SyncOutcome::PermissionDenied => panic!("expected a completed sync"),
  }
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

#[test]
fn maps_first_phone_and_email_and_full_birthday() {
  let entry = DeviceContact {
    phone_numbers: vec![
      DevicePhoneNumber { number: Some("555-0100".into()), label: Some("mobile".into()) },
      DevicePhoneNumber { number: Some("555-0199".into()), label: Some("work".into()) },
    ],
    emails: vec![
      DeviceEmail { email: Some("first@example.com".into()), label: None },
      DeviceEmail { email: Some("second@example.com".into()), label: None },
    ],
    birthday: Some(DeviceBirthday { year: Some(1990), month: Some(5), day: Some(3) }),
    ..device("abc", "Alice", "Liddell")
  };

  assert_eq!(
    map_device_contact(&entry, "abc", Some(4)),
    NewContact {
      native_id: Some("abc".into()),
      first_name: Some("Alice".into()),
      last_name: Some("Liddell".into()),
      phone_number: Some("555-0100".into()),
      email: Some("first@example.com".into()),
      category_id: Some(4),
      birthday: Some("1990-05-03".into()),
      food_preferences: None,
      notes: None,
    }
  );
}

#[test]
fn maps_blank_and_partial_fields_to_none() {
  let entry = DeviceContact {
    first_name: Some(String::new()),
    phone_numbers: vec![DevicePhoneNumber { number: None, label: None }],
    birthday: Some(DeviceBirthday { year: None, month: Some(5), day: None }),
    ..device("xyz", "", "Solo")
  };

  let mapped = map_device_contact(&entry, "xyz", None);
  assert_eq!(mapped.first_name, None);
  assert_eq!(mapped.last_name.as_deref(), Some("Solo"));
  assert_eq!(mapped.phone_number, None);
  assert_eq!(mapped.email, None);
  assert_eq!(mapped.birthday, None);
  assert_eq!(mapped.category_id, None);
}

// ─── Sync ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_adds_new_contacts_in_import_category() {
  let imp = importer(FakeAddressBook::granted(vec![
    device("1", "Alice", "Liddell"),
    device("2", "Bob", "Builder"),
  ]))
  .await;

  let report = completed(imp.sync().await.unwrap());
  assert_eq!(report, SyncReport { fetched: 2, added: 2, ..Default::default() });

  let category = imp
    .store()
    .get_category_by_name(IMPORT_CATEGORY)
    .await
    .unwrap()
    .unwrap();
  let contacts = imp.store().get_all_contacts().await.unwrap();
  assert_eq!(contacts.len(), 2);
  assert!(contacts.iter().all(|c| c.category_id == Some(category.id)));
  assert_eq!(contacts[0].native_id.as_deref(), Some("2"));
}

#[tokio::test]
async fn syncing_twice_never_duplicates() {
  let imp = importer(FakeAddressBook::granted(vec![
    device("1", "Alice", "Liddell"),
    device("2", "Bob", "Builder"),
  ]))
  .await;

  completed(imp.sync().await.unwrap());
  let second = completed(imp.sync().await.unwrap());

  assert_eq!(second.added, 0);
  assert_eq!(second.already_present, 2);
  assert_eq!(imp.store().get_all_contacts().await.unwrap().len(), 2);
}

#[tokio::test]
async fn repeated_id_within_one_snapshot_is_added_once() {
  let imp = importer(FakeAddressBook::granted(vec![
    device("1", "Alice", "Liddell"),
    device("1", "Alice", "Liddell"),
  ]))
  .await;

  let report = completed(imp.sync().await.unwrap());
  assert_eq!(report.added, 1);
  assert_eq!(report.already_present, 1);
}

#[tokio::test]
async fn entries_without_id_are_skipped() {
  let mut anonymous = device("", "No", "Id");
  anonymous.id = None;
  let imp = importer(FakeAddressBook::granted(vec![
    anonymous,
    device("", "Empty", "Id"),
    device("3", "Carol", "Singer"),
  ]))
  .await;

  let report = completed(imp.sync().await.unwrap());
  assert_eq!(report.missing_id, 2);
  assert_eq!(report.added, 1);
  assert_eq!(imp.store().get_all_contacts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn existing_contact_is_not_refreshed_from_device() {
  let imp = importer(FakeAddressBook::granted(vec![device("1", "Alicia", "Renamed")])).await;
  imp
    .store()
    .add_contact(NewContact {
      native_id: Some("1".into()),
      first_name: Some("Alice".into()),
      last_name: Some("Liddell".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let report = completed(imp.sync().await.unwrap());
  assert_eq!(report.already_present, 1);

  let contact = imp.store().get_contact_by_native_id("1").await.unwrap().unwrap();
  assert_eq!(contact.first_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn permission_denied_aborts_before_reading() {
  let book = FakeAddressBook {
    granted: false,
    contacts: vec![device("1", "Alice", "Liddell")],
    ..Default::default()
  };
  let imp = importer(book).await;

  assert_eq!(imp.sync().await.unwrap(), SyncOutcome::PermissionDenied);
  assert!(imp.store().get_all_contacts().await.unwrap().is_empty());
  assert_eq!(imp.address_book().fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreadable_address_book_counts_as_empty() {
  let book = FakeAddressBook { granted: true, unreadable: true, ..Default::default() };
  let imp = importer(book).await;

  let report = completed(imp.sync().await.unwrap());
  assert_eq!(report, SyncReport::default());
}

#[tokio::test]
async fn partial_birthday_is_not_stored() {
  let mut entry = device("9", "Dora", "Explorer");
  entry.birthday = Some(DeviceBirthday { year: None, month: Some(5), day: Some(3) });
  let imp = importer(FakeAddressBook::granted(vec![entry])).await;

  completed(imp.sync().await.unwrap());

  let contact = imp.store().get_contact_by_native_id("9").await.unwrap().unwrap();
  assert_eq!(contact.birthday, None);
}

//! Integration tests for `SqliteStore` against an in-memory database.

use oruma_core::{
  contact::{
    ContactPatch, DEFAULT_CATEGORIES, NewContact, NewContactEvent, NewContactNews,
  },
  store::ContactStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person(first: &str, last: &str) -> NewContact {
  NewContact {
    first_name: Some(first.into()),
    last_name: Some(last.into()),
    ..Default::default()
  }
}

async fn add(s: &SqliteStore, contact: NewContact) -> i64 {
  s.add_contact(contact).await.unwrap().last_insert_id
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_seeds_default_categories() {
  let s = store().await;

  let names: Vec<_> = s
    .get_all_categories()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  let mut expected: Vec<_> = DEFAULT_CATEGORIES.iter().map(|n| n.to_string()).collect();
  expected.sort();
  assert_eq!(names, expected);
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
  let s = store().await;
  s.add_category("Neighbours").await.unwrap();

  for _ in 0..3 {
    s.ensure_schema().await.unwrap();
  }

  let categories = s.get_all_categories().await.unwrap();
  assert_eq!(categories.len(), DEFAULT_CATEGORIES.len() + 1);
  for name in DEFAULT_CATEGORIES {
    assert_eq!(categories.iter().filter(|c| c.name == name).count(), 1);
  }
}

#[tokio::test]
async fn ensure_schema_keeps_existing_rows() {
  let s = store().await;
  let id = add(&s, person("Alice", "Liddell")).await;

  s.ensure_schema().await.unwrap();

  assert!(s.get_contact_by_id(id).await.unwrap().is_some());
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_category_twice_is_rejected_as_duplicate() {
  let s = store().await;

  let first = s.add_category("Climbing").await.unwrap();
  assert_eq!(first.changes, 1);

  let second = s.add_category("Climbing").await;
  assert!(matches!(second, Err(Error::Duplicate(_))));

  let categories = s.get_all_categories().await.unwrap();
  assert_eq!(categories.iter().filter(|c| c.name == "Climbing").count(), 1);
}

#[tokio::test]
async fn default_category_cannot_be_added_again() {
  let s = store().await;
  let err = s.add_category("Friends").await.unwrap_err();
  assert!(err.is_duplicate());
}

#[tokio::test]
async fn get_category_by_id_and_name() {
  let s = store().await;
  let outcome = s.add_category("Book Club").await.unwrap();

  let by_id = s
    .get_category_by_id(outcome.last_insert_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_id.name, "Book Club");

  let by_name = s.get_category_by_name("Book Club").await.unwrap().unwrap();
  assert_eq!(by_name.id, outcome.last_insert_id);

  assert!(s.get_category_by_name("Nobody").await.unwrap().is_none());
  assert!(s.get_category_by_id(9_999).await.unwrap().is_none());
}

#[tokio::test]
async fn categories_sorted_by_name() {
  let s = store().await;
  s.add_category("Zumba").await.unwrap();
  s.add_category("Archery").await.unwrap();

  let names: Vec<_> = s
    .get_all_categories()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  let mut sorted = names.clone();
  sorted.sort();
  assert_eq!(names, sorted);
  assert_eq!(names.first().map(String::as_str), Some("Archery"));
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_contact() {
  let s = store().await;
  let family = s.get_category_by_name("Family").await.unwrap().unwrap();

  let id = add(
    &s,
    NewContact {
      native_id: Some("device-1".into()),
      phone_number: Some("+44 20 7946 0000".into()),
      email: Some("alice@example.com".into()),
      category_id: Some(family.id),
      birthday: Some("1990-05-03".into()),
      food_preferences: Some("vegetarian".into()),
      notes: Some("met at the tea party".into()),
      ..person("Alice", "Liddell")
    },
  )
  .await;

  let contact = s.get_contact_by_id(id).await.unwrap().unwrap();
  assert_eq!(contact.first_name.as_deref(), Some("Alice"));
  assert_eq!(contact.last_name.as_deref(), Some("Liddell"));
  assert_eq!(contact.category_id, Some(family.id));
  assert_eq!(contact.birthday.as_deref(), Some("1990-05-03"));
  assert_eq!(contact.food_preferences.as_deref(), Some("vegetarian"));
  assert_eq!(contact.created_at, contact.updated_at);

  let by_native = s.get_contact_by_native_id("device-1").await.unwrap().unwrap();
  assert_eq!(by_native.id, id);
}

#[tokio::test]
async fn get_contact_missing_returns_none() {
  let s = store().await;
  assert!(s.get_contact_by_id(42).await.unwrap().is_none());
  assert!(s.get_contact_by_native_id("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_native_id_is_rejected() {
  let s = store().await;
  let contact = NewContact { native_id: Some("device-7".into()), ..person("Bob", "Builder") };

  s.add_contact(contact.clone()).await.unwrap();
  let err = s.add_contact(contact).await.unwrap_err();
  assert!(err.is_duplicate());

  assert_eq!(s.get_all_contacts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn contacts_without_native_id_may_repeat() {
  let s = store().await;
  add(&s, person("Carol", "Singer")).await;
  add(&s, person("Carol", "Singer")).await;
  assert_eq!(s.get_all_contacts().await.unwrap().len(), 2);
}

#[tokio::test]
async fn contacts_sorted_by_last_then_first_name() {
  let s = store().await;
  add(&s, person("Zoe", "Adams")).await;
  add(&s, person("Bob", "Young")).await;
  add(&s, person("Amy", "Adams")).await;
  add(&s, person("Carl", "Marx")).await;

  let names: Vec<_> = s
    .get_all_contacts()
    .await
    .unwrap()
    .into_iter()
    .map(|c| (c.last_name.unwrap(), c.first_name.unwrap()))
    .collect();
  assert_eq!(
    names,
    vec![
      ("Adams".to_string(), "Amy".to_string()),
      ("Adams".to_string(), "Zoe".to_string()),
      ("Marx".to_string(), "Carl".to_string()),
      ("Young".to_string(), "Bob".to_string()),
    ]
  );
}

#[tokio::test]
async fn contacts_filtered_by_category() {
  let s = store().await;
  let work = s.get_category_by_name("Work Colleagues").await.unwrap().unwrap();

  add(&s, NewContact { category_id: Some(work.id), ..person("Wes", "Worker") }).await;
  add(&s, NewContact { category_id: Some(work.id), ..person("Ann", "Worker") }).await;
  add(&s, person("Pat", "Other")).await;

  let colleagues = s.get_contacts_by_category(work.id).await.unwrap();
  assert_eq!(colleagues.len(), 2);
  assert!(colleagues.iter().all(|c| c.category_id == Some(work.id)));
  assert_eq!(colleagues[0].first_name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn contact_with_unknown_category_is_rejected() {
  let s = store().await;
  let err = s
    .add_contact(NewContact { category_id: Some(9_999), ..person("Lost", "Soul") })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_writes_only_supplied_fields() {
  let s = store().await;
  let id = add(
    &s,
    NewContact {
      email: Some("old@example.com".into()),
      notes: Some("keep me".into()),
      birthday: Some("1980-01-01".into()),
      ..person("Dora", "Explorer")
    },
  )
  .await;

  let outcome = s
    .update_contact(
      id,
      ContactPatch {
        email: Some(Some("new@example.com".into())),
        birthday: Some(None),
        ..Default::default()
      },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(outcome.changes, 1);

  let contact = s.get_contact_by_id(id).await.unwrap().unwrap();
  assert_eq!(contact.email.as_deref(), Some("new@example.com"));
  assert_eq!(contact.birthday, None);
  assert_eq!(contact.notes.as_deref(), Some("keep me"));
  assert_eq!(contact.first_name.as_deref(), Some("Dora"));
}

#[tokio::test]
async fn empty_update_is_a_no_op() {
  let s = store().await;
  let id = add(&s, person("Eve", "Adams")).await;
  let before = s.get_contact_by_id(id).await.unwrap().unwrap();

  let outcome = s.update_contact(id, ContactPatch::default()).await.unwrap();
  assert!(outcome.is_none());

  let after = s.get_contact_by_id(id).await.unwrap().unwrap();
  assert_eq!(before, after);
}

#[tokio::test]
async fn update_of_missing_contact_changes_nothing() {
  let s = store().await;
  let outcome = s
    .update_contact(
      404,
      ContactPatch { notes: Some(Some("ghost".into())), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(outcome.changes, 0);
}

#[tokio::test]
async fn update_refreshes_updated_at() {
  let s = store().await;
  let id = add(&s, person("Finn", "Human")).await;

  // The trigger fires on any update, including this backdating one, so the
  // old timestamp never sticks.
  s.exec_raw("UPDATE contacts SET updated_at = '2000-01-01 00:00:00'")
    .await
    .unwrap();

  let contact = s.get_contact_by_id(id).await.unwrap().unwrap();
  assert!(contact.updated_at.format("%Y").to_string() != "2000");
  assert!(contact.updated_at >= contact.created_at);
}

#[tokio::test]
async fn update_to_taken_native_id_is_rejected() {
  let s = store().await;
  add(&s, NewContact { native_id: Some("a".into()), ..person("A", "A") }).await;
  let b = add(&s, NewContact { native_id: Some("b".into()), ..person("B", "B") }).await;

  let err = s
    .update_contact(b, ContactPatch { native_id: Some(Some("a".into())), ..Default::default() })
    .await
    .unwrap_err();
  assert!(err.is_duplicate());
}

// ─── Events & news ───────────────────────────────────────────────────────────

fn event(name: &str, date: Option<&str>) -> NewContactEvent {
  NewContactEvent {
    event_name:  name.into(),
    event_date:  date.map(str::to_owned),
    description: None,
  }
}

#[tokio::test]
async fn events_newest_first_with_id_tie_break() {
  let s = store().await;
  let id = add(&s, person("Gus", "Goose")).await;

  s.add_event_for_contact(id, event("graduation", Some("2019-06-01"))).await.unwrap();
  s.add_event_for_contact(id, event("wedding", Some("2023-09-09"))).await.unwrap();
  s.add_event_for_contact(id, event("someday", None)).await.unwrap();
  s.add_event_for_contact(id, event("reception", Some("2023-09-09"))).await.unwrap();

  let names: Vec<_> = s
    .get_events_for_contact(id)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.event_name)
    .collect();
  assert_eq!(names, vec!["reception", "wedding", "graduation", "someday"]);
}

#[tokio::test]
async fn blank_event_fields_stored_as_null() {
  let s = store().await;
  let id = add(&s, person("Hal", "Jordan")).await;

  s.add_event_for_contact(
    id,
    NewContactEvent {
      event_name:  "moved house".into(),
      event_date:  Some(String::new()),
      description: Some(String::new()),
    },
  )
  .await
  .unwrap();

  let events = s.get_events_for_contact(id).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].contact_id, id);
  assert_eq!(events[0].event_date, None);
  assert_eq!(events[0].description, None);
}

#[tokio::test]
async fn event_for_missing_contact_is_rejected() {
  let s = store().await;
  let err = s
    .add_event_for_contact(77, event("phantom", None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingReference(_)));
}

#[tokio::test]
async fn news_newest_first() {
  let s = store().await;
  let id = add(&s, person("Ivy", "League")).await;

  for item in ["started a new job", "adopted a cat", "ran a marathon"] {
    s.add_news_for_contact(id, NewContactNews { news_item: item.into() })
      .await
      .unwrap();
  }

  let news = s.get_news_for_contact(id).await.unwrap();
  let items: Vec<_> = news.iter().map(|n| n.news_item.as_str()).collect();
  // Same-second timestamps fall back to id order.
  assert_eq!(items, vec!["ran a marathon", "adopted a cat", "started a new job"]);
  assert!(news.iter().all(|n| n.contact_id == id));
}

#[tokio::test]
async fn delete_contact_cascades_to_events_and_news() {
  let s = store().await;
  let doomed = add(&s, person("Jack", "Sparrow")).await;
  let kept = add(&s, person("Will", "Turner")).await;

  for id in [doomed, kept] {
    s.add_event_for_contact(id, event("voyage", Some("1720-01-01"))).await.unwrap();
    s.add_news_for_contact(id, NewContactNews { news_item: "lost the ship".into() })
      .await
      .unwrap();
  }

  let outcome = s.delete_contact(doomed).await.unwrap();
  assert_eq!(outcome.changes, 1);

  assert!(s.get_contact_by_id(doomed).await.unwrap().is_none());
  assert!(s.get_events_for_contact(doomed).await.unwrap().is_empty());
  assert!(s.get_news_for_contact(doomed).await.unwrap().is_empty());

  assert_eq!(s.get_events_for_contact(kept).await.unwrap().len(), 1);
  assert_eq!(s.get_news_for_contact(kept).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_missing_contact_changes_nothing() {
  let s = store().await;
  assert_eq!(s.delete_contact(5).await.unwrap().changes, 0);
}

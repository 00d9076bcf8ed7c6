//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, ffi};

use oruma_core::{
  contact::{
    Category, Contact, ContactEvent, ContactNews, ContactPatch, DEFAULT_CATEGORIES,
    NewContact, NewContactEvent, NewContactNews, WriteOutcome,
  },
  store::ContactStore,
};

use crate::{
  Error, Result,
  encode::{
    CONTACT_COLUMNS, RawContact, RawNews, blank_to_null, encode_patch, event_from_row,
  },
  error::rusqlite_constraint_code,
  schema::{INSERT_CATEGORY, PRAGMAS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Oruma contact book backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. The handle
/// is meant to be opened once and passed to every component that needs it.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Run a write statement and report its row counts.
  async fn write<F>(&self, what: impl FnOnce() -> String, statement: F) -> Result<WriteOutcome>
  where
    F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<usize> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let changes = statement(conn)?;
        Ok(WriteOutcome { last_insert_id: conn.last_insert_rowid(), changes })
      })
      .await
      .map_err(|e| Error::from_write(e, what))
  }

  async fn query_contacts(
    &self,
    filter: &'static str,
    params: Vec<i64>,
  ) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts {filter} ORDER BY last_name, first_name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn query_contact(
    &self,
    column: &'static str,
    key: rusqlite::types::Value,
  ) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE {column} = ?1"),
              [key],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn query_category(
    &self,
    column: &'static str,
    key: rusqlite::types::Value,
  ) -> Result<Option<Category>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT id, name FROM categories WHERE {column} = ?1"),
                [key],
                |row| Ok(Category { id: row.get(0)?, name: row.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }
}

/// Log a failed accessor at the data-layer boundary and hand the error back.
///
/// Uniqueness violations are expected (re-adding a category, re-importing a
/// device contact) and only warrant a warning.
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
  match &result {
    Err(e) if e.is_duplicate() => tracing::warn!(operation, error = %e, "write rejected"),
    Err(e) => tracing::error!(operation, error = %e, "store operation failed"),
    Ok(_) => {}
  }
  result
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn ensure_schema(&self) -> Result<()> {
    let seeded: usize = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        let mut seeded = 0;
        for name in DEFAULT_CATEGORIES {
          match tx.execute(INSERT_CATEGORY, [name]) {
            Ok(_) => seeded += 1,
            Err(e) if rusqlite_constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {}
            Err(e) => return Err(e.into()),
          }
        }

        tx.commit()?;
        Ok(seeded)
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| tracing::error!(error = %e, "schema initialisation failed"))?;

    if seeded > 0 {
      tracing::info!(seeded, "database schema initialised");
    } else {
      tracing::debug!("database schema already initialised");
    }
    Ok(())
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn add_category(&self, name: &str) -> Result<WriteOutcome> {
    let name = name.to_owned();
    let label = format!("category {name:?}");

    let result = self
      .write(
        || label,
        move |conn| conn.execute(INSERT_CATEGORY, [name]),
      )
      .await;
    logged("add category", result)
  }

  async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
    logged(
      "get category by id",
      self.query_category("id", id.into()).await,
    )
  }

  async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
    logged(
      "get category by name",
      self.query_category("name", name.to_owned().into()).await,
    )
  }

  async fn get_all_categories(&self) -> Result<Vec<Category>> {
    let result = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| Ok(Category { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from);
    logged("get all categories", result)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn add_contact(&self, contact: NewContact) -> Result<WriteOutcome> {
    let label = match &contact.native_id {
      Some(native_id) => format!("contact with native id {native_id:?}"),
      None => "contact".to_owned(),
    };

    let result = self
      .write(
        || label,
        move |conn| {
          conn.execute(
            "INSERT INTO contacts (
               native_id, first_name, last_name, phone_number, email,
               category_id, birthday, food_preferences, notes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
              contact.native_id,
              contact.first_name,
              contact.last_name,
              contact.phone_number,
              contact.email,
              contact.category_id,
              contact.birthday,
              contact.food_preferences,
              contact.notes,
            ],
          )
        },
      )
      .await;
    logged("add contact", result)
  }

  async fn update_contact(&self, id: i64, patch: ContactPatch) -> Result<Option<WriteOutcome>> {
    let assignments = encode_patch(patch);
    if assignments.is_empty() {
      tracing::debug!(contact_id = id, "empty contact patch; nothing to update");
      return Ok(None);
    }

    let set_clause = assignments
      .iter()
      .enumerate()
      .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let mut values: Vec<rusqlite::types::Value> =
      assignments.into_iter().map(|(_, value)| value).collect();
    values.push(id.into());
    // `updated_at` is refreshed by the `update_contacts_updated_at` trigger.
    let sql = format!("UPDATE contacts SET {set_clause} WHERE id = ?{}", values.len());

    let result = self
      .write(
        || format!("contact {id} field value"),
        move |conn| conn.execute(&sql, rusqlite::params_from_iter(values)),
      )
      .await;
    logged("update contact", result).map(Some)
  }

  async fn get_contact_by_id(&self, id: i64) -> Result<Option<Contact>> {
    logged("get contact by id", self.query_contact("id", id.into()).await)
  }

  async fn get_contact_by_native_id(&self, native_id: &str) -> Result<Option<Contact>> {
    logged(
      "get contact by native id",
      self.query_contact("native_id", native_id.to_owned().into()).await,
    )
  }

  async fn get_all_contacts(&self) -> Result<Vec<Contact>> {
    logged("get all contacts", self.query_contacts("", Vec::new()).await)
  }

  async fn get_contacts_by_category(&self, category_id: i64) -> Result<Vec<Contact>> {
    logged(
      "get contacts by category",
      self
        .query_contacts("WHERE category_id = ?1", vec![category_id])
        .await,
    )
  }

  async fn delete_contact(&self, id: i64) -> Result<WriteOutcome> {
    // Events and news go with it via ON DELETE CASCADE.
    let result = self
      .write(
        || format!("contact {id}"),
        move |conn| conn.execute("DELETE FROM contacts WHERE id = ?1", [id]),
      )
      .await;
    logged("delete contact", result)
  }

  // ── Events & news ─────────────────────────────────────────────────────────

  async fn add_event_for_contact(
    &self,
    contact_id: i64,
    event: NewContactEvent,
  ) -> Result<WriteOutcome> {
    let event_date = blank_to_null(event.event_date);
    let description = blank_to_null(event.description);

    let result = self
      .write(
        || format!("contact {contact_id}"),
        move |conn| {
          conn.execute(
            "INSERT INTO contact_events (contact_id, event_name, event_date, description)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![contact_id, event.event_name, event_date, description],
          )
        },
      )
      .await;
    logged("add event for contact", result)
  }

  async fn get_events_for_contact(&self, contact_id: i64) -> Result<Vec<ContactEvent>> {
    let result = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, contact_id, event_name, event_date, description
           FROM contact_events
           WHERE contact_id = ?1
           ORDER BY event_date DESC, id DESC",
        )?;
        let rows = stmt
          .query_map([contact_id], event_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from);
    logged("get events for contact", result)
  }

  async fn add_news_for_contact(
    &self,
    contact_id: i64,
    news: NewContactNews,
  ) -> Result<WriteOutcome> {
    let result = self
      .write(
        || format!("contact {contact_id}"),
        move |conn| {
          conn.execute(
            "INSERT INTO contact_news (contact_id, news_item) VALUES (?1, ?2)",
            rusqlite::params![contact_id, news.news_item],
          )
        },
      )
      .await;
    logged("add news for contact", result)
  }

  async fn get_news_for_contact(&self, contact_id: i64) -> Result<Vec<ContactNews>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, contact_id, news_item, date_recorded
           FROM contact_news
           WHERE contact_id = ?1
           ORDER BY date_recorded DESC, id DESC",
        )?;
        let rows = stmt
          .query_map([contact_id], RawNews::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from);

    let result = raws.and_then(|raws| raws.into_iter().map(RawNews::into_news).collect());
    logged("get news for contact", result)
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Run raw SQL against the connection; lets tests reach past the accessors.
  pub(crate) async fn exec_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

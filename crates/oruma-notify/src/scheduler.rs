//! [`BirthdayScheduler`] — keeps the host's pending reminders in line with
//! the birthdays in the store.

use oruma_core::{
  birthday::MonthDay, contact::Contact, host::Notifier, store::ContactStore,
};
use serde::Serialize;

use crate::{
  Error, Result,
  reminder::{birthday_request, default_channel, notification_id},
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What happened to one contact's reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "identifier", rename_all = "snake_case")]
pub enum ScheduleOutcome {
  /// The contact has no birthday; nothing was registered.
  NoBirthday,
  /// The birthday could not be read as a month and day; nothing changed.
  Malformed,
  /// A reminder is now pending under this identifier.
  Scheduled(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
  /// Contacts in the store.
  pub contacts:  usize,
  /// Contacts with a birthday, i.e. reminders attempted.
  pub attempted: usize,
  pub scheduled: usize,
  /// Birthdays that could not be parsed.
  pub skipped:   usize,
  /// Reminders the notification service rejected.
  pub failed:    usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleAllOutcome {
  PermissionDenied,
  Completed(ScheduleReport),
}

fn birthday_of(contact: &Contact) -> Option<&str> {
  contact.birthday.as_deref().filter(|b| !b.is_empty())
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

pub struct BirthdayScheduler<S, N> {
  store:    S,
  notifier: N,
}

impl<S, N> BirthdayScheduler<S, N>
where
  S: ContactStore,
  N: Notifier,
{
  pub fn new(store: S, notifier: N) -> Self { Self { store, notifier } }

  pub fn store(&self) -> &S { &self.store }

  pub fn notifier(&self) -> &N { &self.notifier }

  /// Ask for notification permission and, once granted, set up the delivery
  /// channel. Any failure reads as "not granted".
  pub async fn request_permissions(&self) -> bool {
    match self.notifier.request_permission().await {
      Ok(true) => {}
      Ok(false) => {
        tracing::warn!("notification permission not granted");
        return false;
      }
      Err(e) => {
        tracing::error!(error = %e, "notification permission request failed");
        return false;
      }
    }

    if let Err(e) = self.notifier.ensure_channel(&default_channel()).await {
      tracing::error!(error = %e, "failed to set up notification channel");
      return false;
    }
    tracing::info!("notification permission granted");
    true
  }

  /// Register (or replace) the yearly reminder for one contact.
  ///
  /// A missing or malformed birthday is a silent no-op: any reminder already
  /// pending for the contact is left as it is.
  pub async fn schedule_one(&self, contact: &Contact) -> Result<ScheduleOutcome> {
    let Some(birthday) = birthday_of(contact) else {
      return Ok(ScheduleOutcome::NoBirthday);
    };

    let date = match MonthDay::parse_stored(birthday) {
      Ok(date) => date,
      Err(e) => {
        tracing::warn!(contact_id = contact.id, error = %e, "skipping reminder");
        return Ok(ScheduleOutcome::Malformed);
      }
    };

    let request = birthday_request(contact, date);
    let identifier = request.identifier.clone();

    self.cancel(&identifier).await?;
    self
      .notifier
      .schedule(request)
      .await
      .map_err(|e| Error::Notifier(Box::new(e)))
      .inspect_err(|e| {
        tracing::error!(contact_id = contact.id, error = %e, "failed to schedule reminder")
      })?;

    tracing::debug!(
      contact_id = contact.id,
      month = date.month,
      day = date.day,
      "scheduled birthday reminder"
    );
    Ok(ScheduleOutcome::Scheduled(identifier))
  }

  /// Drop the pending reminder for a contact, if any.
  pub async fn cancel_for(&self, contact_id: i64) -> Result<()> {
    self.cancel(&notification_id(contact_id)).await
  }

  /// Bring one contact's reminder in line with its current birthday, e.g.
  /// after the contact was edited. Returns [`ScheduleOutcome::NoBirthday`]
  /// once a cleared birthday's reminder has been cancelled.
  pub async fn refresh(&self, contact: &Contact) -> Result<ScheduleOutcome> {
    if birthday_of(contact).is_some() {
      return self.schedule_one(contact).await;
    }
    self.cancel_for(contact.id).await?;
    Ok(ScheduleOutcome::NoBirthday)
  }

  /// Schedule reminders for every contact with a birthday.
  pub async fn schedule_all(&self) -> Result<ScheduleAllOutcome> {
    tracing::info!("scheduling all birthday reminders");
    if !self.request_permissions().await {
      tracing::info!("cannot schedule birthday reminders without permission");
      return Ok(ScheduleAllOutcome::PermissionDenied);
    }

    self
      .store
      .ensure_schema()
      .await
      .map_err(|e| Error::Schema(Box::new(e)))?;
    let contacts = self
      .store
      .get_all_contacts()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let mut report = ScheduleReport { contacts: contacts.len(), ..Default::default() };
    if contacts.is_empty() {
      tracing::info!("no contacts to schedule reminders for");
      return Ok(ScheduleAllOutcome::Completed(report));
    }

    for contact in contacts.iter().filter(|c| birthday_of(c).is_some()) {
      report.attempted += 1;
      match self.schedule_one(contact).await {
        Ok(ScheduleOutcome::Scheduled(_)) => report.scheduled += 1,
        Ok(ScheduleOutcome::Malformed) => report.skipped += 1,
        Ok(ScheduleOutcome::NoBirthday) => {}
        // Already logged; keep going with the rest.
        Err(_) => report.failed += 1,
      }
    }

    tracing::info!(
      attempted = report.attempted,
      scheduled = report.scheduled,
      contacts = report.contacts,
      "birthday reminders scheduled"
    );
    Ok(ScheduleAllOutcome::Completed(report))
  }

  async fn cancel(&self, identifier: &str) -> Result<()> {
    self
      .notifier
      .cancel(identifier)
      .await
      .map_err(|e| Error::Notifier(Box::new(e)))
      .inspect_err(|e| tracing::error!(identifier, error = %e, "failed to cancel reminder"))
  }
}

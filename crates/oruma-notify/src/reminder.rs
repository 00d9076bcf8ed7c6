//! What a birthday reminder looks like.

use oruma_core::{
  birthday::MonthDay,
  contact::Contact,
  host::{AnnualTrigger, Importance, NotificationChannel, NotificationRequest},
};
use serde_json::json;

/// Local time reminders fire at.
pub const REMINDER_HOUR: u32 = 9;
pub const REMINDER_MINUTE: u32 = 0;

const CHANNEL_ID: &str = "default";

/// Stands in for the name of a contact with neither first nor last name.
const UNNAMED: &str = "a contact";

/// The notification identifier owned by a contact.
pub fn notification_id(contact_id: i64) -> String { format!("birthday-{contact_id}") }

/// Channel reminders are delivered on.
pub fn default_channel() -> NotificationChannel {
  NotificationChannel {
    id:                CHANNEL_ID.to_owned(),
    name:              CHANNEL_ID.to_owned(),
    importance:        Importance::Max,
    vibration_pattern: vec![0, 250, 250, 250],
    light_color:       "#FF231F7C".to_owned(),
  }
}

/// The yearly reminder for `contact`, whose birthday falls on `date`.
pub fn birthday_request(contact: &Contact, date: MonthDay) -> NotificationRequest {
  let name = contact.display_name();
  let name = if name.is_empty() { UNNAMED } else { name.as_str() };

  NotificationRequest {
    identifier: notification_id(contact.id),
    title:      "Birthday Reminder!".to_owned(),
    body:       format!("It's {name}'s birthday today! Don't forget to send your wishes."),
    data:       json!({ "contact_id": contact.id }),
    trigger:    AnnualTrigger {
      month:   date.month,
      day:     date.day,
      hour:    REMINDER_HOUR,
      minute:  REMINDER_MINUTE,
      repeats: true,
    },
  }
}

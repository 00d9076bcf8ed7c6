//! Host integrations: the device address book and the local notification
//! service.
//!
//! Both are platform collaborators. The traits describe exactly what the
//! importer and the birthday scheduler need from them.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::birthday::DeviceBirthday;

// ─── Address book ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePhoneNumber {
  pub number: Option<String>,
  #[serde(default)]
  pub label:  Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEmail {
  pub email: Option<String>,
  #[serde(default)]
  pub label: Option<String>,
}

/// One entry of an address-book snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceContact {
  /// Stable identifier assigned by the address book.
  pub id:            Option<String>,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  #[serde(default)]
  pub phone_numbers: Vec<DevicePhoneNumber>,
  #[serde(default)]
  pub emails:        Vec<DeviceEmail>,
  pub birthday:      Option<DeviceBirthday>,
}

/// Read access to the device address book.
pub trait AddressBook: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ask the host for read access. `Ok(false)` means the user declined.
  fn request_permission(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Read a full snapshot of the address book.
  fn fetch_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<DeviceContact>, Self::Error>> + Send + '_;
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
  Min,
  Low,
  Default,
  High,
  Max,
}

/// A delivery channel; only meaningful on hosts that group notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
  pub id:                String,
  pub name:              String,
  pub importance:        Importance,
  /// Alternating wait/vibrate durations in milliseconds.
  pub vibration_pattern: Vec<u64>,
  /// `#AARRGGBB`.
  pub light_color:       String,
}

/// Fires at a local wall-clock time on a calendar month/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTrigger {
  pub month:   u32,
  pub day:     u32,
  pub hour:    u32,
  pub minute:  u32,
  /// Fire again every year.
  pub repeats: bool,
}

/// A local notification to register with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
  /// Replaces any pending notification with the same identifier.
  pub identifier: String,
  pub title:      String,
  pub body:       String,
  /// Opaque payload delivered back to the app when the notification fires.
  pub data:       serde_json::Value,
  pub trigger:    AnnualTrigger,
}

/// The host's local notification service.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Current permission, prompting the user if it has not been decided.
  fn request_permission(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Create or update a delivery channel.
  fn ensure_channel<'a>(
    &'a self,
    channel: &'a NotificationChannel,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn schedule(
    &self,
    request: NotificationRequest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Cancel a pending notification. Unknown identifiers are not an error.
  fn cancel<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

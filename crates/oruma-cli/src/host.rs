//! File-backed stand-ins for the platform address book and notification
//! service, so every operation can be driven from a terminal.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use oruma_core::host::{
  AddressBook, DeviceContact, NotificationChannel, NotificationRequest, Notifier,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum HostError {
  #[error("failed to access {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid JSON in {path:?}: {source}")]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("notifications are disabled")]
  NotificationsDisabled,
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, HostError> {
  let bytes = tokio::fs::read(path)
    .await
    .map_err(|source| HostError::Io { path: path.to_owned(), source })?;
  serde_json::from_slice(&bytes).map_err(|source| HostError::Json { path: path.to_owned(), source })
}

// ─── Address book ────────────────────────────────────────────────────────────

/// Decode one snapshot entry. Numeric ids are taken as their decimal text.
fn decode_entry(mut entry: Value) -> serde_json::Result<DeviceContact> {
  if let Some(Value::Number(n)) = entry.get("id") {
    let id = n.to_string();
    entry["id"] = Value::String(id);
  }
  serde_json::from_value(entry)
}

/// An address-book snapshot exported to a JSON file. Access is "granted"
/// when the file exists.
///
/// The file must hold a JSON array. Entries that do not decode are logged
/// and left out of the snapshot.
pub struct JsonAddressBook {
  path: PathBuf,
}

impl JsonAddressBook {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl AddressBook for JsonAddressBook {
  type Error = HostError;

  async fn request_permission(&self) -> Result<bool, HostError> {
    tokio::fs::try_exists(&self.path)
      .await
      .map_err(|source| HostError::Io { path: self.path.clone(), source })
  }

  async fn fetch_contacts(&self) -> Result<Vec<DeviceContact>, HostError> {
    let entries: Vec<Value> = read_json(&self.path).await?;
    let contacts = entries
      .into_iter()
      .enumerate()
      .filter_map(|(index, entry)| {
        decode_entry(entry)
          .inspect_err(|e| {
            tracing::warn!(path = ?self.path, index, error = %e, "skipping unreadable entry")
          })
          .ok()
      })
      .collect();
    Ok(contacts)
  }
}

// ─── Alarm book ──────────────────────────────────────────────────────────────

/// On-disk contents of an [`AlarmBook`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AlarmLedger {
  #[serde(default)]
  pub channels: BTreeMap<String, NotificationChannel>,
  /// Pending notifications keyed by identifier.
  #[serde(default)]
  pub pending:  BTreeMap<String, NotificationRequest>,
}

/// A notification service that records pending reminders in a JSON file.
/// Every change rewrites the whole file.
///
/// When disabled it behaves like a host that withheld permission: new
/// reminders are refused, cancellations still apply.
pub struct AlarmBook {
  path:    PathBuf,
  enabled: bool,
  lock:    Mutex<()>,
}

impl AlarmBook {
  pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
    Self { path: path.into(), enabled, lock: Mutex::new(()) }
  }

  /// Current ledger; a missing file is an empty one.
  pub async fn load(&self) -> Result<AlarmLedger, HostError> {
    match tokio::fs::try_exists(&self.path).await {
      Ok(true) => read_json(&self.path).await,
      Ok(false) => Ok(AlarmLedger::default()),
      Err(source) => Err(HostError::Io { path: self.path.clone(), source }),
    }
  }

  async fn store(&self, ledger: &AlarmLedger) -> Result<(), HostError> {
    let json = serde_json::to_vec_pretty(ledger)
      .map_err(|source| HostError::Json { path: self.path.clone(), source })?;
    tokio::fs::write(&self.path, json)
      .await
      .map_err(|source| HostError::Io { path: self.path.clone(), source })
  }

  async fn modify(&self, change: impl FnOnce(&mut AlarmLedger) + Send) -> Result<(), HostError> {
    let _guard = self.lock.lock().await;
    let mut ledger = self.load().await?;
    change(&mut ledger);
    self.store(&ledger).await
  }
}

impl Notifier for AlarmBook {
  type Error = HostError;

  async fn request_permission(&self) -> Result<bool, HostError> { Ok(self.enabled) }

  async fn ensure_channel(&self, channel: &NotificationChannel) -> Result<(), HostError> {
    let channel = channel.clone();
    self
      .modify(move |ledger| {
        ledger.channels.insert(channel.id.clone(), channel);
      })
      .await
  }

  async fn schedule(&self, request: NotificationRequest) -> Result<(), HostError> {
    if !self.enabled {
      return Err(HostError::NotificationsDisabled);
    }
    self
      .modify(move |ledger| {
        ledger.pending.insert(request.identifier.clone(), request);
      })
      .await
  }

  async fn cancel(&self, identifier: &str) -> Result<(), HostError> {
    let identifier = identifier.to_owned();
    self
      .modify(move |ledger| {
        ledger.pending.remove(&identifier);
      })
      .await
  }
}

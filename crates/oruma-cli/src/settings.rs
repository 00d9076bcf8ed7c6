//! Runtime configuration: an optional TOML file layered under `ORUMA_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file.
  pub store_path:            PathBuf,
  /// JSON array of address-book entries read by `oruma sync`.
  pub address_book_path:     PathBuf,
  /// JSON ledger of pending reminders written by the birthday commands.
  pub alarms_path:           PathBuf,
  /// When false, the notification service refuses permission.
  pub notifications_enabled: bool,
}

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings: Self = config::Config::builder()
      .set_default("store_path", "oruma.db")?
      .set_default("address_book_path", "contacts.json")?
      .set_default("alarms_path", "alarms.json")?
      .set_default("notifications_enabled", true)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ORUMA"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    Ok(Self {
      store_path: expand_tilde(&settings.store_path),
      address_book_path: expand_tilde(&settings.address_book_path),
      alarms_path: expand_tilde(&settings.alarms_path),
      ..settings
    })
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

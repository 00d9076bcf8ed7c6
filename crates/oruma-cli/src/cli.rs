//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use oruma_core::contact::{ContactPatch, NewContact};

#[derive(Parser, Debug)]
#[command(name = "oruma", version, about = "Personal contact book with birthday reminders")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "oruma.toml", value_name = "FILE")]
  pub config: PathBuf,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create the database tables and default categories.
  Init,
  #[command(subcommand)]
  Categories(CategoryCommand),
  #[command(subcommand)]
  Contacts(ContactCommand),
  #[command(subcommand)]
  Events(EventCommand),
  #[command(subcommand)]
  News(NewsCommand),
  /// Import new entries from the address-book snapshot.
  Sync,
  #[command(subcommand)]
  Birthdays(BirthdayCommand),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
  List,
  Add { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
  List {
    /// Only contacts in this category.
    #[arg(long)]
    category: Option<i64>,
  },
  Show { id: i64 },
  Add {
    #[command(flatten)]
    fields: ContactFields,
  },
  Update {
    id:     i64,
    #[command(flatten)]
    fields: ContactFields,
    /// Clear a field (repeatable).
    #[arg(long, value_enum)]
    clear:  Vec<ContactField>,
  },
  Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
  List { contact_id: i64 },
  Add {
    contact_id:  i64,
    name:        String,
    /// YYYY-MM-DD.
    #[arg(long)]
    date:        Option<String>,
    #[arg(long)]
    description: Option<String>,
  },
}

#[derive(Subcommand, Debug)]
pub enum NewsCommand {
  List { contact_id: i64 },
  Add { contact_id: i64, item: String },
}

#[derive(Subcommand, Debug)]
pub enum BirthdayCommand {
  /// Register reminders for every contact with a birthday.
  ScheduleAll,
  /// Register (or replace) one contact's reminder.
  Schedule { contact_id: i64 },
  /// Remove one contact's reminder.
  Cancel { contact_id: i64 },
  /// Show pending reminders.
  Pending,
}

#[derive(Args, Debug, Default)]
pub struct ContactFields {
  #[arg(long)]
  pub native_id:        Option<String>,
  #[arg(long)]
  pub first_name:       Option<String>,
  #[arg(long)]
  pub last_name:        Option<String>,
  #[arg(long)]
  pub phone:            Option<String>,
  #[arg(long)]
  pub email:            Option<String>,
  /// Category id.
  #[arg(long)]
  pub category:         Option<i64>,
  /// YYYY-MM-DD.
  #[arg(long)]
  pub birthday:         Option<String>,
  #[arg(long)]
  pub food_preferences: Option<String>,
  #[arg(long)]
  pub notes:            Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
  NativeId,
  FirstName,
  LastName,
  Phone,
  Email,
  Category,
  Birthday,
  FoodPreferences,
  Notes,
}

impl ContactFields {
  pub fn into_new_contact(self) -> NewContact {
    NewContact {
      native_id:        self.native_id,
      first_name:       self.first_name,
      last_name:        self.last_name,
      phone_number:     self.phone,
      email:            self.email,
      category_id:      self.category,
      birthday:         self.birthday,
      food_preferences: self.food_preferences,
      notes:            self.notes,
    }
  }

  /// Supplied flags become writes; `clear` entries become NULL writes and
  /// win over a value given for the same field.
  pub fn into_patch(self, clear: &[ContactField]) -> ContactPatch {
    let mut patch = ContactPatch {
      native_id:        self.native_id.map(Some),
      first_name:       self.first_name.map(Some),
      last_name:        self.last_name.map(Some),
      phone_number:     self.phone.map(Some),
      email:            self.email.map(Some),
      category_id:      self.category.map(Some),
      birthday:         self.birthday.map(Some),
      food_preferences: self.food_preferences.map(Some),
      notes:            self.notes.map(Some),
    };
    for field in clear {
      match field {
        ContactField::NativeId => patch.native_id = Some(None),
        ContactField::FirstName => patch.first_name = Some(None),
        ContactField::LastName => patch.last_name = Some(None),
        ContactField::Phone => patch.phone_number = Some(None),
        ContactField::Email => patch.email = Some(None),
        ContactField::Category => patch.category_id = Some(None),
        ContactField::Birthday => patch.birthday = Some(None),
        ContactField::FoodPreferences => patch.food_preferences = Some(None),
        ContactField::Notes => patch.notes = Some(None),
      }
    }
    patch
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_update_with_clears() {
    let cli = Cli::try_parse_from([
      "oruma", "contacts", "update", "7", "--email", "new@example.com", "--clear", "birthday",
    ])
    .unwrap();
    let Command::Contacts(ContactCommand::Update { id, fields, clear }) = cli.command else {
      panic!("expected contacts update");
    };
    assert_eq!(id, 7);

    let patch = fields.into_patch(&clear);
    assert_eq!(patch.email, Some(Some("new@example.com".into())));
    assert_eq!(patch.birthday, Some(None));
    assert_eq!(patch.first_name, None);
  }

  #[test]
  fn update_without_flags_is_an_empty_patch() {
    assert!(ContactFields::default().into_patch(&[]).is_empty());
  }

  #[test]
  fn clap_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}

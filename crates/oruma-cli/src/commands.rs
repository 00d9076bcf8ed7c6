//! Subcommand handlers.

use anyhow::{Context as _, Result, bail};
use oruma_core::{
  contact::{Contact, NewContactEvent, NewContactNews},
  store::ContactStore,
};
use oruma_notify::{BirthdayScheduler, ScheduleAllOutcome};
use oruma_store_sqlite::SqliteStore;
use oruma_sync::{ContactImporter, SyncOutcome};
use serde::Serialize;

use crate::{
  cli::{BirthdayCommand, CategoryCommand, Command, ContactCommand, EventCommand, NewsCommand},
  host::{AlarmBook, JsonAddressBook},
  settings::Settings,
};

/// Everything a command may touch, opened once per invocation.
pub struct Context {
  pub settings:  Settings,
  pub store:     SqliteStore,
  pub scheduler: BirthdayScheduler<SqliteStore, AlarmBook>,
}

impl Context {
  pub async fn open(settings: Settings) -> Result<Self> {
    let store = SqliteStore::open(&settings.store_path)
      .await
      .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
    let alarms = AlarmBook::new(&settings.alarms_path, settings.notifications_enabled);
    let scheduler = BirthdayScheduler::new(store.clone(), alarms);
    Ok(Self { settings, store, scheduler })
  }

  /// Re-derive a saved contact's reminder from its stored birthday.
  async fn refresh_reminder(&self, contact: &Contact) -> Result<()> {
    if !self.settings.notifications_enabled {
      // A reminder left over from when notifications were on is still dropped.
      tracing::debug!(contact_id = contact.id, "notifications disabled; reminder not scheduled");
      self.scheduler.cancel_for(contact.id).await?;
      return Ok(());
    }
    self.scheduler.refresh(contact).await?;
    Ok(())
  }

  async fn contact(&self, id: i64) -> Result<Contact> {
    match self.store.get_contact_by_id(id).await? {
      Some(contact) => Ok(contact),
      None => bail!("no contact with id {id}"),
    }
  }
}

fn print_json(value: &impl Serialize) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn contact_line(contact: &Contact) -> String {
  let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
  format!(
    "{:>5}  {:<28} {:<18} {:<28} {}",
    contact.id,
    contact.display_name(),
    dash(&contact.phone_number),
    dash(&contact.email),
    dash(&contact.birthday),
  )
}

pub async fn run(ctx: &Context, command: Command) -> Result<()> {
  match command {
    Command::Init => {
      ctx.store.ensure_schema().await?;
      println!("database ready at {}", ctx.settings.store_path.display());
    }
    Command::Categories(cmd) => categories(ctx, cmd).await?,
    Command::Contacts(cmd) => contacts(ctx, cmd).await?,
    Command::Events(cmd) => events(ctx, cmd).await?,
    Command::News(cmd) => news(ctx, cmd).await?,
    Command::Sync => sync(ctx).await?,
    Command::Birthdays(cmd) => birthdays(ctx, cmd).await?,
  }
  Ok(())
}

async fn categories(ctx: &Context, cmd: CategoryCommand) -> Result<()> {
  match cmd {
    CategoryCommand::List => {
      for category in ctx.store.get_all_categories().await? {
        println!("{:>5}  {}", category.id, category.name);
      }
    }
    CategoryCommand::Add { name } => {
      let outcome = ctx
        .store
        .add_category(name.trim())
        .await
        .with_context(|| format!("could not add category {name:?}"))?;
      println!("added category {}", outcome.last_insert_id);
    }
  }
  Ok(())
}

async fn contacts(ctx: &Context, cmd: ContactCommand) -> Result<()> {
  match cmd {
    ContactCommand::List { category } => {
      let contacts = match category {
        Some(category_id) => ctx.store.get_contacts_by_category(category_id).await?,
        None => ctx.store.get_all_contacts().await?,
      };
      for contact in &contacts {
        println!("{}", contact_line(contact));
      }
    }
    ContactCommand::Show { id } => {
      let contact = ctx.contact(id).await?;
      let category = match contact.category_id {
        Some(category_id) => ctx.store.get_category_by_id(category_id).await?,
        None => None,
      };
      print_json(&serde_json::json!({
        "contact":  contact,
        "category": category,
        "events":   ctx.store.get_events_for_contact(id).await?,
        "news":     ctx.store.get_news_for_contact(id).await?,
      }))?;
    }
    ContactCommand::Add { fields } => {
      let outcome = ctx.store.add_contact(fields.into_new_contact()).await?;
      let contact = ctx.contact(outcome.last_insert_id).await?;
      ctx.refresh_reminder(&contact).await?;
      println!("added contact {}", contact.id);
    }
    ContactCommand::Update { id, fields, clear } => {
      let Some(outcome) = ctx.store.update_contact(id, fields.into_patch(&clear)).await? else {
        println!("nothing to update");
        return Ok(());
      };
      if outcome.changes == 0 {
        bail!("no contact with id {id}");
      }
      let contact = ctx.contact(id).await?;
      ctx.refresh_reminder(&contact).await?;
      println!("updated contact {id}");
    }
    ContactCommand::Delete { id } => {
      let outcome = ctx.store.delete_contact(id).await?;
      if outcome.changes == 0 {
        bail!("no contact with id {id}");
      }
      ctx.scheduler.cancel_for(id).await?;
      println!("deleted contact {id}");
    }
  }
  Ok(())
}

async fn events(ctx: &Context, cmd: EventCommand) -> Result<()> {
  match cmd {
    EventCommand::List { contact_id } => {
      for event in ctx.store.get_events_for_contact(contact_id).await? {
        println!(
          "{:>5}  {:<10}  {}{}",
          event.id,
          event.event_date.as_deref().unwrap_or("-"),
          event.event_name,
          event.description.map(|d| format!(" ({d})")).unwrap_or_default(),
        );
      }
    }
    EventCommand::Add { contact_id, name, date, description } => {
      let name = name.trim();
      if name.is_empty() {
        bail!("event name must not be empty");
      }
      let event = NewContactEvent {
        event_name: name.to_owned(),
        event_date: date,
        description,
      };
      let outcome = ctx.store.add_event_for_contact(contact_id, event).await?;
      println!("added event {}", outcome.last_insert_id);
    }
  }
  Ok(())
}

async fn news(ctx: &Context, cmd: NewsCommand) -> Result<()> {
  match cmd {
    NewsCommand::List { contact_id } => {
      for item in ctx.store.get_news_for_contact(contact_id).await? {
        println!(
          "{:>5}  {}  {}",
          item.id,
          item.date_recorded.format("%Y-%m-%d %H:%M"),
          item.news_item
        );
      }
    }
    NewsCommand::Add { contact_id, item } => {
      let item = item.trim();
      if item.is_empty() {
        bail!("news item must not be empty");
      }
      let outcome = ctx
        .store
        .add_news_for_contact(contact_id, NewContactNews { news_item: item.to_owned() })
        .await?;
      println!("added news {}", outcome.last_insert_id);
    }
  }
  Ok(())
}

async fn sync(ctx: &Context) -> Result<()> {
  let book = JsonAddressBook::new(&ctx.settings.address_book_path);
  let importer = ContactImporter::new(ctx.store.clone(), book);

  match importer.sync().await? {
    SyncOutcome::PermissionDenied => bail!(
      "address book {:?} is not available",
      ctx.settings.address_book_path
    ),
    SyncOutcome::Completed(report) => print_json(&report)?,
  }
  Ok(())
}

async fn birthdays(ctx: &Context, cmd: BirthdayCommand) -> Result<()> {
  match cmd {
    BirthdayCommand::ScheduleAll => match ctx.scheduler.schedule_all().await? {
      ScheduleAllOutcome::PermissionDenied => bail!("notifications are disabled"),
      ScheduleAllOutcome::Completed(report) => print_json(&report)?,
    },
    BirthdayCommand::Schedule { contact_id } => {
      let contact = ctx.contact(contact_id).await?;
      print_json(&ctx.scheduler.schedule_one(&contact).await?)?;
    }
    BirthdayCommand::Cancel { contact_id } => {
      ctx.scheduler.cancel_for(contact_id).await?;
      println!("cancelled reminder for contact {contact_id}");
    }
    BirthdayCommand::Pending => {
      let ledger = ctx.scheduler.notifier().load().await?;
      for (identifier, request) in &ledger.pending {
        println!(
          "{identifier:<16} {:02}-{:02} {:02}:{:02}  {}",
          request.trigger.month,
          request.trigger.day,
          request.trigger.hour,
          request.trigger.minute,
          request.body
        );
      }
    }
  }
  Ok(())
}

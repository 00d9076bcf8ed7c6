//! SQL schema for the Oruma SQLite store.

/// Connection-level settings. Must run outside a transaction: SQLite ignores
/// `foreign_keys` inside one, and cascading deletes depend on it.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    native_id        TEXT UNIQUE,        -- device address-book id; dedup key
    first_name       TEXT,
    last_name        TEXT,
    phone_number     TEXT,
    email            TEXT,
    category_id      INTEGER,
    birthday         TEXT,               -- YYYY-MM-DD
    food_preferences TEXT,
    notes            TEXT,
    created_at       TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at       TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (category_id) REFERENCES categories(id)
);

CREATE TRIGGER IF NOT EXISTS update_contacts_updated_at
AFTER UPDATE ON contacts
FOR EACH ROW
BEGIN
    UPDATE contacts SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
END;

-- Events and news are append-only.
CREATE TABLE IF NOT EXISTS contact_events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id  INTEGER NOT NULL,
    event_name  TEXT NOT NULL,
    event_date  TEXT,
    description TEXT,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS contact_news (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id    INTEGER NOT NULL,
    news_item     TEXT NOT NULL,
    date_recorded TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS contacts_category_idx ON contacts(category_id);
CREATE INDEX IF NOT EXISTS events_contact_idx    ON contact_events(contact_id);
CREATE INDEX IF NOT EXISTS news_contact_idx      ON contact_news(contact_id);
";

pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES (?1)";

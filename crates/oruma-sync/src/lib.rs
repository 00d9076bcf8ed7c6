//! Device address-book import for the Oruma contact book.
//!
//! [`ContactImporter`] copies entries from the host address book into the
//! store, keyed by the address book's own identifier so repeated runs only
//! add what is new.

mod import;

pub mod error;

pub use error::{Error, Result};
pub use import::{ContactImporter, SyncOutcome, SyncReport, map_device_contact};

#[cfg(test)]
mod tests;

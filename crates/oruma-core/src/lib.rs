//! Core types and trait definitions for the Oruma contact book.
//!
//! This crate is deliberately free of database and platform dependencies.
//! The storage backend and the host integrations (address book, local
//! notifications) are expressed as traits here and implemented elsewhere.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod birthday;
pub mod contact;
pub mod error;
pub mod host;
pub mod store;

pub use error::{Error, Result};

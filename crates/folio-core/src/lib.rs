//! Core types and trait definitions for the Folio profile service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Merge and list-mutation rules for profiles live here so every storage
//! backend and transport shares them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod profile;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{Error, Result};

//! Hoard - persistence tier for bot features
//!
//! Two primitives every durable feature builds on: record files kept in
//! sync with an in-memory list ([`store`]), and a bounded, content-addressed
//! artifact cache ([`cache`]) named by [`hash::name_for`].

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod guild;
pub mod hash;
pub mod records;
pub mod store;
pub mod ui;

pub use error::{HoardError, HoardResult};

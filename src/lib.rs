//! niaga: an in-memory admin ledger for pre-orders, delivery notes (surat jalan) and operational
//! expenses.
//!
//! Each resource is a `ResourcePage`: a record store seeded at start-up, a filter stage, a
//! pagination stage, a presentation table and a draft/commit form. A `Session` owns the three
//! pages and is driven by the commands in `commands`.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod form;
pub mod format;
pub mod model;
pub mod page;
pub mod paging;
mod resource;
pub mod session;
pub mod stats;
pub mod store;
pub mod table;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{Error, ErrorType, Result};

//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Dataset, Expense, ExpenseCategory, ExpenseStatus};
use crate::session::Session;
use crate::Config;
use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

/// Test environment with a niaga home directory holding a default config.json.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub(crate) async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("niaga"))
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub(crate) fn home(&self) -> &Path {
        self.config.root()
    }

    pub(crate) fn config(&self) -> Config {
        self.config.clone()
    }
}

/// A pending office expense.
pub(crate) fn expense(id: u64, description: &str, amount: i64, date: &str) -> Expense {
    Expense {
        id,
        description: description.to_string(),
        amount: Amount::new(amount),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: Some(ExpenseCategory::Office),
        status: ExpenseStatus::Pending,
    }
}

/// A session seeded with the built-in records, with delete confirmation on.
pub(crate) fn session() -> Session {
    Session::new(Dataset::builtin().unwrap(), true).unwrap()
}

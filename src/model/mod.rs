//! Types that represent the core data model, such as `Expense`, `PreOrder` and `DeliveryNote`.
mod amount;
mod delivery_note;
mod expense;
mod items;
mod pre_order;

pub use amount::{Amount, AmountError};
pub use delivery_note::{
    compute_total, leading_int, DeliveryNote, DeliveryNoteDraft, DeliveryNoteUpdates,
    DeliveryStatus, SjMaterial, MATERIAL_OPTIONS, PAYMENT_METHODS, UNIT_OPTIONS,
};
pub use expense::{Expense, ExpenseCategory, ExpenseDraft, ExpenseStatus, ExpenseUpdates};
pub use items::{Item, Items};
pub use pre_order::{PoMaterial, PreOrder, PreOrderDraft, PreOrderUpdates};

use crate::error::{fail, ErrorType, IntoResult};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The sample records every session starts from unless a seed file is configured.
const BUILTIN_SEED: &str = include_str!("seed.json");

/// Represents the records of all three resources, as seeded into a session.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Dataset {
    #[serde(default)]
    pub(crate) expenses: Vec<Expense>,
    #[serde(default)]
    pub(crate) pre_orders: Vec<PreOrder>,
    #[serde(default)]
    pub(crate) delivery_notes: Vec<DeliveryNote>,
}

impl Dataset {
    /// The built-in sample records.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("Unable to parse seed data")
            .pub_result(ErrorType::Config)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn pre_orders(&self) -> &[PreOrder] {
        &self.pre_orders
    }

    pub fn delivery_notes(&self) -> &[DeliveryNote] {
        &self.delivery_notes
    }
}

/// Parses a form field name such as `tanggal` into the field enum `F`.
pub(crate) fn parse_field<F: FromStr>(name: &str) -> Result<F> {
    match F::from_str(name.trim()) {
        Ok(field) => Ok(field),
        Err(_) => fail!(ErrorType::Input, "Unknown field '{name}'"),
    }
}

/// Parses an option-list value such as a status.
pub(crate) fn parse_enum<E: FromStr>(what: &str, value: &str) -> Result<E> {
    match E::from_str(value.trim()) {
        Ok(e) => Ok(e),
        Err(_) => fail!(ErrorType::Input, "Invalid {what} '{value}'"),
    }
}

/// Parses a required ISO date field, recording it as missing or invalid when it cannot be read.
pub(crate) fn parse_date(
    field: &'static str,
    text: &str,
    missing: &mut Vec<&'static str>,
    invalid: &mut Vec<String>,
) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        missing.push(field);
        return None;
    }
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            invalid.push(format!("{field} '{text}' must be YYYY-MM-DD"));
            None
        }
    }
}

/// The message shown when a save is blocked.
pub(crate) fn validation_message(missing: &[&str], invalid: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        ));
    }
    parts.extend(invalid.iter().cloned());
    parts.join("; ")
}

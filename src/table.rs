//! The presentation table: typed column descriptors and row actions over a page of records.
//!
//! A `Table` knows nothing about the resource it shows beyond its columns. Row actions are only
//! forwarded back to the owning page, which decides what they do.

use crate::error::{fail, ErrorType};
use crate::store::Record;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Shown as the only row when a page is empty.
pub const EMPTY_ROW: &str = "No data found";

/// One column of a table: a stable key, a header label and a formatter.
pub struct Column<R> {
    key: &'static str,
    label: &'static str,
    render: fn(&R) -> String,
}

impl<R> Column<R> {
    pub const fn new(key: &'static str, label: &'static str, render: fn(&R) -> String) -> Self {
        Self { key, label, render }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn render(&self, record: &R) -> String {
        (self.render)(record)
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

serde_plain::derive_display_from_serialize!(RowAction);
serde_plain::derive_fromstr_from_deserialize!(RowAction);

#[derive(Debug)]
pub struct Table<R> {
    columns: Vec<Column<R>>,
    actions: Vec<RowAction>,
}

impl<R: Record> Table<R> {
    pub fn new(columns: Vec<Column<R>>, actions: Vec<RowAction>) -> Self {
        Self { columns, actions }
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn actions(&self) -> &[RowAction] {
        &self.actions
    }

    pub fn allows(&self, action: RowAction) -> bool {
        self.actions.contains(&action)
    }

    /// Hands `row` back for `action`, or fails if this table does not offer `action`.
    pub fn forward<'a>(&self, action: RowAction, row: &'a R) -> Result<&'a R> {
        if !self.allows(action) {
            fail!(
                ErrorType::Form,
                "The {} table does not offer '{action}'",
                R::KIND
            )
        }
        Ok(row)
    }

    /// The formatted cells of one row, identifier first.
    pub fn cells(&self, row: &R) -> Vec<String> {
        std::iter::once(row.id().to_string())
            .chain(self.columns.iter().map(|c| c.render(row)))
            .collect()
    }

    /// Renders `rows` as a Markdown table with an `ID` column in front of the configured ones.
    pub fn render(&self, rows: &[&R]) -> String {
        let header: Vec<String> = std::iter::once("ID")
            .chain(self.columns.iter().map(|c| c.label))
            .map(str::to_string)
            .collect();
        let body: Vec<Vec<String>> = rows.iter().map(|row| self.cells(row)).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_row(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, &rule, &widths);
        if body.is_empty() {
            let span = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
            let _ = writeln!(out, "| {EMPTY_ROW:<span$} |");
        }
        for cells in &body {
            push_row(&mut out, cells, &widths);
        }
        if !self.actions.is_empty() {
            let actions: Vec<String> = self.actions.iter().map(|a| a.to_string()).collect();
            let _ = write!(out, "Actions: {}", actions.join(", "));
        }
        out
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "| {} |", padded.join(" | "));
}

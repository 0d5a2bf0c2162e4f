//! Columns, row actions and filter options for each of the three resources.

use crate::args::FilterArgs;
use crate::error::{fail, ErrorType};
use crate::filter::{DeliveryNoteFilter, ExpenseFilter, PreOrderFilter};
use crate::format::{format_currency, format_date, format_status, or_dash};
use crate::model::{parse_enum, DeliveryNote, Expense, PreOrder};
use crate::page::Resource;
use crate::store::Record;
use crate::table::{Column, RowAction, Table};
use crate::Result;
use chrono::NaiveDate;

impl Resource for Expense {
    type Filter = ExpenseFilter;
    const HEADING: &'static str = "Manage Expenses";

    fn table() -> Table<Self> {
        Table::new(
            vec![
                Column::new("description", "Keterangan", |e: &Expense| {
                    e.description().to_string()
                }),
                Column::new("amount", "Jumlah", |e: &Expense| format_currency(e.amount())),
                Column::new("date", "Tanggal", |e: &Expense| format_date(e.date())),
                Column::new("category", "Kategori", |e: &Expense| {
                    or_dash(e.category().map_or("", |c| c.label()))
                }),
                Column::new("status", "Status", |e: &Expense| format_status(e.status())),
            ],
            vec![RowAction::Edit, RowAction::Delete],
        )
    }

    fn filter_from(args: &FilterArgs) -> Result<ExpenseFilter> {
        reject(Self::KIND, "--from", args.from())?;
        reject(Self::KIND, "--to", args.to())?;
        reject(Self::KIND, "--material", args.material())?;
        Ok(ExpenseFilter {
            search: text(args.search()),
            status: args.status().map(|s| parse_enum("status", s)).transpose()?,
            category: args
                .category()
                .map(|c| parse_enum("category", c))
                .transpose()?,
        })
    }
}

impl Resource for PreOrder {
    type Filter = PreOrderFilter;
    const HEADING: &'static str = "PreOrder Management";

    fn table() -> Table<Self> {
        Table::new(
            vec![
                Column::new("po_number", "No PO", |po: &PreOrder| {
                    po.po_number().to_string()
                }),
                Column::new("sales", "Sales", |po: &PreOrder| po.sales().to_string()),
                Column::new("customer", "Customer", |po: &PreOrder| {
                    po.customer().to_string()
                }),
                Column::new("date", "Tanggal", |po: &PreOrder| format_date(po.date())),
                Column::new("materials", "Materials", |po: &PreOrder| {
                    po.materials().len().to_string()
                }),
            ],
            vec![RowAction::View, RowAction::Edit, RowAction::Delete],
        )
    }

    fn filter_from(args: &FilterArgs) -> Result<PreOrderFilter> {
        reject(Self::KIND, "--status", args.status())?;
        reject(Self::KIND, "--category", args.category())?;
        reject(Self::KIND, "--from", args.from())?;
        reject(Self::KIND, "--to", args.to())?;
        reject(Self::KIND, "--material", args.material())?;
        Ok(PreOrderFilter {
            search: text(args.search()),
        })
    }
}

impl Resource for DeliveryNote {
    type Filter = DeliveryNoteFilter;
    const HEADING: &'static str = "Manage Surat Jalan";

    fn table() -> Table<Self> {
        Table::new(
            vec![
                Column::new("number", "No SJ", |sj: &DeliveryNote| sj.number().to_string()),
                Column::new("date", "Tanggal", |sj: &DeliveryNote| format_date(sj.date())),
                Column::new("total", "Total Harga", |sj: &DeliveryNote| {
                    format_currency(sj.total())
                }),
                Column::new("status", "Status", |sj: &DeliveryNote| {
                    format_status(sj.status())
                }),
            ],
            vec![RowAction::View, RowAction::Edit, RowAction::Delete],
        )
    }

    fn filter_from(args: &FilterArgs) -> Result<DeliveryNoteFilter> {
        reject(Self::KIND, "--category", args.category())?;
        Ok(DeliveryNoteFilter {
            search: text(args.search()),
            date_from: args.from().map(|d| date("--from", d)).transpose()?,
            date_to: args.to().map(|d| date("--to", d)).transpose()?,
            status: args.status().map(|s| parse_enum("status", s)).transpose()?,
            material: text(args.material()),
        })
    }
}

/// Blank text imposes no restriction, so it is dropped.
fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn date(option: &str, value: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => fail!(
            ErrorType::Input,
            "{option} '{value}' must be a YYYY-MM-DD date"
        ),
    }
}

fn reject(kind: &str, option: &str, value: Option<&str>) -> Result<()> {
    if value.is_some() {
        fail!(ErrorType::Input, "{option} does not apply to {kind}")
    }
    Ok(())
}

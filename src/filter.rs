//! Filter criteria for each resource and the pure filtering stage that applies them.
//!
//! Empty criteria match everything, and every set criterion must match (logical AND). Filtering
//! never reorders: the output is always a subsequence of the input.

use crate::model::{
    DeliveryNote, DeliveryStatus, Expense, ExpenseCategory, ExpenseStatus, PreOrder,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A predicate over records of type `R`.
pub trait Filter<R> {
    fn matches(&self, record: &R) -> bool;
}

/// Returns the records that match `filter`, in their original order.
pub fn apply<'a, R, F>(records: &'a [R], filter: &F) -> Vec<&'a R>
where
    F: Filter<R>,
{
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Case-insensitive substring containment. An empty or absent needle matches anything.
pub fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) if n.is_empty() => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

fn equals<T: PartialEq>(value: T, wanted: Option<T>) -> bool {
    wanted.map_or(true, |w| w == value)
}

fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Matched against the description.
    pub search: Option<String>,
    pub status: Option<ExpenseStatus>,
    pub category: Option<ExpenseCategory>,
}

impl Filter<Expense> for ExpenseFilter {
    fn matches(&self, e: &Expense) -> bool {
        contains_ci(e.description(), self.search.as_deref())
            && equals(e.status(), self.status)
            && (self.category.is_none() || e.category() == self.category)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreOrderFilter {
    /// Matched against sales, customer or PO number; any one matching is enough.
    pub search: Option<String>,
}

impl Filter<PreOrder> for PreOrderFilter {
    fn matches(&self, po: &PreOrder) -> bool {
        let search = self.search.as_deref();
        contains_ci(po.sales(), search)
            || contains_ci(po.customer(), search)
            || contains_ci(po.po_number(), search)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNoteFilter {
    /// Matched against the surat jalan number.
    pub search: Option<String>,
    /// Inclusive.
    pub date_from: Option<NaiveDate>,
    /// Inclusive.
    pub date_to: Option<NaiveDate>,
    pub status: Option<DeliveryStatus>,
    /// Matches when any material's name contains this text.
    pub material: Option<String>,
}

impl Filter<DeliveryNote> for DeliveryNoteFilter {
    fn matches(&self, sj: &DeliveryNote) -> bool {
        let material = self.material.as_deref().filter(|m| !m.is_empty());
        contains_ci(sj.number(), self.search.as_deref())
            && within(sj.date(), self.date_from, self.date_to)
            && equals(sj.status(), self.status)
            && material.map_or(true, |m| {
                sj.materials()
                    .data()
                    .iter()
                    .any(|item| contains_ci(item.name(), Some(m)))
            })
    }
}

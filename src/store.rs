//! The record store: the authoritative, ordered sequence of records for one resource kind.
//!
//! `Store` is the seam where a remote service could replace the in-memory implementation; it
//! exposes the same four operations a backend would, keyed by record identifier.

use crate::error::{fail, ErrorType};
use crate::Result;
use std::collections::BTreeSet;
use std::fmt::Debug;
use tracing::{debug, trace};

/// A record that can be held in a `Store`.
pub trait Record: Clone + Debug + PartialEq {
    /// Field changes that can be merged over an existing record. `None` leaves a field as-is.
    type Updates: Clone + Debug + Default;

    /// What the record is called in messages, e.g. "expense".
    const KIND: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// Merges `updates` over this record.
    fn apply(&mut self, updates: Self::Updates);

    /// Converts this record into updates that overwrite every field except the identifier.
    fn into_updates(self) -> Self::Updates;
}

pub trait Store<R: Record> {
    /// The current records in insertion order.
    fn list(&self) -> &[R];

    fn get(&self, id: u64) -> Option<&R>;

    /// Assigns the next identifier to `record`, appends it and returns the stored copy.
    fn create(&mut self, record: R) -> Result<R>;

    /// Merges `updates` into the record with `id` and returns the merged record. Order is kept.
    fn update(&mut self, id: u64, updates: R::Updates) -> Result<R>;

    /// Removes and returns the record with `id`.
    fn delete(&mut self, id: u64) -> Result<R>;
}

/// Returns `max(ids) + 1`, or `1` when there are no ids. Fails once `u64::MAX` is taken.
pub fn next_id(kind: &str, ids: impl IntoIterator<Item = u64>) -> Result<u64> {
    match ids.into_iter().max() {
        None => Ok(1),
        Some(max) => match max.checked_add(1) {
            Some(id) => Ok(id),
            None => fail!(ErrorType::Validation, "No {kind} id is left after {max}"),
        },
    }
}

/// A `Store` that holds its records in memory, seeded by its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore<R: Record> {
    records: Vec<R>,
}

impl<R: Record> MemoryStore<R> {
    /// Creates a store holding `seed`. Seed identifiers must be unique.
    pub fn new(seed: Vec<R>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for record in &seed {
            if !seen.insert(record.id()) {
                fail!(
                    ErrorType::Config,
                    "Duplicate {} id {} in seed data",
                    R::KIND,
                    record.id()
                )
            }
        }
        debug!("Seeded {} store with {} records", R::KIND, seed.len());
        Ok(Self { records: seed })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: u64) -> Result<usize> {
        match self.records.iter().position(|r| r.id() == id) {
            Some(ix) => Ok(ix),
            None => fail!(ErrorType::NotFound, "{} {id} not found", R::KIND),
        }
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn list(&self) -> &[R] {
        &self.records
    }

    fn get(&self, id: u64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn create(&mut self, mut record: R) -> Result<R> {
        let id = next_id(R::KIND, self.records.iter().map(Record::id))?;
        record.set_id(id);
        trace!("create {} {record:?}", R::KIND);
        self.records.push(record.clone());
        debug!("Created {} {id}", R::KIND);
        Ok(record)
    }

    fn update(&mut self, id: u64, updates: R::Updates) -> Result<R> {
        trace!("update {} {id} with {updates:?}", R::KIND);
        let ix = self.position(id)?;
        let mut merged = self.records[ix].clone();
        merged.apply(updates);
        self.records[ix] = merged.clone();
        debug!("Updated {} {id}", R::KIND);
        Ok(merged)
    }

    fn delete(&mut self, id: u64) -> Result<R> {
        let ix = self.position(id)?;
        let removed = self.records.remove(ix);
        debug!("Deleted {} {id}", R::KIND);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expense, ExpenseStatus, ExpenseUpdates};
    use crate::test::expense;

    fn store() -> MemoryStore<Expense> {
        MemoryStore::new(vec![
            expense(1, "Pembelian ATK Kantor", 2_500_000, "2024-01-15"),
            expense(2, "Biaya Listrik Bulan Januari", 3_200_000, "2024-01-10"),
            expense(3, "Maintenance Komputer", 1_800_000, "2024-01-08"),
        ])
        .unwrap()
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id("expense", Vec::<u64>::new()).unwrap(), 1);
        assert_eq!(next_id("expense", [4, 9, 2]).unwrap(), 10);
    }

    #[test]
    fn test_create_when_ids_are_exhausted() {
        let mut store = MemoryStore::new(vec![expense(u64::MAX, "Sewa", 1, "2024-01-01")]).unwrap();
        let err = store
            .create(expense(0, "Bensin", 150_000, "2024-01-20"))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(
            err.to_string(),
            format!("No expense id is left after {}", u64::MAX)
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_seed_ids_rejected() {
        let err = MemoryStore::new(vec![
            expense(1, "a", 1, "2024-01-01"),
            expense(1, "b", 2, "2024-01-02"),
        ])
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_create_appends_with_next_id() {
        let mut store = store();
        let created = store
            .create(expense(0, "Bensin", 150_000, "2024-01-20"))
            .unwrap();
        assert_eq!(created.id(), 4);
        assert_eq!(store.list().last().unwrap(), &created);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_create_on_empty_store_assigns_one() {
        let mut store = MemoryStore::<Expense>::default();
        let created = store
            .create(expense(42, "Bensin", 150_000, "2024-01-20"))
            .unwrap();
        assert_eq!(created.id(), 1);
    }

    #[test]
    fn test_create_after_delete_of_max_reuses_nothing_lower() {
        let mut store = store();
        store.delete(2).unwrap();
        let created = store
            .create(expense(0, "Bensin", 150_000, "2024-01-20"))
            .unwrap();
        assert_eq!(created.id(), 4);
    }

    #[test]
    fn test_update_merges_and_keeps_order() {
        let mut store = store();
        let before = store.list().to_vec();
        let updates = ExpenseUpdates {
            status: Some(ExpenseStatus::Rejected),
            ..Default::default()
        };
        let merged = store.update(2, updates).unwrap();

        let mut expected = before[1].clone();
        expected.status = ExpenseStatus::Rejected;
        assert_eq!(merged, expected);
        assert_eq!(store.list()[1], expected);
        assert_eq!(store.list()[0], before[0]);
        assert_eq!(store.list()[2], before[2]);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = store();
        let before = store.clone();
        let err = store.update(99, ExpenseUpdates::default()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(err.to_string().contains("expense 99 not found"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = store();
        let removed = store.delete(1).unwrap();
        assert_eq!(removed.id(), 1);
        assert!(store.get(1).is_none());
        assert!(store.list().iter().all(|r| r.id() != 1));
    }

    #[test]
    fn test_delete_missing_leaves_list() {
        let mut store = store();
        let before = store.list().to_vec();
        let err = store.delete(42).unwrap_err();
        assert!(err.is_warning());
        assert_eq!(store.list(), before.as_slice());
    }
}

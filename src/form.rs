//! The draft/commit form that sits between a table row action and the record store.
//!
//! ```text
//! Closed -> Creating -> (save | cancel) -> Closed
//! Closed -> Editing  -> (save | cancel) -> Closed
//! Closed -> Viewing  -> cancel          -> Closed
//! ```
//!
//! The draft is a separate value from anything in the store, so nothing a user types reaches the
//! store until `save` succeeds.

use crate::error::{fail, ErrorType};
use crate::store::{Record, Store};
use crate::Result;
use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::{debug, trace};

/// A record kind that can be created and edited through a `Form`.
pub trait Formable: Record {
    type Draft: Draft;

    const CREATE_TITLE: &'static str;
    const EDIT_TITLE: &'static str;
    const VIEW_TITLE: &'static str;

    /// The template a new record starts from.
    fn blank_draft() -> Self::Draft;

    /// A draft holding a copy of this record's fields.
    fn to_draft(&self) -> Self::Draft;

    /// Validates `draft` and builds a record from it. The identifier is left for the store.
    fn from_draft(draft: &Self::Draft) -> Result<Self>;
}

/// The editable, uncommitted state of a form.
pub trait Draft: Clone + Debug + Display + PartialEq + Serialize {
    /// Replaces the field called `name`.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;

    /// Appends a blank line item and returns its identifier.
    fn add_item(&mut self) -> Result<u64> {
        fail!(ErrorType::Form, "This form has no line items")
    }

    fn remove_item(&mut self, _id: u64) -> Result<()> {
        fail!(ErrorType::Form, "This form has no line items")
    }

    fn set_item_field(&mut self, _id: u64, _name: &str, _value: &str) -> Result<()> {
        fail!(ErrorType::Form, "This form has no line items")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Closed,
    Creating,
    Editing,
    Viewing,
}

serde_plain::derive_display_from_serialize!(FormMode);

#[derive(Debug, Clone, PartialEq)]
enum State<D> {
    Closed,
    Creating(D),
    Editing { id: u64, draft: D },
    Viewing { id: u64, draft: D },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form<R: Formable> {
    state: State<R::Draft>,
}

impl<R: Formable> Default for Form<R> {
    fn default() -> Self {
        Self {
            state: State::Closed,
        }
    }
}

impl<R: Formable> Form<R> {
    pub fn mode(&self) -> FormMode {
        match self.state {
            State::Closed => FormMode::Closed,
            State::Creating(_) => FormMode::Creating,
            State::Editing { .. } => FormMode::Editing,
            State::Viewing { .. } => FormMode::Viewing,
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode() != FormMode::Closed
    }

    /// The title of the open form, or `None` when closed.
    pub fn title(&self) -> Option<&'static str> {
        match self.state {
            State::Closed => None,
            State::Creating(_) => Some(R::CREATE_TITLE),
            State::Editing { .. } => Some(R::EDIT_TITLE),
            State::Viewing { .. } => Some(R::VIEW_TITLE),
        }
    }

    pub fn draft(&self) -> Option<&R::Draft> {
        match &self.state {
            State::Closed => None,
            State::Creating(draft)
            | State::Editing { draft, .. }
            | State::Viewing { draft, .. } => Some(draft),
        }
    }

    /// The identifier of the record being edited or viewed.
    pub fn target(&self) -> Option<u64> {
        match self.state {
            State::Editing { id, .. } | State::Viewing { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn open_create(&mut self) -> Result<()> {
        self.ensure_closed()?;
        self.state = State::Creating(R::blank_draft());
        debug!("Opened form: {}", R::CREATE_TITLE);
        Ok(())
    }

    pub fn open_edit(&mut self, record: &R) -> Result<()> {
        self.ensure_closed()?;
        self.state = State::Editing {
            id: record.id(),
            draft: record.to_draft(),
        };
        debug!("Opened form: {} {}", R::EDIT_TITLE, record.id());
        Ok(())
    }

    pub fn open_view(&mut self, record: &R) -> Result<()> {
        self.ensure_closed()?;
        self.state = State::Viewing {
            id: record.id(),
            draft: record.to_draft(),
        };
        debug!("Opened form: {} {}", R::VIEW_TITLE, record.id());
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        trace!("set {name} = {value:?}");
        self.draft_mut()?.set_field(name, value)
    }

    pub fn add_item(&mut self) -> Result<u64> {
        self.draft_mut()?.add_item()
    }

    pub fn remove_item(&mut self, id: u64) -> Result<()> {
        self.draft_mut()?.remove_item(id)
    }

    pub fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()> {
        trace!("set item {id} {name} = {value:?}");
        self.draft_mut()?.set_item_field(id, name, value)
    }

    /// Validates the draft and commits it to `store`, closing the form on success. On any error
    /// the form stays open with its draft and the store is untouched.
    pub fn save<S: Store<R>>(&mut self, store: &mut S) -> Result<R> {
        let saved = match &self.state {
            State::Closed => fail!(ErrorType::Form, "No form is open"),
            State::Viewing { .. } => {
                fail!(ErrorType::Form, "A record being viewed cannot be saved")
            }
            State::Creating(draft) => store.create(R::from_draft(draft)?)?,
            State::Editing { id, draft } => {
                let record = R::from_draft(draft)?;
                store.update(*id, record.into_updates())?
            }
        };
        debug!("Saved {} {}", R::KIND, saved.id());
        self.state = State::Closed;
        Ok(saved)
    }

    /// Discards the draft. Cancelling a closed form is a no-op.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("Cancelled form: {}", self.title().unwrap_or_default());
        }
        self.state = State::Closed;
    }

    fn ensure_closed(&self) -> Result<()> {
        match self.title() {
            None => Ok(()),
            Some(title) => fail!(
                ErrorType::Form,
                "'{title}' is still open; save or cancel it first"
            ),
        }
    }

    fn draft_mut(&mut self) -> Result<&mut R::Draft> {
        match &mut self.state {
            State::Closed => fail!(ErrorType::Form, "No form is open"),
            State::Viewing { .. } => fail!(ErrorType::Form, "A record being viewed is read-only"),
            State::Creating(draft) | State::Editing { draft, .. } => Ok(draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Amount, DeliveryNote, Expense, ExpenseCategory, ExpenseStatus, PreOrder,
    };
    use crate::store::MemoryStore;
    use crate::test::expense;

    fn expenses() -> MemoryStore<Expense> {
        MemoryStore::new(vec![
            expense(1, "Pembelian ATK Kantor", 2_500_000, "2024-01-15"),
            expense(2, "Biaya Listrik Bulan Januari", 3_200_000, "2024-01-10"),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_flow() {
        let mut store = expenses();
        let mut form = Form::<Expense>::default();
        form.open_create().unwrap();
        assert_eq!(form.mode(), FormMode::Creating);
        assert_eq!(form.title(), Some("Add New Expense"));

        form.set_field("description", "Bensin Operasional").unwrap();
        form.set_field("amount", "150000").unwrap();
        form.set_field("date", "2024-01-20").unwrap();
        form.set_field("category", "transport").unwrap();
        assert_eq!(store.len(), 2);

        let saved = form.save(&mut store).unwrap();
        assert_eq!(saved.id(), 3);
        assert_eq!(saved.category(), Some(ExpenseCategory::Transport));
        assert_eq!(saved.status(), ExpenseStatus::Pending);
        assert_eq!(store.get(3), Some(&saved));
        assert!(!form.is_open());
    }

    #[test]
    fn test_edit_flow_replaces_in_place() {
        let mut store = expenses();
        let target = store.get(1).unwrap().clone();
        let mut form = Form::<Expense>::default();
        form.open_edit(&target).unwrap();
        form.set_field("amount", "2750000").unwrap();
        form.set_field("status", "approved").unwrap();

        // the draft is detached from the store until save
        assert_eq!(store.get(1), Some(&target));

        let saved = form.save(&mut store).unwrap();
        assert_eq!(saved.id(), 1);
        assert_eq!(saved.amount(), Amount::new(2_750_000));
        assert_eq!(store.list()[0], saved);
        assert_eq!(store.list()[1].id(), 2);
    }

    #[test]
    fn test_validation_keeps_form_open() {
        let mut store = expenses();
        let before = store.clone();
        let mut form = Form::<Expense>::default();
        form.open_create().unwrap();
        form.set_field("description", "Tanpa jumlah").unwrap();

        let err = form.save(&mut store).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(form.mode(), FormMode::Creating);
        assert_eq!(form.draft().unwrap().description, "Tanpa jumlah");
        assert_eq!(store, before);
    }

    #[test]
    fn test_cancel_leaves_store_identical() {
        let mut store = expenses();
        let before = store.clone();
        let mut form = Form::<Expense>::default();
        form.open_edit(store.get(2).unwrap()).unwrap();
        form.set_field("description", "changed").unwrap();
        form.cancel();
        assert!(!form.is_open());
        assert_eq!(store, before);

        // a cancelled form can be reopened
        form.open_create().unwrap();
        form.cancel();
        assert!(form.save(&mut store).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_view_is_read_only() {
        let seed = crate::model::Dataset::builtin().unwrap().pre_orders;
        let mut store = MemoryStore::new(seed).unwrap();
        let before = store.clone();
        let mut form = Form::<PreOrder>::default();
        form.open_view(store.get(1).unwrap()).unwrap();
        assert_eq!(form.title(), Some("View PreOrder"));
        assert_eq!(form.target(), Some(1));

        assert_eq!(form.set_field("sales", "x").unwrap_err().error_type(), ErrorType::Form);
        assert_eq!(form.add_item().unwrap_err().error_type(), ErrorType::Form);
        assert_eq!(form.save(&mut store).unwrap_err().error_type(), ErrorType::Form);
        assert_eq!(form.mode(), FormMode::Viewing);
        form.cancel();
        assert_eq!(store, before);
    }

    #[test]
    fn test_only_one_open_at_a_time() {
        let store = expenses();
        let mut form = Form::<Expense>::default();
        form.open_create().unwrap();
        let err = form.open_edit(store.get(1).unwrap()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Form);
        assert_eq!(form.mode(), FormMode::Creating);
    }

    #[test]
    fn test_closed_form_rejects_edits() {
        let mut form = Form::<Expense>::default();
        assert!(form.set_field("description", "x").is_err());
        assert_eq!(form.title(), None);
        assert!(form.draft().is_none());
    }

    #[test]
    fn test_edit_of_deleted_record_is_not_found() {
        let mut store = expenses();
        let mut form = Form::<Expense>::default();
        form.open_edit(&store.get(2).unwrap().clone()).unwrap();
        store.delete(2).unwrap();
        let err = form.save(&mut store).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(form.is_open());
    }

    #[test]
    fn test_delivery_note_total_recomputed_on_save_only() {
        let mut store =
            MemoryStore::new(crate::model::Dataset::builtin().unwrap().delivery_notes).unwrap();
        let mut form = Form::<DeliveryNote>::default();
        form.open_edit(store.get(1).unwrap()).unwrap();
        let id = form.add_item().unwrap();
        assert_eq!(id, 2);
        form.set_item_field(id, "qty", "10").unwrap();
        form.set_item_field(id, "price", "1000").unwrap();
        assert_eq!(store.get(1).unwrap().total(), Amount::new(5_000_000));

        let saved = form.save(&mut store).unwrap();
        assert_eq!(saved.total(), Amount::new(5_010_000));
        assert_eq!(saved.materials().len(), 2);
    }

    #[test]
    fn test_edit_recomputes_stale_total() {
        let mut store =
            MemoryStore::new(crate::model::Dataset::builtin().unwrap().delivery_notes).unwrap();
        let mut form = Form::<DeliveryNote>::default();
        form.open_edit(store.get(2).unwrap()).unwrap();
        let saved = form.save(&mut store).unwrap();
        assert_eq!(saved.total(), Amount::ZERO);
    }
}

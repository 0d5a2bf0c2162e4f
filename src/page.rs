//! A resource page: one store wired through the filter, pagination, table and form stages.
//!
//! ```text
//! MemoryStore -> Filter -> paginate -> Table
//!      ^                                 |
//!      +---------- Form.save <-----------+ (row action)
//! ```

use crate::args::FilterArgs;
use crate::error::{fail, ErrorType};
use crate::filter::{self, Filter};
use crate::form::{Form, Formable};
use crate::paging::{self, PageSlice, PAGE_SIZE};
use crate::store::{MemoryStore, Store};
use crate::table::{RowAction, Table};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

/// A record kind with everything a page needs to show and edit it.
pub trait Resource: Formable {
    type Filter: Filter<Self> + Clone + Debug + Default + PartialEq + Serialize;

    /// The page heading.
    const HEADING: &'static str;

    fn table() -> Table<Self>;

    /// Builds filter criteria from command-line options, rejecting options this kind lacks.
    fn filter_from(args: &FilterArgs) -> Result<Self::Filter>;
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug)]
pub struct ResourcePage<R: Resource> {
    store: MemoryStore<R>,
    filter: R::Filter,
    page: usize,
    form: Form<R>,
    table: Table<R>,
}

impl<R: Resource> ResourcePage<R> {
    /// Creates a page whose store is seeded with `seed`.
    pub fn new(seed: Vec<R>) -> Result<Self> {
        Ok(Self {
            store: MemoryStore::new(seed)?,
            filter: R::Filter::default(),
            page: 1,
            form: Form::default(),
            table: R::table(),
        })
    }

    pub fn store(&self) -> &MemoryStore<R> {
        &self.store
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn form(&self) -> &Form<R> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form<R> {
        &mut self.form
    }

    pub fn table(&self) -> &Table<R> {
        &self.table
    }

    /// Replaces the filter criteria. A change of criteria moves back to page 1.
    pub fn set_filter(&mut self, filter: R::Filter) {
        if filter != self.filter {
            debug!("New {} filter {filter:?}, back to page 1", R::KIND);
            self.filter = filter;
            self.page = 1;
        }
    }

    /// Moves to `page`, clamped to the available pages, and returns the page moved to.
    pub fn goto_page(&mut self, page: usize) -> usize {
        self.page = paging::clamp_page(page, self.filtered().len(), PAGE_SIZE);
        self.page
    }

    /// The records matching the current filter, in store order.
    pub fn filtered(&self) -> Vec<&R> {
        filter::apply(self.store.list(), &self.filter)
    }

    /// The current page of the filtered records.
    pub fn rows(&self) -> PageSlice<&R> {
        paging::paginate(self.filtered(), self.page, PAGE_SIZE)
    }

    /// The heading, the table for the current page and a page footer.
    pub fn render(&self) -> String {
        let rows = self.rows();
        format!(
            "{}\n\n{}\nPage {} of {} ({} records)",
            R::HEADING,
            self.table.render(rows.items()),
            rows.page(),
            rows.total_pages(),
            rows.total_count()
        )
    }

    pub fn open_create(&mut self) -> Result<()> {
        self.form.open_create()
    }

    pub fn open_edit(&mut self, id: u64) -> Result<()> {
        let record = find(&self.store, &self.table, RowAction::Edit, id)?;
        self.form.open_edit(record)
    }

    pub fn open_view(&mut self, id: u64) -> Result<()> {
        let record = find(&self.store, &self.table, RowAction::View, id)?;
        self.form.open_view(record)
    }

    /// Commits the open form into the store.
    pub fn save(&mut self) -> Result<R> {
        let saved = self.form.save(&mut self.store)?;
        info!("Saved {} {}", R::KIND, saved.id());
        Ok(saved)
    }

    pub fn cancel(&mut self) {
        self.form.cancel()
    }

    /// Deletes the record with `id` once `confirm` agrees. Returns `None` when the user declines.
    pub fn delete(&mut self, id: u64, confirm: &mut dyn Confirm) -> Result<Option<R>> {
        if let Some(title) = self.form.title() {
            fail!(
                ErrorType::Form,
                "'{title}' is still open; save or cancel it before deleting"
            )
        }
        find(&self.store, &self.table, RowAction::Delete, id)?;
        if !confirm.confirm(&format!(
            "Are you sure you want to delete this {}?",
            R::KIND
        )) {
            debug!("Delete of {} {id} declined", R::KIND);
            return Ok(None);
        }
        let deleted = self.store.delete(id)?;
        self.goto_page(self.page);
        info!("Deleted {} {id}", R::KIND);
        Ok(Some(deleted))
    }
}

/// Looks up the record a row action is aimed at.
fn find<'a, R: Resource>(
    store: &'a MemoryStore<R>,
    table: &Table<R>,
    action: RowAction,
    id: u64,
) -> Result<&'a R> {
    match store.get(id) {
        Some(record) => table.forward(action, record),
        None => fail!(ErrorType::NotFound, "{} {id} not found", R::KIND),
    }
}

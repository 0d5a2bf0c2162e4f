//! A session owns the three resource pages and routes commands to them.
//!
//! Only one form may be open at a time across the whole session. The session remembers which
//! resource it belongs to, so `set`, `item`, `save` and `cancel` need no resource argument.

use crate::args::FilterArgs;
use crate::error::{fail, ErrorType};
use crate::form::FormMode;
use crate::model::{Dataset, DeliveryNote, Expense, PreOrder};
use crate::page::{Confirm, Resource, ResourcePage};
use crate::stats::Stats;
use crate::store::{Record, Store};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// The resources a session manages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ResourceKind {
    #[serde(rename = "expense", alias = "expenses", alias = "operasional")]
    #[value(name = "expense", alias = "expenses", alias = "operasional")]
    Expense,
    #[serde(rename = "preorder", alias = "po")]
    #[value(name = "preorder", alias = "po")]
    PreOrder,
    #[serde(rename = "sj", alias = "surat-jalan")]
    #[value(name = "sj", alias = "surat-jalan")]
    DeliveryNote,
}

serde_plain::derive_display_from_serialize!(ResourceKind);
serde_plain::derive_fromstr_from_deserialize!(ResourceKind);

impl ResourceKind {
    /// What a record of this kind is called in messages, e.g. "surat jalan".
    pub fn noun(self) -> &'static str {
        match self {
            ResourceKind::Expense => Expense::KIND,
            ResourceKind::PreOrder => PreOrder::KIND,
            ResourceKind::DeliveryNote => DeliveryNote::KIND,
        }
    }
}

/// What a session needs from a page, with the record type erased.
trait Page {
    fn render(&self) -> String;
    fn list(&mut self, args: &FilterArgs, page: Option<usize>) -> Result<()>;
    fn goto_page(&mut self, page: usize) -> usize;
    fn open(&mut self, mode: FormMode, id: Option<u64>) -> Result<()>;
    fn title(&self) -> Option<&'static str>;
    fn draft(&self) -> Option<String>;
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;
    fn add_item(&mut self) -> Result<u64>;
    fn remove_item(&mut self, id: u64) -> Result<()>;
    fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()>;
    fn save(&mut self) -> Result<(u64, Value)>;
    fn cancel(&mut self);
    fn delete(&mut self, id: u64, confirm: &mut dyn Confirm) -> Result<Option<Value>>;
}

impl<R> Page for ResourcePage<R>
where
    R: Resource + Serialize,
{
    fn render(&self) -> String {
        ResourcePage::render(self)
    }

    fn list(&mut self, args: &FilterArgs, page: Option<usize>) -> Result<()> {
        self.set_filter(R::filter_from(args)?);
        if let Some(page) = page {
            ResourcePage::goto_page(self, page);
        }
        Ok(())
    }

    fn goto_page(&mut self, page: usize) -> usize {
        ResourcePage::goto_page(self, page)
    }

    fn open(&mut self, mode: FormMode, id: Option<u64>) -> Result<()> {
        match (mode, id) {
            (FormMode::Creating, _) => self.open_create(),
            (FormMode::Editing, Some(id)) => self.open_edit(id),
            (FormMode::Viewing, Some(id)) => self.open_view(id),
            _ => fail!(ErrorType::Input, "Cannot open a form for {mode}"),
        }
    }

    fn title(&self) -> Option<&'static str> {
        self.form().title()
    }

    fn draft(&self) -> Option<String> {
        let form = self.form();
        let draft = form.draft()?;
        if let Ok(json) = serde_json::to_string(draft) {
            debug!("Draft: {json}");
        }
        Some(format!("{}\n\n{draft}", form.title().unwrap_or_default()))
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.form_mut().set_field(name, value)
    }

    fn add_item(&mut self) -> Result<u64> {
        self.form_mut().add_item()
    }

    fn remove_item(&mut self, id: u64) -> Result<()> {
        self.form_mut().remove_item(id)
    }

    fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()> {
        self.form_mut().set_item_field(id, name, value)
    }

    fn save(&mut self) -> Result<(u64, Value)> {
        let saved = ResourcePage::save(self)?;
        Ok((saved.id(), to_value(&saved)))
    }

    fn cancel(&mut self) {
        ResourcePage::cancel(self)
    }

    fn delete(&mut self, id: u64, confirm: &mut dyn Confirm) -> Result<Option<Value>> {
        Ok(ResourcePage::delete(self, id, confirm)?.map(|r| to_value(&r)))
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Whether a delete asks for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    Ask,
    Skip,
}

#[derive(Debug)]
pub struct Session {
    expenses: ResourcePage<Expense>,
    pre_orders: ResourcePage<PreOrder>,
    delivery_notes: ResourcePage<DeliveryNote>,
    /// The resource whose form is open.
    active: Option<ResourceKind>,
    confirm_delete: bool,
}

impl Session {
    /// Seeds each page from `dataset`.
    pub fn new(dataset: Dataset, confirm_delete: bool) -> Result<Self> {
        let Dataset {
            expenses,
            pre_orders,
            delivery_notes,
        } = dataset;
        Ok(Self {
            expenses: ResourcePage::new(expenses)?,
            pre_orders: ResourcePage::new(pre_orders)?,
            delivery_notes: ResourcePage::new(delivery_notes)?,
            active: None,
            confirm_delete,
        })
    }

    pub fn expenses(&self) -> &ResourcePage<Expense> {
        &self.expenses
    }

    pub fn pre_orders(&self) -> &ResourcePage<PreOrder> {
        &self.pre_orders
    }

    pub fn delivery_notes(&self) -> &ResourcePage<DeliveryNote> {
        &self.delivery_notes
    }

    /// The resource whose form is open, if any.
    pub fn active(&self) -> Option<ResourceKind> {
        self.active
    }

    fn page(&self, kind: ResourceKind) -> &dyn Page {
        match kind {
            ResourceKind::Expense => &self.expenses,
            ResourceKind::PreOrder => &self.pre_orders,
            ResourceKind::DeliveryNote => &self.delivery_notes,
        }
    }

    fn page_mut(&mut self, kind: ResourceKind) -> &mut dyn Page {
        match kind {
            ResourceKind::Expense => &mut self.expenses,
            ResourceKind::PreOrder => &mut self.pre_orders,
            ResourceKind::DeliveryNote => &mut self.delivery_notes,
        }
    }

    fn active_page(&mut self) -> Result<&mut dyn Page> {
        match self.active {
            Some(kind) => Ok(self.page_mut(kind)),
            None => fail!(ErrorType::Form, "No form is open"),
        }
    }

    /// The rendered current page of `kind`.
    pub fn render(&self, kind: ResourceKind) -> String {
        self.page(kind).render()
    }

    /// Replaces the filter of `kind`, optionally moves to `page`, and renders the result.
    pub fn list(
        &mut self,
        kind: ResourceKind,
        args: &FilterArgs,
        page: Option<usize>,
    ) -> Result<String> {
        let target = self.page_mut(kind);
        target.list(args, page)?;
        Ok(target.render())
    }

    pub fn goto_page(&mut self, kind: ResourceKind, page: usize) -> String {
        let target = self.page_mut(kind);
        target.goto_page(page);
        target.render()
    }

    /// Opens a form on `kind`. `id` is required for editing and viewing.
    pub fn open(&mut self, kind: ResourceKind, mode: FormMode, id: Option<u64>) -> Result<String> {
        if let Some(open) = self.active {
            let title = self.page(open).title().unwrap_or_default();
            fail!(
                ErrorType::Form,
                "'{title}' is still open; save or cancel it first"
            )
        }
        let target = self.page_mut(kind);
        target.open(mode, id)?;
        let draft = target.draft().unwrap_or_default();
        self.active = Some(kind);
        debug!("Opened {kind} form for {mode}");
        Ok(draft)
    }

    /// The title and fields of the open form.
    pub fn draft(&mut self) -> Result<String> {
        let page = self.active_page()?;
        match page.draft() {
            Some(draft) => Ok(draft),
            None => fail!(ErrorType::Form, "No form is open"),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.active_page()?.set_field(name, value)
    }

    pub fn add_item(&mut self) -> Result<u64> {
        self.active_page()?.add_item()
    }

    pub fn remove_item(&mut self, id: u64) -> Result<()> {
        self.active_page()?.remove_item(id)
    }

    pub fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()> {
        self.active_page()?.set_item_field(id, name, value)
    }

    /// Commits the open form. The form stays open when the save fails.
    pub fn save(&mut self) -> Result<(ResourceKind, u64, Value)> {
        let Some(kind) = self.active else {
            fail!(ErrorType::Form, "No form is open")
        };
        match self.page_mut(kind).save() {
            Ok((id, record)) => {
                self.active = None;
                Ok((kind, id, record))
            }
            Err(e) => {
                if e.is_warning() {
                    warn!("{e}");
                }
                Err(e)
            }
        }
    }

    /// Discards the open form, if there is one, and returns its title.
    pub fn cancel(&mut self) -> Option<&'static str> {
        let kind = self.active.take()?;
        let page = self.page_mut(kind);
        let title = page.title();
        page.cancel();
        title
    }

    /// Deletes a record of `kind`. Confirmation is asked unless `policy` or the session skips it.
    pub fn delete(
        &mut self,
        kind: ResourceKind,
        id: u64,
        policy: DeletePolicy,
        confirm: &mut dyn Confirm,
    ) -> Result<Option<Value>> {
        if let Some(open) = self.active {
            let title = self.page(open).title().unwrap_or_default();
            fail!(
                ErrorType::Form,
                "'{title}' is still open; save or cancel it before deleting"
            )
        }
        let ask = self.confirm_delete && policy == DeletePolicy::Ask;
        let mut always = |_: &str| true;
        let confirm: &mut dyn Confirm = if ask { confirm } else { &mut always };
        let result = self.page_mut(kind).delete(id, confirm);
        if let Err(e) = &result {
            if e.is_warning() {
                warn!("{e}");
            }
        }
        result
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(
            self.expenses.store().list(),
            self.pre_orders.store().list(),
            self.delivery_notes.store().list(),
        )
    }
}

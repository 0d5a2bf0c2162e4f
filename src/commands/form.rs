//! Form command handlers: open a form, change its draft, then save or cancel it.

use crate::commands::Out;
use crate::form::FormMode;
use crate::session::{ResourceKind, Session};
use crate::Result;
use serde_json::Value;

/// Opens a create form on `resource` and shows its blank draft.
pub fn new(session: &mut Session, resource: ResourceKind) -> Result<Out<()>> {
    Ok(session.open(resource, FormMode::Creating, None)?.into())
}

/// Opens an edit form holding a copy of record `id`.
pub fn edit(session: &mut Session, resource: ResourceKind, id: u64) -> Result<Out<()>> {
    Ok(session.open(resource, FormMode::Editing, Some(id))?.into())
}

/// Opens a read-only form holding a copy of record `id`.
pub fn view(session: &mut Session, resource: ResourceKind, id: u64) -> Result<Out<()>> {
    Ok(session.open(resource, FormMode::Viewing, Some(id))?.into())
}

pub fn set_field(session: &mut Session, field: &str, value: &str) -> Result<Out<()>> {
    session.set_field(field, value)?;
    Ok(format!("Set {field}").into())
}

pub fn add_item(session: &mut Session) -> Result<Out<u64>> {
    let id = session.add_item()?;
    Ok(Out::new(format!("Added material {id}"), id))
}

pub fn remove_item(session: &mut Session, id: u64) -> Result<Out<()>> {
    session.remove_item(id)?;
    Ok(format!("Removed material {id}").into())
}

pub fn set_item_field(session: &mut Session, id: u64, field: &str, value: &str) -> Result<Out<()>> {
    session.set_item_field(id, field, value)?;
    Ok(format!("Set {field} of material {id}").into())
}

/// Shows the open form.
pub fn draft(session: &mut Session) -> Result<Out<()>> {
    Ok(session.draft()?.into())
}

/// Validates and commits the open form.
pub fn save(session: &mut Session) -> Result<Out<Value>> {
    let (resource, id, record) = session.save()?;
    Ok(Out::new(format!("Saved {} {id}", resource.noun()), record))
}

/// Discards the open form.
pub fn cancel(session: &mut Session) -> Out<()> {
    match session.cancel() {
        Some(title) => format!("Discarded '{title}'").into(),
        None => "No form is open".into(),
    }
}

//! Command handlers for the niaga CLI and its interactive shell.

mod delete;
mod form;
mod init;
mod list;
mod shell;
mod stats;

use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use tracing::{debug, info};

pub use delete::delete;
pub use form::{
    add_item, cancel, draft, edit, new, remove_item, save, set_field, set_item_field, view,
};
pub use init::init;
pub use list::{list, page};
pub use shell::shell;
pub use stats::stats;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to both the command line and the shell.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        self.debug_structure();
    }

    /// Write the message to `w` and the structured data (if it exists) as JSON to `debug!`.
    pub fn write(&self, w: &mut impl Write) -> std::io::Result<()> {
        if !self.message.is_empty() {
            writeln!(w, "{}", self.message)?;
        }
        self.debug_structure();
        Ok(())
    }

    fn debug_structure(&self) {
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

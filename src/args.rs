//! These structs provide the CLI interface for the niaga CLI, and the command language of the
//! interactive shell.

use crate::session::ResourceKind;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// niaga: an admin ledger for pre-orders, delivery notes (surat jalan) and operational expenses.
///
/// Every session starts from seeded sample records (or the seed file named in config.json) and
/// keeps its records in memory. Use `niaga shell` to create, edit and delete records
/// interactively, or `niaga list` and `niaga stats` for a quick look at the seeded data.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the niaga home directory and a default config.json.
    ///
    /// The home directory defaults to $HOME/niaga. Pass --niaga-home or set NIAGA_HOME to put it
    /// somewhere else. Running init when config.json already exists is an error.
    Init,
    /// Show one page of a resource table, optionally filtered.
    List(ListArgs),
    /// Show dashboard statistics across all resources.
    Stats,
    /// Start an interactive session. Type `help` inside the shell for its commands.
    Shell,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where niaga configuration is held. Defaults to ~/niaga
    #[arg(long, env = "NIAGA_HOME", default_value_t = default_niaga_home())]
    niaga_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, niaga_home: PathBuf) -> Self {
        Self {
            log_level,
            niaga_home: niaga_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn niaga_home(&self) -> &DisplayPath {
        &self.niaga_home
    }
}

/// Filter criteria given on the command line. Which options apply depends on the resource:
///
/// - expense: --search (description), --status, --category
/// - preorder: --search (sales, customer or PO number)
/// - sj: --search (number), --status, --from, --to, --material
#[derive(Debug, Default, Parser, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    /// Case-insensitive text to look for.
    #[arg(long)]
    search: Option<String>,

    /// Only records with this status.
    #[arg(long)]
    status: Option<String>,

    /// Only expenses in this category: office, utilities, maintenance, transport, marketing.
    #[arg(long)]
    category: Option<String>,

    /// Only delivery notes dated on or after this date (YYYY-MM-DD).
    #[arg(long)]
    from: Option<String>,

    /// Only delivery notes dated on or before this date (YYYY-MM-DD).
    #[arg(long)]
    to: Option<String>,

    /// Only delivery notes with a material whose name contains this text.
    #[arg(long)]
    material: Option<String>,
}

impl FilterArgs {
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from = from.map(str::to_string);
        self.to = to.map(str::to_string);
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// Args for the `niaga list` command, and for `list` inside the shell.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// The resource to list: expense, preorder or sj
    resource: ResourceKind,

    #[clap(flatten)]
    filter: FilterArgs,

    /// The 1-based page to show. Out-of-range pages are pulled back to the nearest page.
    #[arg(long)]
    page: Option<usize>,
}

impl ListArgs {
    pub fn new(resource: ResourceKind, filter: FilterArgs, page: Option<usize>) -> Self {
        Self {
            resource,
            filter,
            page,
        }
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn page(&self) -> Option<usize> {
        self.page
    }
}

/// One line typed into `niaga shell`.
#[derive(Debug, Parser, Clone)]
#[command(no_binary_name = true, name = "niaga", disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

impl ShellLine {
    pub fn command(&self) -> &ShellCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Set the filter of a resource table and show it. Omitted options are cleared.
    List(ListArgs),
    /// Go to a page of a resource table.
    Page {
        resource: ResourceKind,
        page: usize,
    },
    /// Open a create form.
    New { resource: ResourceKind },
    /// Open an edit form holding a copy of a record.
    Edit { resource: ResourceKind, id: u64 },
    /// Open a read-only form holding a copy of a record.
    View { resource: ResourceKind, id: u64 },
    /// Set a field of the open form.
    Set {
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Change the line items of the open form.
    #[command(subcommand)]
    Item(ItemCommand),
    /// Show the open form.
    Draft,
    /// Validate the open form and commit it.
    Save,
    /// Discard the open form.
    Cancel,
    /// Delete a record after confirmation.
    Delete(DeleteArgs),
    /// Show dashboard statistics.
    Stats,
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    /// Append a blank line item.
    Add,
    /// Remove a line item.
    #[command(alias = "remove")]
    Rm { id: u64 },
    /// Set a field of a line item.
    Set {
        id: u64,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    resource: ResourceKind,

    id: u64,

    /// Delete without asking.
    #[arg(long, short)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(resource: ResourceKind, id: u64, yes: bool) -> Self {
        Self { resource, id, yes }
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

fn default_niaga_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("niaga"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --niaga-home or NIAGA_HOME instead of relying on the default \
                niaga home directory.",
            );
            PathBuf::from("niaga")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(line: &str) -> ShellCommand {
        let words = shell_words::split(line).unwrap();
        ShellLine::try_parse_from(words).unwrap().command().clone()
    }

    #[test]
    fn test_parse_cli_list() {
        let args = Args::try_parse_from([
            "niaga",
            "--log-level",
            "debug",
            "list",
            "sj",
            "--status",
            "sent",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::List(list) => {
                assert_eq!(list.resource(), ResourceKind::DeliveryNote);
                assert_eq!(list.filter().status(), Some("sent"));
                assert_eq!(list.page(), Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_shell_lines() {
        assert_eq!(
            shell("set description 'Pembelian ATK Kantor'"),
            ShellCommand::Set {
                field: "description".to_string(),
                value: "Pembelian ATK Kantor".to_string()
            }
        );
        assert_eq!(
            shell("item set 2 price 50000"),
            ShellCommand::Item(ItemCommand::Set {
                id: 2,
                field: "price".to_string(),
                value: "50000".to_string()
            })
        );
        assert_eq!(
            shell("edit expense 3"),
            ShellCommand::Edit {
                resource: ResourceKind::Expense,
                id: 3
            }
        );
        assert_eq!(shell("exit"), ShellCommand::Quit);
        match shell("delete preorder 1 --yes") {
            ShellCommand::Delete(d) => {
                assert_eq!(d.resource(), ResourceKind::PreOrder);
                assert!(d.yes());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_resource() {
        let words = shell_words::split("new invoice").unwrap();
        assert!(ShellLine::try_parse_from(words).is_err());
    }
}

//! Error types for the public interface of this library.
//!
//! Internally, functions return `Res<T>`, which is an `anyhow` result. At the boundary where an
//! error becomes visible to a caller, it is promoted into an `Error` carrying an `ErrorType` so
//! the caller can tell a blocked save from a stale identifier without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a public `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A draft is missing required fields or holds unparseable values. The form stays open.
    Validation,
    /// An update, delete or lookup referenced an identifier that is not in the store.
    NotFound,
    /// The requested form transition is not allowed from the current form state.
    Form,
    /// The configuration or seed data could not be loaded.
    Config,
    /// A command argument or field value could not be understood.
    Input,
    /// Reading or writing a file failed.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            inner: anyhow::anyhow!(message.into()),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Every error in this program is scoped to a single command and leaves prior state intact,
    /// but only not-found errors are reported as warnings rather than failures.
    pub fn is_warning(&self) -> bool {
        self.error_type == ErrorType::NotFound
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Promotes an internal result into a public one.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|inner| Error { error_type, inner })
    }
}

/// Returns early with a public `Error` of the given type.
macro_rules! fail {
    ($error_type:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::new($error_type, format!($($arg)*)))
    };
}

pub(crate) use fail;

//! Operation error values returned by repositories.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type OperationResult<T> = Result<T, OperationError>;

/// Closed set of repository failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Empty id, or an id rejected by a validating wrapper.
    InvalidId,
    /// Find options rejected before reaching the store.
    InvalidQuery,
    CreateFailed,
    NotFound,
    FindInternalError,
    UpdateFailed,
    DeleteFailed,
}

impl ErrorKind {
    /// Stable identifier, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "InvalidId",
            Self::InvalidQuery => "InvalidQuery",
            Self::CreateFailed => "CreateFailed",
            Self::NotFound => "NotFound",
            Self::FindInternalError => "FindInternalError",
            Self::UpdateFailed => "UpdateFailed",
            Self::DeleteFailed => "DeleteFailed",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure of one repository operation.
///
/// `cause` carries the underlying store diagnostic when the failure came
/// from the store, and is `None` for local validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn invalid_id() -> Self {
        Self::new(ErrorKind::InvalidId, "Id passed is not valid")
    }

    pub fn invalid_query() -> Self {
        Self::new(ErrorKind::InvalidQuery, "queries passed are not valid")
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {} ({cause})", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for OperationError {}

/// Acknowledgement returned by `update` and `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationSuccess {
    pub success: bool,
}

impl OperationSuccess {
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

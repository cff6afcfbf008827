//! Error types for sieve operations.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {}", format_errors(.0))]
    InvalidQuery(Vec<ParseError>),
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A problem found while parsing raw query parameters.
///
/// Parse problems are data, not faults: they accumulate in a
/// [`ParseOutcome`](crate::ParseOutcome) so that one bad parameter never
/// aborts the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseError {
    /// A `page` or `pageSize` value that was present but unusable.
    #[error("{message}")]
    InvalidPagination { field: String, message: String },

    /// A malformed filter expression, or one the configuration forbids.
    #[error("{message}")]
    InvalidFilter { field: Option<String>, message: String },
}

impl ParseError {
    pub(crate) fn invalid_pagination(field: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::InvalidPagination {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_filter(field: Option<&str>, message: impl Into<String>) -> Self {
        ParseError::InvalidFilter {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    /// The query-string field the error is about, when one is identifiable.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::InvalidPagination { field, .. } => Some(field),
            ParseError::InvalidFilter { field, .. } => field.as_deref(),
        }
    }

    /// The human-readable message. Same text as the `Display` output.
    pub fn message(&self) -> &str {
        match self {
            ParseError::InvalidPagination { message, .. } => message,
            ParseError::InvalidFilter { message, .. } => message,
        }
    }
}

//! Error types for quarry

use thiserror::Error;

/// Result type alias for quarry operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors surfaced while decoding cursor rows.
///
/// Statement rendering never fails: malformed query descriptions are a caller
/// precondition, not a runtime error.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Failure reported by the cursor (column enumeration, row access, close)
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// The key column requested for a fan-out scan is not in the result set
    #[error("Key field '{0}' not found in result columns")]
    MissingKeyField(String),

    /// Query execution error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),
}

impl OrmError {
    /// Create a cursor error
    pub fn cursor(message: impl Into<String>) -> Self {
        Self::Cursor(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this is a missing key field error
    pub fn is_missing_key_field(&self) -> bool {
        matches!(self, Self::MissingKeyField(_))
    }
}

/// Conversion failure between a [`Value`](crate::Value) and a scan target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The value kind cannot be stored in the target type
    #[error("cannot scan {found} into {expected}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The value kind matches but its content does not fit the target
    #[error("invalid value for {expected}: {message}")]
    Invalid {
        expected: &'static str,
        message: String,
    },
}

impl ScanError {
    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::Mismatch { expected, found }
    }

    pub(crate) fn invalid(expected: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            expected,
            message: message.to_string(),
        }
    }

    /// Attach the column name this failure happened on.
    pub fn at(self, column: &str) -> OrmError {
        OrmError::decode(column, self.to_string())
    }
}

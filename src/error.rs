use alloc::string::String;

use thiserror::Error;

/// Errors returned by [`Table`](crate::Table) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The probe sequence for `key` reached an empty slot without a match.
    #[error("key not found: {key:?}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },
}

impl TableError {
    pub(crate) fn key_not_found(key: &str) -> Self {
        TableError::KeyNotFound { key: key.into() }
    }
}

/// Errors returned when building a [`TableConfig`](crate::TableConfig).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The maximum load ratio must lie strictly between 0 and 1.
    #[error("max load ratio must be in (0, 1), got {0}")]
    InvalidLoadRatio(f64),

    /// Growth must at least double the table.
    #[error("growth factor must be at least 2, got {0}")]
    InvalidGrowthFactor(usize),
}

/// Result type for table operations.
pub type Result<T, E = TableError> = core::result::Result<T, E>;

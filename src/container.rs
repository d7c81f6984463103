//! The boundary between the harness and the map under test.

use std::fmt;

use thiserror::Error;

use crate::sample::{Batch, Pair};

/// Error kinds the catalog recognises. Anything else a map reports is a
/// failure under every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The map declines a structurally disallowed mutation.
    UnsupportedOperation,
    /// The map declines a null key, a null value or a null batch reference.
    NullRejected,
}

impl ErrorKind {
    /// Name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::NullRejected => "NullRejected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a map implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// The operation is not supported by this map.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// A null key, value or batch reference was rejected.
    #[error("null rejected: {what}")]
    NullRejected {
        /// What was null.
        what: &'static str,
    },

    /// Any other failure. Never part of the expected contract.
    #[error("{0}")]
    Other(String),
}

impl ContainerError {
    /// Maps the error onto a recognised kind; `None` for [`Other`](Self::Other).
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Unsupported { .. } => Some(ErrorKind::UnsupportedOperation),
            Self::NullRejected { .. } => Some(ErrorKind::NullRejected),
            Self::Other(_) => None,
        }
    }
}

/// Result of one `put_all` invocation.
pub type Outcome = Result<(), ContainerError>;

/// A map implementation under test.
///
/// Null keys and values are `None`. Queries return `Result` so that a map
/// may reject null lookups the same way it rejects null writes.
pub trait MapUnderTest<K, V> {
    /// Inserts every pair of `batch` in one call. `None` is a null batch
    /// reference.
    ///
    /// # Errors
    ///
    /// [`ContainerError::Unsupported`] when bulk insertion is not supported,
    /// [`ContainerError::NullRejected`] for a disallowed null.
    fn put_all(&mut self, batch: Option<&Batch<K, V>>) -> Outcome;

    /// Returns `true` if `key` is mapped.
    ///
    /// # Errors
    ///
    /// May reject a null key with [`ContainerError::NullRejected`].
    fn contains_key(&self, key: Option<&K>) -> Result<bool, ContainerError>;

    /// Returns `true` if some key maps to `value`.
    ///
    /// # Errors
    ///
    /// May reject a null value with [`ContainerError::NullRejected`].
    fn contains_value(&self, value: Option<&V>) -> Result<bool, ContainerError>;

    /// Looks up `key`: outer `None` when unmapped, inner `None` for a
    /// mapped null value.
    ///
    /// # Errors
    ///
    /// May reject a null key with [`ContainerError::NullRejected`].
    fn get(&self, key: Option<&K>) -> Result<Option<Option<V>>, ContainerError>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every entry, in the map's iteration order.
    fn entries(&self) -> Vec<Pair<K, V>>;
}

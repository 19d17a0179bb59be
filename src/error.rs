//! Unified error types for chatstat.
//!
//! This module provides a single [`ChatStatError`] enum covering every failure
//! the library can surface. The taxonomy distinguishes three situations a
//! caller genuinely needs to tell apart:
//!
//! - the transcript could not be read or recognized at all ([`ChatStatError::Io`],
//!   [`ChatStatError::InvalidFormat`]),
//! - a query needs data and the model has none ([`ChatStatError::EmptyModel`]),
//! - a lookup used a key the model does not contain ([`ChatStatError::DateNotFound`]).
//!
//! Per-line parse anomalies are deliberately *not* errors. The parser records
//! them as diagnostics on the model (see [`crate::index::UnparsedLine`]) and
//! keeps going.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatstat operations.
///
/// # Example
///
/// ```rust
/// use chatstat::error::Result;
/// use chatstat::ChatIndex;
///
/// fn load(path: &str) -> Result<ChatIndex> {
///     chatstat::chat(path)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatStatError>;

/// The error type for all chatstat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatStatError {
    /// An I/O error occurred while reading the transcript.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - The file is not valid UTF-8
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript content doesn't match any known export format.
    ///
    /// This occurs when locale auto-detection finds neither a date header
    /// nor a message header in the sampled lines, so there is nothing to
    /// build a model from.
    #[error("Invalid transcript format: {message}")]
    InvalidFormat {
        /// Description of what's wrong
        message: String,
    },

    /// A query that requires at least one date bucket ran on an empty model.
    ///
    /// Returned by [`ChatIndex::last_date`](crate::ChatIndex::last_date) when
    /// zero messages were parsed.
    #[error("chat model is empty: no date buckets were parsed")]
    EmptyModel,

    /// A date-keyed lookup used a key absent from the index.
    ///
    /// Returned by [`ChatIndex::date_data`](crate::ChatIndex::date_data).
    /// Key format is `YYYY-M-D-<weekday label>`, e.g. `2018-4-23-월`.
    #[error("no messages recorded under date key '{key}'")]
    DateNotFound {
        /// The key that was looked up
        key: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatStatError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        ChatStatError::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a date-not-found error for the given key.
    pub fn date_not_found(key: impl Into<String>) -> Self {
        ChatStatError::DateNotFound { key: key.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatStatError::Io(_))
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatStatError::InvalidFormat { .. })
    }

    /// Returns `true` if this is an empty model error.
    pub fn is_empty_model(&self) -> bool {
        matches!(self, ChatStatError::EmptyModel)
    }

    /// Returns `true` if this is a date-not-found error.
    pub fn is_date_not_found(&self) -> bool {
        matches!(self, ChatStatError::DateNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

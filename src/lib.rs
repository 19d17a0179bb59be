//! # chatstat
//!
//! A Rust library for parsing KakaoTalk chat exports and computing chatroom
//! statistics.
//!
//! ## Overview
//!
//! chatstat ingests one exported chat-room transcript (a plain-text log
//! interleaving per-message metadata and content) and builds an immutable,
//! date- and sender-indexed model answering aggregate and point queries:
//! message counts, word occurrence counts, rich-content tallies, per-sender
//! averages, and date-keyed lookup. Korean and English export locales are
//! auto-detected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatstat::{SenderFilter, WordQuery, chat};
//!
//! fn main() -> chatstat::Result<()> {
//!     // Parse eagerly and build the index
//!     let index = chat("KakaoTalkChats.txt")?;
//!
//!     let total = index.count_messages(&SenderFilter::all());
//!     let greetings = index.count_word_occurrences(&WordQuery::new(["hey", "Hey"]));
//!     let last = index.last_date()?;
//!
//!     println!("{total} messages, {greetings} greetings, last active {last}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — Line classifier and transcript parser
//!   - [`TranscriptParser`](parser::TranscriptParser) — state-machine parser
//! - [`locale`] — Per-locale line shapes and auto-detection
//! - [`index`] — The immutable model: [`ChatIndex`], [`DateBucket`](index::DateBucket)
//! - [`query`] — Read-only query operations and typed parameters
//! - [`config`] — Parser configuration ([`ParserConfig`](config::ParserConfig))
//! - [`error`] — Unified error types ([`ChatStatError`], [`Result`])
//! - [`cli`] — CLI types (requires the `cli` feature)
//! - [`prelude`] — Convenient re-exports
//!
//! The model is built in one pass and immutable thereafter, so concurrent
//! read access from multiple callers is safe without locking. Two
//! transcripts analyzed in the same process are fully independent models.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod locale;
pub mod message;
pub mod parser;
pub mod query;

use std::path::Path;

// Re-export the main types at the crate root for convenience
pub use error::{ChatStatError, Result};
pub use index::{ChatIndex, ChatMeta};
pub use locale::Locale;
pub use message::{Message, MessageKind, Timestamp};
pub use query::{DayMetric, SenderAverages, SenderFilter, WordQuery};

/// Parses a transcript file and returns a fully-built [`ChatIndex`].
///
/// The parse happens eagerly; the returned model is immutable.
///
/// # Errors
///
/// [`ChatStatError::Io`] if the file is missing, unreadable, or not valid
/// UTF-8; [`ChatStatError::InvalidFormat`] if no known export format is
/// recognized.
///
/// # Example
///
/// ```rust,no_run
/// let index = chatstat::chat("KakaoTalkChats.txt")?;
/// println!("{} messages", index.message_count());
/// # Ok::<(), chatstat::ChatStatError>(())
/// ```
pub fn chat(path: impl AsRef<Path>) -> Result<ChatIndex> {
    ChatIndex::from_path(path)
}

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatstat::prelude::*;
/// ```
pub mod prelude {
    // Model types
    pub use crate::index::{ChatIndex, ChatMeta, DateBucket, UnparsedLine};
    pub use crate::message::{Message, MessageKind, Timestamp};

    // Error types
    pub use crate::error::{ChatStatError, Result};

    // Parsing
    pub use crate::config::ParserConfig;
    pub use crate::locale::Locale;
    pub use crate::parser::TranscriptParser;

    // Queries
    pub use crate::query::{DayMetric, SenderAverages, SenderFilter, WordQuery};

    // Construction
    pub use crate::chat;
}

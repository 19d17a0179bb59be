//! The indexed chat model.
//!
//! [`ChatIndex`] is built once from a parse pass and is immutable thereafter:
//! an ordered sequence of [`DateBucket`]s plus a sender index, with derived
//! counters computed on demand rather than stored redundantly. Re-analysis
//! means re-parsing; no update or delete operations exist, so concurrent
//! read access is inherently safe.
//!
//! # Example
//!
//! ```rust
//! use chatstat::ChatIndex;
//!
//! let index = ChatIndex::from_str(
//!     "2018년 4월 23일 월요일\n철수, 오후 3:03 : 안녕하세요",
//! )?;
//! assert_eq!(index.message_count(), 1);
//! assert_eq!(index.last_date()?, "2018-4-23-월");
//! # Ok::<(), chatstat::ChatStatError>(())
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::error::Result;
use crate::locale::Locale;
use crate::message::{Message, Timestamp};
use crate::parser::{ParseOutput, TranscriptParser};

/// Transcript metadata from the export's header lines.
///
/// Both fields are optional; exports stripped of their header still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMeta {
    /// Chatroom title ("{title} 님과 카카오톡 대화").
    pub title: Option<String>,

    /// When the export was saved ("저장한 날짜 : ...").
    pub date_saved: Option<NaiveDateTime>,
}

/// A line that matched no shape and could not be attached as a continuation.
///
/// Diagnostic only: recorded and skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedLine {
    /// 1-based line number in the source transcript.
    pub line_no: usize,
    /// The line text, as read.
    pub text: String,
}

impl UnparsedLine {
    pub(crate) fn new(line_no: usize, text: impl Into<String>) -> Self {
        Self {
            line_no,
            text: text.into(),
        }
    }
}

/// All messages recorded under one calendar-day header.
///
/// Buckets are created when a day banner is seen, appended in first-seen
/// order, and never reordered. The key format is
/// `YYYY-M-D-<weekday label>` with the weekday label in the source locale,
/// e.g. `2018-4-23-월`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBucket {
    key: String,
    year: i32,
    month: u32,
    day: u32,
    weekday_label: String,
    messages: Vec<Message>,
}

impl DateBucket {
    pub(crate) fn new(year: i32, month: u32, day: u32, weekday_label: impl Into<String>) -> Self {
        let weekday_label = weekday_label.into();
        Self {
            key: format!("{year}-{month}-{day}-{weekday_label}"),
            year,
            month,
            day,
            weekday_label,
            messages: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns the bucket's date key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the messages in original transcript order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns a date-only [`Timestamp`] for this bucket.
    pub fn timestamp(&self) -> Timestamp {
        Timestamp::new(self.year, self.month, self.day, self.weekday_label.clone())
    }

    /// Returns the bucket's calendar date, when the written components form
    /// a valid one.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Reference to one message: (bucket index, message index).
pub(crate) type MessageRef = (usize, usize);

/// The built chat model: ordered date buckets, a sender index, and parse
/// diagnostics. Immutable after construction; all query operations are pure
/// reads (see the query methods in [`crate::query`]).
#[derive(Debug, Clone)]
pub struct ChatIndex {
    pub(crate) locale: Locale,
    pub(crate) meta: ChatMeta,
    pub(crate) buckets: Vec<DateBucket>,
    pub(crate) by_date: HashMap<String, usize>,
    pub(crate) by_sender: BTreeMap<String, Vec<MessageRef>>,
    pub(crate) unparsed: Vec<UnparsedLine>,
}

impl ChatIndex {
    /// Builds the index from a parser's output.
    pub fn from_output(output: ParseOutput) -> Self {
        let ParseOutput {
            locale,
            meta,
            buckets,
            unparsed,
        } = output;

        let mut by_date = HashMap::with_capacity(buckets.len());
        let mut by_sender: BTreeMap<String, Vec<MessageRef>> = BTreeMap::new();

        for (b, bucket) in buckets.iter().enumerate() {
            by_date.entry(bucket.key().to_string()).or_insert(b);
            for (m, msg) in bucket.messages().iter().enumerate() {
                if msg.counts_for_sender() {
                    by_sender.entry(msg.sender.clone()).or_default().push((b, m));
                }
            }
        }

        Self {
            locale,
            meta,
            buckets,
            by_date,
            by_sender,
            unparsed,
        }
    }

    /// Parses a transcript file and builds the index eagerly.
    ///
    /// Fails with [`ChatStatError::Io`](crate::ChatStatError::Io) if the
    /// file is missing, unreadable, or not valid UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with_config(path, ParserConfig::default())
    }

    /// Parses a transcript file with a custom parser configuration.
    pub fn from_path_with_config(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        let output = TranscriptParser::with_config(config).parse(path.as_ref())?;
        Ok(Self::from_output(output))
    }

    /// Parses transcript content from a string and builds the index.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Self::from_str_with_config(content, ParserConfig::default())
    }

    /// Parses transcript content with a custom parser configuration.
    pub fn from_str_with_config(content: &str, config: ParserConfig) -> Result<Self> {
        let output = TranscriptParser::with_config(config).parse_str(content)?;
        Ok(Self::from_output(output))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the transcript locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the transcript metadata.
    pub fn meta(&self) -> &ChatMeta {
        &self.meta
    }

    /// Returns the date buckets in chronological order.
    pub fn buckets(&self) -> &[DateBucket] {
        &self.buckets
    }

    /// Returns the date keys in chronological order.
    pub fn date_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(DateBucket::key)
    }

    /// Returns all distinct sender names, sorted.
    ///
    /// System notices carry no sender and do not appear here.
    pub fn senders(&self) -> impl Iterator<Item = &str> {
        self.by_sender.keys().map(String::as_str)
    }

    /// Iterates over every message, in transcript order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.buckets.iter().flat_map(|b| b.messages().iter())
    }

    /// Total number of parsed messages, system notices included.
    pub fn message_count(&self) -> usize {
        self.buckets.iter().map(|b| b.messages().len()).sum()
    }

    /// Returns `true` if no date buckets were parsed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the lines that could not be classified, in source order.
    pub fn unparsed_lines(&self) -> &[UnparsedLine] {
        &self.unparsed
    }

    pub(crate) fn message_at(&self, (b, m): MessageRef) -> &Message {
        &self.buckets[b].messages()[m]
    }
}

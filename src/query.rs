//! Query operations over the immutable chat model.
//!
//! All operations here are pure reads against the indices built in
//! [`crate::index`]; none re-scan raw text and none mutate state, so the
//! consistency properties between aggregates hold by construction.
//!
//! Flexible call shapes ("any sender set, any word list") are expressed as
//! explicit parameter structs with documented defaults rather than
//! overloads: [`SenderFilter`] (empty means all) and [`WordQuery`].
//!
//! # Example
//!
//! ```rust
//! use chatstat::{ChatIndex, SenderFilter, WordQuery};
//!
//! let index = ChatIndex::from_str(
//!     "2018년 4월 23일 월요일\n\
//!      철수, 오후 3:03 : hey Hey hey\n\
//!      영희, 오후 3:04 : hey",
//! )?;
//!
//! assert_eq!(index.count_messages(&SenderFilter::all()), 2);
//! assert_eq!(index.count_word_occurrences(&WordQuery::new(["hey", "Hey"])), 4);
//! assert_eq!(
//!     index.count_word_occurrences(&WordQuery::new(["hey"]).with_sender("영희")),
//!     1
//! );
//! # Ok::<(), chatstat::ChatStatError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ChatStatError, Result};
use crate::index::ChatIndex;
use crate::message::{Message, MessageKind};

/// Sender scope for message counting.
///
/// The default ([`SenderFilter::all`]) counts every sender. A non-empty
/// filter counts only the named senders; unknown names contribute 0 without
/// error, since sender sets are free-form lookups. System notices are never
/// counted either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderFilter {
    senders: Option<BTreeSet<String>>,
}

impl SenderFilter {
    /// Counts messages from every sender.
    pub fn all() -> Self {
        Self::default()
    }

    /// Counts messages from the named senders only.
    ///
    /// An empty name set means no restriction, same as
    /// [`SenderFilter::all`].
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            senders: if names.is_empty() { None } else { Some(names) },
        }
    }

    /// Returns `true` if this filter covers all senders.
    pub fn is_all(&self) -> bool {
        self.senders.is_none()
    }
}

/// Parameters for word-occurrence counting.
///
/// Counts occurrences of any of the given word forms across `Text` message
/// bodies, after whitespace tokenization. Matching is case-sensitive and
/// exact per token; each listed form is counted independently, so duplicate
/// or case-variant forms like `["hey", "Hey"]` add up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordQuery {
    words: Vec<String>,
    sender: Option<String>,
}

impl WordQuery {
    /// Creates a query for the given word forms.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            sender: None,
        }
    }

    /// Restricts the count to one sender's messages.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    fn occurrences_in(&self, msg: &Message) -> usize {
        if msg.kind != MessageKind::Text {
            return 0;
        }
        msg.words()
            .map(|token| self.words.iter().filter(|w| *w == token).count())
            .sum()
    }
}

/// Per-day activity metric for [`ChatIndex::top_days_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMetric {
    /// Number of sender-attributable messages (system notices excluded).
    MessageCount,
    /// Number of media messages (photo, video, file).
    MediaCount,
    /// Number of sticker messages.
    StickerCount,
}

impl DayMetric {
    fn counts(self, msg: &Message) -> bool {
        match self {
            DayMetric::MessageCount => !msg.is_system(),
            DayMetric::MediaCount => msg.kind.is_media(),
            DayMetric::StickerCount => msg.kind == MessageKind::Sticker,
        }
    }
}

/// Per-sender activity averages.
///
/// Days are counted as days in which the sender appears at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderAverages {
    /// Average whitespace-separated words per message.
    pub words_per_message: f64,
    /// Average non-whitespace letters per message.
    pub letters_per_message: f64,
    /// Average messages per active day.
    pub messages_per_day: f64,
    /// Average letters per active day.
    pub letters_per_day: f64,
}

impl ChatIndex {
    /// Counts messages, optionally restricted to a sender set.
    ///
    /// [`SenderFilter::all`] gives the total over all senders. System
    /// notices are excluded either way, and unknown sender names yield 0.
    pub fn count_messages(&self, filter: &SenderFilter) -> usize {
        match &filter.senders {
            None => self.by_sender.values().map(Vec::len).sum(),
            Some(names) => names
                .iter()
                .filter_map(|name| self.by_sender.get(name))
                .map(Vec::len)
                .sum(),
        }
    }

    /// Counts occurrences of the queried word forms across `Text` messages.
    ///
    /// An unknown scope sender yields 0 without error.
    pub fn count_word_occurrences(&self, query: &WordQuery) -> usize {
        match &query.sender {
            Some(sender) => self
                .by_sender
                .get(sender)
                .map_or(0, |refs| {
                    refs.iter()
                        .map(|&r| query.occurrences_in(self.message_at(r)))
                        .sum()
                }),
            None => self.messages().map(|m| query.occurrences_in(m)).sum(),
        }
    }

    /// Returns the key of the last date bucket in chronological order.
    ///
    /// # Errors
    ///
    /// [`ChatStatError::EmptyModel`] if no buckets exist.
    pub fn last_date(&self) -> Result<&str> {
        self.buckets
            .last()
            .map(|b| b.key())
            .ok_or(ChatStatError::EmptyModel)
    }

    /// Returns the messages recorded under the given date key, in original
    /// transcript order.
    ///
    /// # Errors
    ///
    /// [`ChatStatError::DateNotFound`] if the key is absent. A missing day
    /// is never silently an empty sequence.
    pub fn date_data(&self, key: &str) -> Result<&[Message]> {
        self.by_date
            .get(key)
            .map(|&idx| self.buckets[idx].messages())
            .ok_or_else(|| ChatStatError::date_not_found(key))
    }

    /// Tallies rich content occurrences by kind.
    ///
    /// `Text` and `System` are excluded; the sum of the tally plus the text
    /// and system counts equals [`message_count`](ChatIndex::message_count).
    pub fn tally_rich_content(&self) -> BTreeMap<MessageKind, usize> {
        let mut tally = BTreeMap::new();
        for msg in self.messages() {
            if msg.kind.is_rich() {
                *tally.entry(msg.kind).or_insert(0) += 1;
            }
        }
        tally
    }

    /// Returns the key(s) of the day(s) with the maximum value for the given
    /// metric.
    ///
    /// Ties return all tied keys in chronological order; a single winner is
    /// never picked arbitrarily. An empty model yields an empty vector.
    pub fn top_days_by(&self, metric: DayMetric) -> Vec<&str> {
        let counts: Vec<usize> = self
            .buckets
            .iter()
            .map(|b| b.messages().iter().filter(|m| metric.counts(m)).count())
            .collect();

        let Some(&max) = counts.iter().max() else {
            return Vec::new();
        };

        self.buckets
            .iter()
            .zip(&counts)
            .filter(|&(_, &count)| count == max)
            .map(|(bucket, _)| bucket.key())
            .collect()
    }

    /// Computes per-sender activity averages.
    ///
    /// Days are counted as days in which the sender appears at least once.
    pub fn per_sender_averages(&self) -> BTreeMap<String, SenderAverages> {
        self.by_sender
            .iter()
            .map(|(sender, refs)| {
                let messages = refs.len();
                let mut words = 0usize;
                let mut letters = 0usize;
                let mut days = 0usize;
                let mut last_bucket = None;

                for &(b, m) in refs {
                    let msg = self.message_at((b, m));
                    words += msg.word_count();
                    letters += msg.letter_count();
                    // refs are bucket-ordered, so day transitions are runs
                    if last_bucket != Some(b) {
                        days += 1;
                        last_bucket = Some(b);
                    }
                }

                let averages = SenderAverages {
                    words_per_message: words as f64 / messages as f64,
                    letters_per_message: letters as f64 / messages as f64,
                    messages_per_day: messages as f64 / days as f64,
                    letters_per_day: letters as f64 / days as f64,
                };
                (sender.clone(), averages)
            })
            .collect()
    }

    /// Total whitespace-separated words across sender-attributable messages.
    pub fn word_count(&self) -> usize {
        self.messages()
            .filter(|m| !m.is_system())
            .map(Message::word_count)
            .sum()
    }

    /// Total non-whitespace letters across sender-attributable messages.
    pub fn letter_count(&self) -> usize {
        self.messages()
            .filter(|m| !m.is_system())
            .map(Message::letter_count)
            .sum()
    }

    /// Number of calendar days between the first and last bucket, inclusive
    /// of both ends. 0 for an empty model.
    pub fn span_days(&self) -> i64 {
        match (
            self.buckets.first().and_then(|b| b.naive_date()),
            self.buckets.last().and_then(|b| b.naive_date()),
        ) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        }
    }

    /// Message counts by hour of day, over messages carrying a time.
    pub fn hourly_histogram(&self) -> [usize; 24] {
        let mut hours = [0usize; 24];
        for msg in self.messages() {
            if let Some(time) = msg.timestamp.time {
                use chrono::Timelike;
                hours[time.hour() as usize] += 1;
            }
        }
        hours
    }

    /// Message counts by day of week, Monday first.
    ///
    /// Counts sender-attributable messages in buckets whose written date
    /// components form a valid calendar date; system notices are excluded
    /// like in the other sender statistics.
    pub fn weekday_histogram(&self) -> [usize; 7] {
        let mut days = [0usize; 7];
        for bucket in &self.buckets {
            let Some(date) = bucket.naive_date() else {
                continue;
            };
            use chrono::Datelike;
            let idx = date.weekday().num_days_from_monday() as usize;
            days[idx] += bucket
                .messages()
                .iter()
                .filter(|m| !m.is_system())
                .count();
        }
        days
    }
}

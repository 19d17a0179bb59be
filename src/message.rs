//! Core message types for parsed transcripts.
//!
//! This module provides [`Message`], the normalized representation of one
//! chat entry, plus [`MessageKind`] (content classification) and
//! [`Timestamp`] (calendar date as written in the transcript, with optional
//! time of day).
//!
//! # Overview
//!
//! The parser turns every recognized transcript line into a `Message`:
//!
//! - a normal chat line becomes a [`MessageKind::Text`] message,
//! - rich-content markers (photo, video, file, link, voice note, call,
//!   live talk, sticker) become the corresponding kind with an empty body
//!   unless the transcript embeds a caption,
//! - join/leave/rename notices become [`MessageKind::System`] messages with
//!   no sender-attributable content.
//!
//! # Examples
//!
//! ```
//! use chatstat::{Message, MessageKind, Timestamp};
//!
//! let ts = Timestamp::new(2018, 4, 23, "월");
//! let msg = Message::new("철수", "hey Hey hey", MessageKind::Text, ts);
//!
//! assert_eq!(msg.word_count(), 3);
//! assert_eq!(msg.date_key(), "2018-4-23-월");
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Classification of one chat entry's content.
///
/// Everything that is not plain text and not a system notice counts as
/// *rich content* for tallying purposes (see
/// [`ChatIndex::tally_rich_content`](crate::ChatIndex::tally_rich_content)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text message.
    Text,
    /// Photo marker ("사진" / "Photo").
    Photo,
    /// Video marker ("동영상" / "videos").
    Video,
    /// File attachment ("파일: ..." / "File: ...").
    File,
    /// Plain URL.
    Link,
    /// YouTube URL (matched before [`Link`](MessageKind::Link)).
    YoutubeLink,
    /// Voice note marker ("음성메시지" / "Voice Note").
    VoiceNote,
    /// Voice or video call, possibly with an embedded duration.
    Call,
    /// Live talk session, possibly with an embedded duration.
    LiveTalk,
    /// Sticker / emoticon marker ("이모티콘" / "Emoticons").
    Sticker,
    /// Automated join/leave/rename notice with no human sender.
    System,
}

impl MessageKind {
    /// Returns `true` for kinds counted by rich content tallies.
    ///
    /// Rich content is everything except plain text and system notices.
    pub fn is_rich(self) -> bool {
        !matches!(self, MessageKind::Text | MessageKind::System)
    }

    /// Returns `true` for media kinds (photo, video, file).
    ///
    /// This is the set counted by the media-count day metric.
    pub fn is_media(self) -> bool {
        matches!(
            self,
            MessageKind::Photo | MessageKind::Video | MessageKind::File
        )
    }

    /// Human-readable label, used by the CLI report.
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Photo => "photo",
            MessageKind::Video => "video",
            MessageKind::File => "file",
            MessageKind::Link => "link",
            MessageKind::YoutubeLink => "youtube link",
            MessageKind::VoiceNote => "voice note",
            MessageKind::Call => "call",
            MessageKind::LiveTalk => "live talk",
            MessageKind::Sticker => "sticker",
            MessageKind::System => "system",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar date of a message as written in the transcript.
///
/// The weekday label is stored exactly as the source wrote it (`월`, `Monday`,
/// ...) rather than derived, since the date key format embeds the label in
/// the source locale: `YYYY-M-D-<weekday label>`, e.g. `2018-4-23-월`.
/// Month and day are not zero-padded in the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Calendar year.
    pub year: i32,

    /// Calendar month (1-12), as written.
    pub month: u32,

    /// Day of month (1-31), as written.
    pub day: u32,

    /// Weekday label exactly as it appears in the source transcript.
    pub weekday_label: String,

    /// Time of day, when the message header carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub time: Option<NaiveTime>,
}

impl Timestamp {
    /// Creates a date-only timestamp.
    pub fn new(year: i32, month: u32, day: u32, weekday_label: impl Into<String>) -> Self {
        Self {
            year,
            month,
            day,
            weekday_label: weekday_label.into(),
            time: None,
        }
    }

    /// Builder method to attach a time of day.
    #[must_use]
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Returns the date bucket key for this timestamp.
    ///
    /// Format: `YYYY-M-D-<weekday label>` with no zero padding.
    pub fn date_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.year, self.month, self.day, self.weekday_label
        )
    }
}

/// A normalized chat entry parsed from one transcript.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Display name exactly as written; empty for system notices |
/// | `body` | `String` | Message text, continuation lines joined with `\n` |
/// | `kind` | [`MessageKind`] | Content classification |
/// | `timestamp` | [`Timestamp`] | Date (and optional time) of the entry |
/// | `duration` | `Option<u32>` | Call/live-talk duration in seconds, when embedded |
///
/// `body` is empty for non-text kinds except where the transcript embeds a
/// caption (file names and URLs keep their content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the message author, exactly as it appears in the
    /// transcript. No normalization across aliases. Empty for system notices.
    pub sender: String,

    /// Full text of the message, with continuation lines joined by `\n`.
    pub body: String,

    /// Content classification.
    pub kind: MessageKind,

    /// Date and optional time of day.
    pub timestamp: Timestamp,

    /// Call or live-talk duration in seconds, when the transcript embeds one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        sender: impl Into<String>,
        body: impl Into<String>,
        kind: MessageKind,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            kind,
            timestamp,
            duration: None,
        }
    }

    /// Builder method to set an embedded call duration.
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Returns the date bucket key this message belongs to.
    pub fn date_key(&self) -> String {
        self.timestamp.date_key()
    }

    /// Returns `true` if this is an automated system notice.
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    /// Returns `true` if this message counts toward per-sender statistics.
    ///
    /// System notices carry no sender-attributable content and are excluded.
    pub fn counts_for_sender(&self) -> bool {
        !self.is_system() && !self.sender.is_empty()
    }

    /// Iterates over whitespace-separated tokens of the body.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.body.split_whitespace()
    }

    /// Number of whitespace-separated tokens in the body.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Number of non-whitespace characters in the body.
    ///
    /// Counted per Unicode scalar value, so Hangul syllables count as one
    /// letter each.
    pub fn letter_count(&self) -> usize {
        self.words().map(|w| w.chars().count()).sum()
    }
}

//! Line classifier and transcript parser.
//!
//! The transcript grammar is irregular: dates, senders, and multi-line
//! message bodies are not uniformly delimited, and system/rich-content lines
//! use different shapes than normal chat lines. Rather than ad hoc pattern
//! branching, the parser is a small state machine:
//!
//! - [`State::AwaitingDate`] — before the first date header; metadata lines
//!   are recognized here, everything else is boilerplate.
//! - [`State::AwaitingMessage`] — inside a date bucket, no message pending.
//! - [`State::InMessageBody`] — a message is pending; unrecognized lines are
//!   continuations of its body.
//!
//! Transitions are triggered by line-shape classification (see
//! [`crate::locale`]). Per-line anomalies never abort the parse; they are
//! recorded as [`UnparsedLine`] diagnostics and skipped.

use std::fs;
use std::path::Path;

use crate::config::ParserConfig;
use crate::error::{ChatStatError, Result};
use crate::index::{ChatMeta, DateBucket, UnparsedLine};
use crate::locale::{Locale, Patterns, detect_locale};
use crate::message::{Message, MessageKind};

/// Parser state, advanced once per transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No date header seen yet.
    AwaitingDate,
    /// Inside a date bucket, no message pending.
    AwaitingMessage,
    /// A message is pending; non-header lines extend its body.
    InMessageBody,
}

/// Raw result of one parse pass: ordered date buckets plus diagnostics.
///
/// This is the parser's contract with the index: buckets appear in
/// first-seen order (which equals chronological order for a chronological
/// transcript) and messages preserve original order within each bucket.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Locale the transcript was parsed with.
    pub locale: Locale,
    /// Transcript metadata (title, saved-at), when present.
    pub meta: ChatMeta,
    /// Date buckets in first-seen order.
    pub buckets: Vec<DateBucket>,
    /// Lines that matched no shape and could not be attached anywhere.
    pub unparsed: Vec<UnparsedLine>,
}

/// Parser for KakaoTalk TXT exports.
///
/// # Example
///
/// ```rust
/// use chatstat::parser::TranscriptParser;
///
/// let transcript = "\
/// 2018년 4월 23일 월요일
/// 철수, 오후 3:03 : 안녕하세요";
///
/// let parser = TranscriptParser::new();
/// let output = parser.parse_str(transcript)?;
/// assert_eq!(output.buckets.len(), 1);
/// # Ok::<(), chatstat::ChatStatError>(())
/// ```
pub struct TranscriptParser {
    config: ParserConfig,
}

impl TranscriptParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reads and parses a transcript file.
    ///
    /// The file is opened, fully consumed, and closed before parsing begins.
    /// Fails with [`ChatStatError::Io`] if the file is missing, unreadable,
    /// or not valid UTF-8.
    pub fn parse(&self, path: &Path) -> Result<ParseOutput> {
        let content = fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parses transcript content from a string.
    pub fn parse_str(&self, content: &str) -> Result<ParseOutput> {
        let locale = self.resolve_locale(content)?;
        let patterns = Patterns::compile(locale);

        let mut state = State::AwaitingDate;
        let mut meta = ChatMeta::default();
        let mut buckets: Vec<DateBucket> = Vec::new();
        let mut unparsed: Vec<UnparsedLine> = Vec::new();
        let mut pending: Option<Message> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;

            // Date header: starts a new bucket, produces no message itself.
            if let Some(header) = patterns.date_header(line) {
                flush(&mut pending, &mut buckets);
                buckets.push(DateBucket::new(
                    header.year,
                    header.month,
                    header.day,
                    header.weekday_label,
                ));
                state = State::AwaitingMessage;
                continue;
            }

            // Message header: closes out any prior pending message.
            if let Some(header) = patterns.message_header(line) {
                flush(&mut pending, &mut buckets);
                match buckets.last() {
                    Some(bucket) => {
                        let mut timestamp = bucket.timestamp();
                        timestamp.time = header.time;
                        let classified = patterns.classify(header.content);
                        let mut msg =
                            Message::new(header.sender, classified.body, classified.kind, timestamp);
                        msg.duration = classified.duration;
                        pending = Some(msg);
                        state = State::InMessageBody;
                    }
                    None => {
                        // A message with no date context cannot be bucketed.
                        unparsed.push(UnparsedLine::new(line_no, line));
                    }
                }
                continue;
            }

            // System notice: join/leave/rename, no human sender.
            if !line.trim().is_empty() && patterns.is_system_notice(line) {
                flush(&mut pending, &mut buckets);
                if !self.config.skip_system_messages {
                    match buckets.last_mut() {
                        Some(bucket) => {
                            let timestamp = bucket.timestamp();
                            bucket.push(Message::new(
                                "",
                                line,
                                MessageKind::System,
                                timestamp,
                            ));
                        }
                        None => unparsed.push(UnparsedLine::new(line_no, line)),
                    }
                }
                state = if buckets.is_empty() {
                    State::AwaitingDate
                } else {
                    State::AwaitingMessage
                };
                continue;
            }

            match state {
                State::AwaitingDate => {
                    // File-start boilerplate: metadata headers are kept,
                    // anything else non-blank is a diagnostic.
                    if let Some(title) = patterns.metadata_title(line) {
                        meta.title = Some(title);
                    } else if let Some(saved) = patterns.metadata_saved(line) {
                        meta.date_saved = Some(saved);
                    } else if !line.trim().is_empty() {
                        unparsed.push(UnparsedLine::new(line_no, line));
                    }
                }
                State::InMessageBody => {
                    // Continuation line: appended to the pending body.
                    if let Some(msg) = pending.as_mut() {
                        msg.body.push('\n');
                        msg.body.push_str(line);
                    }
                }
                State::AwaitingMessage => {
                    if !line.trim().is_empty() {
                        unparsed.push(UnparsedLine::new(line_no, line));
                    }
                }
            }
        }

        // End of input flushes the last pending message.
        flush(&mut pending, &mut buckets);

        Ok(ParseOutput {
            locale,
            meta,
            buckets,
            unparsed,
        })
    }

    /// Resolves the transcript locale from config or by auto-detection.
    fn resolve_locale(&self, content: &str) -> Result<Locale> {
        if let Some(locale) = self.config.locale {
            return Ok(locale);
        }

        if content.lines().all(|l| l.trim().is_empty()) {
            // Nothing to detect from; an empty model is still valid.
            return Ok(Locale::Korean);
        }

        let sample: Vec<&str> = content
            .lines()
            .take(self.config.detect_sample_lines)
            .collect();
        detect_locale(&sample).ok_or_else(|| {
            ChatStatError::invalid_format(
                "could not detect transcript locale. \
                 Make sure the file is a valid KakaoTalk chat export.",
            )
        })
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Flushes a pending message into the current date bucket.
fn flush(pending: &mut Option<Message>, buckets: &mut [DateBucket]) {
    if let Some(msg) = pending.take() {
        if let Some(bucket) = buckets.last_mut() {
            bucket.push(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn parse(content: &str) -> ParseOutput {
        TranscriptParser::new().parse_str(content).unwrap()
    }

    #[test]
    fn test_single_message() {
        let out = parse("2018년 4월 23일 월요일\n철수, 오후 3:03 : 안녕하세요");
        assert_eq!(out.locale, Locale::Korean);
        assert_eq!(out.buckets.len(), 1);
        assert_eq!(out.buckets[0].key(), "2018-4-23-월");

        let msg = &out.buckets[0].messages()[0];
        assert_eq!(msg.sender, "철수");
        assert_eq!(msg.body, "안녕하세요");
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.timestamp.time, NaiveTime::from_hms_opt(15, 3, 0));
    }

    #[test]
    fn test_continuation_lines_join_into_one_message() {
        let out = parse(
            "2018년 4월 23일 월요일\n\
             철수, 오후 3:03 : 첫 줄\n\
             둘째 줄\n\
             셋째 줄\n\
             영희, 오후 3:04 : 다음 메시지",
        );
        let msgs = out.buckets[0].messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].body, "첫 줄\n둘째 줄\n셋째 줄");
        assert_eq!(msgs[1].body, "다음 메시지");
    }

    #[test]
    fn test_date_header_produces_no_message() {
        let out = parse("2018년 4월 22일 일요일\n2018년 4월 23일 월요일");
        assert_eq!(out.buckets.len(), 2);
        assert!(out.buckets.iter().all(|b| b.messages().is_empty()));
        assert!(out.unparsed.is_empty());
    }

    #[test]
    fn test_end_of_input_flushes_pending() {
        let out = parse("2018년 4월 23일 월요일\n철수, 오후 3:03 : 마지막\n계속");
        let msgs = out.buckets[0].messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].body, "마지막\n계속");
    }

    #[test]
    fn test_metadata_headers_are_kept() {
        let out = parse(
            "우리 모임 님과 카카오톡 대화\n\
             저장한 날짜 : 2021-05-10 22:31:08\n\
             \n\
             2018년 4월 23일 월요일\n\
             철수, 오후 3:03 : 안녕",
        );
        assert_eq!(out.meta.title.as_deref(), Some("우리 모임"));
        assert!(out.meta.date_saved.is_some());
        assert!(out.unparsed.is_empty());
    }

    #[test]
    fn test_boilerplate_before_any_header_is_diagnostic() {
        let out = parse(
            "random export banner\n\
             2018년 4월 23일 월요일\n\
             철수, 오후 3:03 : 안녕",
        );
        assert_eq!(out.unparsed.len(), 1);
        assert_eq!(out.unparsed[0].line_no, 1);
        assert_eq!(out.unparsed[0].text, "random export banner");
        // the diagnostic did not disturb the rest of the parse
        assert_eq!(out.buckets[0].messages().len(), 1);
    }

    #[test]
    fn test_message_before_date_header_is_diagnostic() {
        let out = parse("철수, 오후 3:03 : 고아 메시지\n2018년 4월 23일 월요일");
        assert_eq!(out.unparsed.len(), 1);
        assert_eq!(out.buckets.len(), 1);
        assert!(out.buckets[0].messages().is_empty());
    }

    #[test]
    fn test_system_notice_becomes_system_message() {
        let out = parse(
            "2018년 4월 23일 월요일\n\
             철수님이 들어왔습니다.\n\
             철수, 오후 3:03 : 안녕",
        );
        let msgs = out.buckets[0].messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].kind, MessageKind::System);
        assert_eq!(msgs[0].sender, "");
        assert_eq!(msgs[1].kind, MessageKind::Text);
    }

    #[test]
    fn test_system_notice_closes_pending_body() {
        let out = parse(
            "2018년 4월 23일 월요일\n\
             철수, 오후 3:03 : 첫 줄\n\
             영희님이 나갔습니다.\n\
             이어지면 안 되는 줄",
        );
        let msgs = out.buckets[0].messages();
        // pending flushed before the notice; the trailing line is a diagnostic
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].body, "첫 줄");
        assert_eq!(out.unparsed.len(), 1);
    }

    #[test]
    fn test_skip_system_messages_config() {
        let parser =
            TranscriptParser::with_config(ParserConfig::new().with_skip_system_messages(true));
        let out = parser
            .parse_str("2018년 4월 23일 월요일\n철수님이 들어왔습니다.")
            .unwrap();
        assert!(out.buckets[0].messages().is_empty());
    }

    #[test]
    fn test_rich_content_classification_in_context() {
        let out = parse(
            "2018년 4월 23일 월요일\n\
             철수, 오후 3:03 : 사진\n\
             영희, 오후 3:04 : https://youtu.be/abc\n\
             철수, 오후 3:05 : 보이스톡 1:23",
        );
        let msgs = out.buckets[0].messages();
        assert_eq!(msgs[0].kind, MessageKind::Photo);
        assert_eq!(msgs[0].body, "");
        assert_eq!(msgs[1].kind, MessageKind::YoutubeLink);
        assert_eq!(msgs[2].kind, MessageKind::Call);
        assert_eq!(msgs[2].duration, Some(83));
    }

    #[test]
    fn test_english_transcript() {
        let out = parse(
            "Monday, April 23, 2018\n\
             Alice, 3:03 PM : hey there\n\
             Bob, 3:04 PM : Photo",
        );
        assert_eq!(out.locale, Locale::English);
        assert_eq!(out.buckets[0].key(), "2018-4-23-Monday");
        let msgs = out.buckets[0].messages();
        assert_eq!(msgs[0].sender, "Alice");
        assert_eq!(msgs[1].kind, MessageKind::Photo);
    }

    #[test]
    fn test_empty_input_builds_empty_model() {
        let out = parse("");
        assert!(out.buckets.is_empty());
        assert!(out.unparsed.is_empty());
    }

    #[test]
    fn test_unrecognizable_input_is_invalid_format() {
        let err = TranscriptParser::new()
            .parse_str("this is not a transcript\nat all")
            .unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_locale_override_skips_detection() {
        let parser = TranscriptParser::with_config(
            ParserConfig::new().with_locale(Locale::Korean),
        );
        // would fail auto-detection, but parses as all-unparsed Korean
        let out = parser.parse_str("nothing matches here").unwrap();
        assert!(out.buckets.is_empty());
        assert_eq!(out.unparsed.len(), 1);
    }

    #[test]
    fn test_crlf_lines() {
        let out = parse("2018년 4월 23일 월요일\r\n철수, 오후 3:03 : 안녕\r\n");
        assert_eq!(out.buckets[0].messages()[0].body, "안녕");
    }
}

//! Locale-specific line shapes for KakaoTalk exports.
//!
//! KakaoTalk exports vary by the device locale at export time. This module
//! contains the per-locale patterns for the three header shapes (date header,
//! message header, metadata header), the system-notice indicators, and the
//! rich-content classification, plus format auto-detection by scoring sample
//! lines.
//!
//! Supported locales:
//! - Korean: `2018년 4월 23일 월요일` date tags, `철수, 오후 3:03 : 안녕` messages
//! - English: `Monday, April 23, 2018` date tags, `Alice, 3:03 PM : hey` messages

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::message::MessageKind;

/// Export locale of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Korean-locale export.
    Korean,
    /// English-locale export.
    English,
}

impl Locale {
    /// Returns the regex pattern for this locale's date header.
    ///
    /// Some export versions pad the date tag with dashes; the pattern
    /// tolerates them.
    pub fn date_header_pattern(self) -> &'static str {
        match self {
            // 2018년 4월 23일 월요일
            Locale::Korean => r"^-*\s*(\d{4})년 (\d{1,2})월 (\d{1,2})일 ([^\s-]+)요일\s*-*$",
            // Monday, April 23, 2018
            Locale::English => r"^-*\s*([A-Za-z]+), ([A-Za-z]+) (\d{1,2}), (\d{4})\s*-*$",
        }
    }

    /// Returns the regex pattern for this locale's message header.
    ///
    /// The sender capture is greedy, so a sender name containing the
    /// delimiter sequence splits at the *last* occurrence of the time
    /// marker. Sender names precede the marker and are less likely to
    /// contain the exact time-format token.
    pub fn message_pattern(self) -> &'static str {
        match self {
            // 철수, 오후 3:03 : 안녕하세요
            Locale::Korean => r"^(.+), (오전|오후) (\d{1,2}):(\d{2}) : (.*)$",
            // Alice, 3:03 PM : hey
            Locale::English => r"^(.+), (\d{1,2}):(\d{2}) ([AP])M : (.*)$",
        }
    }

    /// Returns all supported locales.
    pub fn all() -> &'static [Locale] {
        &[Locale::Korean, Locale::English]
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Korean => f.write_str("Korean"),
            Locale::English => f.write_str("English"),
        }
    }
}

/// A parsed date header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateHeader {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday_label: String,
}

/// A parsed message header line, borrowed from the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MessageHeader<'a> {
    pub sender: &'a str,
    pub time: Option<NaiveTime>,
    pub content: &'a str,
}

/// Result of classifying a message header's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Classified {
    pub kind: MessageKind,
    /// Body to store: empty for marker-only rich content, the original
    /// content for text, captions, file names, and URLs.
    pub body: String,
    /// Embedded call/live-talk duration in seconds, when present.
    pub duration: Option<u32>,
}

/// Compiled line-shape patterns for one locale.
pub(crate) struct Patterns {
    locale: Locale,
    date_header: Regex,
    message: Regex,
    meta_title: Regex,
    meta_saved: Regex,
    duration_tail: Regex,
    photo: Regex,
}

impl Patterns {
    /// Compiles the pattern set for the given locale.
    ///
    /// The patterns are static and known-valid, so compilation cannot fail.
    pub fn compile(locale: Locale) -> Self {
        let (meta_title, meta_saved) = match locale {
            Locale::Korean => (
                r"^(.{1,50}) 님과 카카오톡 대화$",
                r"^저장한 날짜 : (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})$",
            ),
            Locale::English => (
                r"^(.{1,50}) with KakaoTalk Chats$",
                r"^Date Saved ?: (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})$",
            ),
        };
        let photo = match locale {
            // 사진, or bundled: 사진 5장
            Locale::Korean => r"^사진(?: \d+장)?$",
            Locale::English => r"^Photo$",
        };
        Self {
            locale,
            date_header: Regex::new(locale.date_header_pattern()).unwrap(),
            message: Regex::new(locale.message_pattern()).unwrap(),
            meta_title: Regex::new(meta_title).unwrap(),
            meta_saved: Regex::new(meta_saved).unwrap(),
            // mm:ss or hh:mm:ss at the end of a call marker
            duration_tail: Regex::new(r"(?:(\d+):)?(\d{1,2}):(\d{2})\s*$").unwrap(),
            photo: Regex::new(photo).unwrap(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Parses a date header line, if the line has that shape.
    pub fn date_header(&self, line: &str) -> Option<DateHeader> {
        let caps = self.date_header.captures(line)?;
        match self.locale {
            Locale::Korean => Some(DateHeader {
                year: caps[1].parse().ok()?,
                month: caps[2].parse().ok()?,
                day: caps[3].parse().ok()?,
                weekday_label: caps[4].to_string(),
            }),
            Locale::English => {
                // Month arrives as a name; chrono resolves it.
                let date = NaiveDate::parse_from_str(
                    &format!("{} {}, {}", &caps[2], &caps[3], &caps[4]),
                    "%B %d, %Y",
                )
                .ok()?;
                use chrono::Datelike;
                Some(DateHeader {
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                    weekday_label: caps[1].to_string(),
                })
            }
        }
    }

    /// Parses a message header line, if the line has that shape.
    pub fn message_header<'a>(&self, line: &'a str) -> Option<MessageHeader<'a>> {
        let caps = self.message.captures(line)?;
        let (sender, time, content) = match self.locale {
            Locale::Korean => {
                let pm = &caps[2] == "오후";
                let hour: u32 = caps[3].parse().ok()?;
                let minute: u32 = caps[4].parse().ok()?;
                (
                    caps.get(1)?.as_str(),
                    twelve_hour_time(hour, minute, pm),
                    caps.get(5)?.as_str(),
                )
            }
            Locale::English => {
                let hour: u32 = caps[2].parse().ok()?;
                let minute: u32 = caps[3].parse().ok()?;
                let pm = &caps[4] == "P";
                (
                    caps.get(1)?.as_str(),
                    twelve_hour_time(hour, minute, pm),
                    caps.get(5)?.as_str(),
                )
            }
        };
        Some(MessageHeader {
            sender,
            time,
            content,
        })
    }

    /// Parses a metadata title line ("{title} 님과 카카오톡 대화").
    pub fn metadata_title(&self, line: &str) -> Option<String> {
        self.meta_title
            .captures(line)
            .map(|caps| caps[1].to_string())
    }

    /// Parses a metadata saved-date line ("저장한 날짜 : ...").
    pub fn metadata_saved(&self, line: &str) -> Option<NaiveDateTime> {
        let caps = self.meta_saved.captures(line)?;
        NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%d %H:%M:%S").ok()
    }

    /// Checks whether a line is an automated system notice
    /// (join/leave/invite/rename).
    pub fn is_system_notice(&self, line: &str) -> bool {
        let indicators: &[&str] = match self.locale {
            Locale::Korean => &[
                "님이 들어왔습니다.",
                "님이 나갔습니다.",
                "님을 초대하였습니다.",
                "님을 초대했습니다.",
                "님을 내보냈습니다.",
                "채팅방 이름을",
            ],
            Locale::English => &[
                " invited ",
                " left.",
                " joined this chatroom",
                "changed the chatroom name",
            ],
        };
        let line = line.trim_end();
        indicators.iter().any(|ind| line.contains(ind))
    }

    /// Classifies a message header's content into a [`MessageKind`].
    ///
    /// Marker-only rich content gets an empty body; file names and URLs keep
    /// their content since it is meaningful on its own.
    pub fn classify(&self, content: &str) -> Classified {
        let content = content.trim_end();

        if self.photo.is_match(content) {
            return Classified::marker(MessageKind::Photo);
        }

        match self.locale {
            Locale::Korean => {
                if content == "동영상" {
                    return Classified::marker(MessageKind::Video);
                }
                if content == "이모티콘" {
                    return Classified::marker(MessageKind::Sticker);
                }
                if content == "음성메시지" {
                    return Classified::marker(MessageKind::VoiceNote);
                }
                if let Some(rest) = strip_any_prefix(content, &["보이스톡", "페이스톡", "그룹통화"])
                {
                    return Classified::call(MessageKind::Call, self.duration_of(rest));
                }
                if let Some(rest) = content.strip_prefix("라이브톡") {
                    return Classified::call(MessageKind::LiveTalk, self.duration_of(rest));
                }
                if content.starts_with("파일: ") {
                    return Classified::with_body(MessageKind::File, content);
                }
            }
            Locale::English => {
                if content == "videos" {
                    return Classified::marker(MessageKind::Video);
                }
                if content == "Emoticons" {
                    return Classified::marker(MessageKind::Sticker);
                }
                if content == "Voice Note" {
                    return Classified::marker(MessageKind::VoiceNote);
                }
                if let Some(rest) = strip_any_prefix(content, &["Voice Call", "Video Call"]) {
                    return Classified::call(MessageKind::Call, self.duration_of(rest));
                }
                if let Some(rest) = content.strip_prefix("Live Talk ended") {
                    return Classified::call(MessageKind::LiveTalk, self.duration_of(rest));
                }
                if content.starts_with("File: ") {
                    return Classified::with_body(MessageKind::File, content);
                }
            }
        }

        if content.starts_with("http://")
            || content.starts_with("https://")
            || content.starts_with("www.")
        {
            let kind = if content.contains("youtu") {
                MessageKind::YoutubeLink
            } else {
                MessageKind::Link
            };
            return Classified::with_body(kind, content);
        }

        Classified::with_body(MessageKind::Text, content)
    }

    /// Extracts a trailing `mm:ss` or `hh:mm:ss` duration in seconds.
    fn duration_of(&self, tail: &str) -> Option<u32> {
        let caps = self.duration_tail.captures(tail)?;
        let hours: u32 = caps
            .get(1)
            .map_or(Some(0), |h| h.as_str().parse().ok())?;
        let minutes: u32 = caps[2].parse().ok()?;
        let seconds: u32 = caps[3].parse().ok()?;
        Some(hours * 3600 + minutes * 60 + seconds)
    }
}

impl Classified {
    fn marker(kind: MessageKind) -> Self {
        Self {
            kind,
            body: String::new(),
            duration: None,
        }
    }

    fn with_body(kind: MessageKind, body: &str) -> Self {
        Self {
            kind,
            body: body.to_string(),
            duration: None,
        }
    }

    fn call(kind: MessageKind, duration: Option<u32>) -> Self {
        Self {
            kind,
            body: String::new(),
            duration,
        }
    }
}

/// Converts a 12-hour clock reading into a [`NaiveTime`].
fn twelve_hour_time(hour: u32, minute: u32, pm: bool) -> Option<NaiveTime> {
    let hour24 = (hour % 12) + if pm { 12 } else { 0 };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// Strips the first matching prefix, returning the remainder.
fn strip_any_prefix<'a>(content: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| content.strip_prefix(p))
}

/// Auto-detects the transcript locale by scoring sample lines.
///
/// Each locale's date-header, message-header, and metadata patterns are run
/// over the provided lines; the locale with the most matches wins. Returns
/// `None` if no pattern matches any line.
pub fn detect_locale(lines: &[&str]) -> Option<Locale> {
    let detectors: Vec<Patterns> = Locale::all().iter().map(|&l| Patterns::compile(l)).collect();

    let mut scores = vec![0usize; detectors.len()];

    for line in lines {
        for (i, patterns) in detectors.iter().enumerate() {
            if patterns.date_header.is_match(line)
                || patterns.message.is_match(line)
                || patterns.meta_title.is_match(line)
            {
                scores[i] += 1;
            }
        }
    }

    let max_score = *scores.iter().max()?;
    if max_score == 0 {
        return None;
    }

    let winner_idx = scores.iter().position(|&s| s == max_score)?;
    Some(detectors[winner_idx].locale)
}

//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`LocaleArg`] - locale override values
//! - [`TopMetric`] - day-ranking metric values
//!
//! The binary consumes query results only (numbers, mappings, sequences);
//! rendering of charts is out of scope.

use clap::{Parser, ValueEnum};

use crate::locale::Locale;
use crate::query::DayMetric;

/// Compute chatroom statistics from a KakaoTalk chat export.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatstat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatstat KakaoTalkChats.txt
    chatstat chat.txt --word hey --word Hey
    chatstat chat.txt --word 안녕 --sender 철수
    chatstat chat.txt --date 2018-4-23-월
    chatstat chat.txt --top media")]
pub struct Args {
    /// Path to the exported transcript file
    pub input: String,

    /// Transcript locale (auto-detected when omitted)
    #[arg(long, value_enum)]
    pub locale: Option<LocaleArg>,

    /// Count occurrences of this word form (repeatable; case-sensitive)
    #[arg(short = 'w', long = "word", value_name = "WORD")]
    pub words: Vec<String>,

    /// Restrict counts to this sender (repeatable)
    #[arg(short = 's', long = "sender", value_name = "NAME")]
    pub senders: Vec<String>,

    /// Print the messages recorded under this date key (YYYY-M-D-<weekday>)
    #[arg(long, value_name = "KEY")]
    pub date: Option<String>,

    /// Rank days by this metric
    #[arg(long, value_enum)]
    pub top: Option<TopMetric>,

    /// Emit the full report as JSON instead of text
    #[cfg(feature = "json-output")]
    #[arg(long)]
    pub json: bool,
}

/// Locale override values for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocaleArg {
    /// Korean-locale export
    #[value(alias = "ko")]
    Korean,
    /// English-locale export
    #[value(alias = "en")]
    English,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Korean => Locale::Korean,
            LocaleArg::English => Locale::English,
        }
    }
}

/// Day-ranking metrics exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopMetric {
    /// Sender-attributable message count
    Messages,
    /// Photo, video, and file count
    Media,
    /// Sticker count
    Stickers,
}

impl From<TopMetric> for DayMetric {
    fn from(metric: TopMetric) -> Self {
        match metric {
            TopMetric::Messages => DayMetric::MessageCount,
            TopMetric::Media => DayMetric::MediaCount,
            TopMetric::Stickers => DayMetric::StickerCount,
        }
    }
}

//! Configuration types for transcript parsing.
//!
//! This module provides [`ParserConfig`] for library usage, without any CLI
//! framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatstat::config::ParserConfig;
//! use chatstat::locale::Locale;
//!
//! let config = ParserConfig::new()
//!     .with_locale(Locale::Korean)
//!     .with_skip_system_messages(true);
//! ```

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Configuration for transcript parsing.
///
/// KakaoTalk exports vary by locale. By default the parser auto-detects the
/// locale by analyzing the first lines of the file; set an explicit locale
/// to skip detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Explicit transcript locale. `None` means auto-detect (default).
    pub locale: Option<Locale>,

    /// Number of leading lines sampled for locale detection (default: 20).
    pub detect_sample_lines: usize,

    /// Drop system notices (join/leave/rename) entirely instead of keeping
    /// them as `System` messages (default: false, since content tallies
    /// account for them).
    pub skip_system_messages: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            locale: None,
            detect_sample_lines: 20,
            skip_system_messages: false,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit locale, disabling auto-detection.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Sets the number of lines sampled for locale detection.
    #[must_use]
    pub fn with_detect_sample_lines(mut self, lines: usize) -> Self {
        self.detect_sample_lines = lines;
        self
    }

    /// Sets whether to drop system notices.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }
}

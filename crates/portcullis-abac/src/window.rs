//! Time-of-day availability windows.
//!
//! A window is written `HH:MM-HH:MM` and is inclusive on both ends. The
//! sentinel `00:00-23:59` means the resource is always available and the
//! time gate is skipped entirely.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// The always-available sentinel window.
pub const ALWAYS_AVAILABLE: &str = "00:00-23:59";

const TIME_FORMAT: &str = "%H:%M";

/// How a window whose start is later than its end is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OvernightWindows {
    /// The window wraps past midnight: `22:00-02:00` covers 22:00 through 02:00.
    #[default]
    Wrap,
    /// The window is a configuration error.
    Reject,
}

/// A parsed availability window.
///
/// Keeps the original `start`/`end` text so denial reasons can quote the
/// catalog exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
    start_label: String,
    end_label: String,
}

impl TimeWindow {
    /// Parses `HH:MM-HH:MM`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MalformedWindow`] unless the input is exactly two
    /// `HH:MM` times separated by a single `-`;
    /// [`ConfigurationError::OvernightWindow`] when `start > end` and
    /// `overnight` is [`OvernightWindows::Reject`].
    pub fn parse(raw: &str, overnight: OvernightWindows) -> Result<Self> {
        let malformed = || ConfigurationError::MalformedWindow {
            window: raw.to_string(),
        };

        let mut parts = raw.split('-');
        let (Some(start_label), Some(end_label), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let parse = |label: &str| {
            if !is_two_digit_time(label) {
                return Err(malformed());
            }
            NaiveTime::parse_from_str(label, TIME_FORMAT).map_err(|_| malformed())
        };
        let start = parse(start_label)?;
        let end = parse(end_label)?;

        if start > end && overnight == OvernightWindows::Reject {
            return Err(ConfigurationError::OvernightWindow {
                window: raw.to_string(),
            });
        }

        Ok(Self {
            start,
            end,
            start_label: start_label.to_string(),
            end_label: end_label.to_string(),
        })
    }

    /// Returns true for the `00:00-23:59` sentinel.
    pub fn is_always_available(&self) -> bool {
        self.start == NaiveTime::MIN && self.end == sentinel_end()
    }

    /// Returns true if the window wraps past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Returns true if `now` falls inside the window (both ends inclusive).
    ///
    /// `now` keeps its seconds: with an end of `18:00`, `18:00:00` is inside
    /// and `18:00:01` is not.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.crosses_midnight() {
            now >= self.start || now <= self.end
        } else {
            self.start <= now && now <= self.end
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The start time as written in the catalog.
    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    /// The end time as written in the catalog.
    pub fn end_label(&self) -> &str {
        &self.end_label
    }
}

/// Exactly `DD:DD`; chrono alone also accepts `9:00` and padding whitespace.
fn is_two_digit_time(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}

fn sentinel_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

// ============================================================================
// Tests
// ============================================================================

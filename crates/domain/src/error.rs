// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, Time};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Promotion title is empty or invalid.
    InvalidTitle(String),
    /// Only one of the two date bounds is set.
    PartialDateWindow {
        /// The bound that is present (`valid_from` or `valid_to`).
        present: &'static str,
    },
    /// The date window is inverted.
    InvalidDateWindow {
        /// The first valid date.
        from: Date,
        /// The last valid date.
        to: Date,
    },
    /// Only one of the two time-of-day bounds is set.
    PartialTimeWindow {
        /// The bound that is present (`start_time` or `end_time`).
        present: &'static str,
    },
    /// The time-of-day window is inverted. Windows crossing midnight are
    /// not supported and must be rejected here, never silently wrapped.
    InvalidTimeWindow {
        /// The window start time.
        start: Time,
        /// The window end time.
        end: Time,
    },
    /// Weekday index outside 0 (Sunday) through 6 (Saturday).
    InvalidWeekday(u8),
    /// Failed to parse a calendar date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a time of day from a string.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::PartialDateWindow { present } => {
                write!(
                    f,
                    "Date window requires both valid_from and valid_to, but only {present} is set"
                )
            }
            Self::InvalidDateWindow { from, to } => {
                write!(f, "Date window is inverted: valid_from {from} is after valid_to {to}")
            }
            Self::PartialTimeWindow { present } => {
                write!(
                    f,
                    "Time window requires both start_time and end_time, but only {present} is set"
                )
            }
            Self::InvalidTimeWindow { start, end } => {
                write!(
                    f,
                    "Time window is inverted: start_time {start} is after end_time {end} (windows may not cross midnight)"
                )
            }
            Self::InvalidWeekday(index) => {
                write!(
                    f,
                    "Invalid weekday index: {index}. Must be between 0 (Sunday) and 6 (Saturday)"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

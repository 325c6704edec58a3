// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::rule_set::PromotionRuleSet;
use time::macros::format_description;
use time::{Date, Time};

/// Validates the shape of a rule-set before it is stored.
///
/// The evaluator itself is total and tolerates malformed shapes by
/// treating them as unconstrained; this boundary check is where genuinely
/// malformed configurations are rejected so they never reach the store.
///
/// # Errors
///
/// Returns an error if:
/// - The title is empty
/// - Only one of `valid_from` / `valid_to` is set
/// - The date window is inverted (`valid_from` after `valid_to`)
/// - Only one of `start_time` / `end_time` is set
/// - The time window is inverted (`start_time` after `end_time`)
pub fn validate_rule_set(rule: &PromotionRuleSet) -> Result<(), DomainError> {
    // Rule: title must not be empty (it names conflicts in admission errors)
    if rule.title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    // Rule: date bounds come in pairs
    match (rule.valid_from, rule.valid_to) {
        (Some(from), Some(to)) => {
            if from > to {
                return Err(DomainError::InvalidDateWindow { from, to });
            }
        }
        (Some(_), None) => {
            return Err(DomainError::PartialDateWindow {
                present: "valid_from",
            });
        }
        (None, Some(_)) => {
            return Err(DomainError::PartialDateWindow {
                present: "valid_to",
            });
        }
        (None, None) => {}
    }

    // Rule: time bounds come in pairs, and the window may not cross midnight
    match (rule.start_time, rule.end_time) {
        (Some(start), Some(end)) => {
            if start > end {
                return Err(DomainError::InvalidTimeWindow { start, end });
            }
        }
        (Some(_), None) => {
            return Err(DomainError::PartialTimeWindow {
                present: "start_time",
            });
        }
        (None, Some(_)) => {
            return Err(DomainError::PartialTimeWindow {
                present: "end_time",
            });
        }
        (None, None) => {}
    }

    Ok(())
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn parse_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(
        date_string,
        format_description!("[year]-[month]-[day]"),
    )
    .map_err(|err| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: err.to_string(),
    })
}

/// Parses a minute-resolution time of day (`HH:MM`).
///
/// # Errors
///
/// Returns an error if the string is not a valid time of day.
pub fn parse_time(time_string: &str) -> Result<Time, DomainError> {
    Time::parse(time_string, format_description!("[hour]:[minute]")).map_err(|err| {
        DomainError::TimeParseError {
            time_string: time_string.to_string(),
            error: err.to_string(),
        }
    })
}

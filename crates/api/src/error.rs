// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use taproom::{AdmissionError, CoreError};
use taproom_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Admission rejections keep their structured payload (code,
/// cap, conflicting titles) so the admin UI can present the operator a
/// choice of which promotion to deactivate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The mutation was rejected by an admission cap.
    AdmissionDenied {
        /// The caller-facing error code
        /// (`PRIORITY_LIMIT` or `ACTIVE_OVERLAP_LIMIT`).
        code: String,
        /// The cap that was hit.
        cap: usize,
        /// Titles of the currently-eligible conflicting promotions.
        conflicting_titles: Vec<String>,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::AdmissionDenied {
                code,
                cap,
                conflicting_titles,
            } => {
                write!(
                    f,
                    "Admission denied ({code}): cap of {cap} reached by {}",
                    conflicting_titles.join(", ")
                )
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::PartialDateWindow { present } => ApiError::DomainRuleViolation {
            rule: String::from("paired_date_bounds"),
            message: format!(
                "Date window requires both valid_from and valid_to, but only {present} is set"
            ),
        },
        DomainError::InvalidDateWindow { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("date_window_order"),
            message: format!("valid_from {from} is after valid_to {to}"),
        },
        DomainError::PartialTimeWindow { present } => ApiError::DomainRuleViolation {
            rule: String::from("paired_time_bounds"),
            message: format!(
                "Time window requires both start_time and end_time, but only {present} is set"
            ),
        },
        DomainError::InvalidTimeWindow { start, end } => ApiError::DomainRuleViolation {
            rule: String::from("time_window_order"),
            message: format!(
                "start_time {start} is after end_time {end}; windows may not cross midnight"
            ),
        },
        DomainError::InvalidWeekday(index) => ApiError::InvalidInput {
            field: String::from("days_of_week"),
            message: format!("Invalid weekday index: {index}. Must be between 0 and 6"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::TimeParseError { time_string, error } => ApiError::InvalidInput {
            field: String::from("time"),
            message: format!("Failed to parse time '{time_string}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AdmissionDenied(admission_err) => {
            let code: String = String::from(admission_err.code());
            let cap: usize = admission_err.cap();
            let conflicting_titles: Vec<String> = match admission_err {
                AdmissionError::PriorityLimit {
                    conflicting_titles, ..
                }
                | AdmissionError::ActiveOverlapLimit {
                    conflicting_titles, ..
                } => conflicting_titles,
            };
            ApiError::AdmissionDenied {
                code,
                cap,
                conflicting_titles,
            }
        }
    }
}

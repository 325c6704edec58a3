// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use taproom_domain::DomainError;

/// Expected, recoverable rejections from the admission check.
///
/// These are outcomes callers branch on, not control-flow exceptions:
/// the operator is expected to deactivate one of the named conflicting
/// promotions and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The mutation would push the count of concurrently-eligible
    /// priority promotions above the cap.
    PriorityLimit {
        /// The configured priority cap.
        cap: usize,
        /// Titles of the currently-eligible priority promotions.
        conflicting_titles: Vec<String>,
    },
    /// The mutation would push the count of concurrently-eligible
    /// promotions of any kind above the optional broader cap.
    ActiveOverlapLimit {
        /// The configured concurrent-activation cap.
        cap: usize,
        /// Titles of the currently-eligible promotions.
        conflicting_titles: Vec<String>,
    },
}

impl AdmissionError {
    /// The caller-facing error code for this rejection.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PriorityLimit { .. } => "PRIORITY_LIMIT",
            Self::ActiveOverlapLimit { .. } => "ACTIVE_OVERLAP_LIMIT",
        }
    }

    /// The cap that was hit.
    #[must_use]
    pub const fn cap(&self) -> usize {
        match self {
            Self::PriorityLimit { cap, .. } | Self::ActiveOverlapLimit { cap, .. } => *cap,
        }
    }

    /// Titles of the promotions blocking this mutation, for operator
    /// display. Any of them is an equally valid blocker; there is no
    /// ranking among them.
    #[must_use]
    pub fn conflicting_titles(&self) -> &[String] {
        match self {
            Self::PriorityLimit {
                conflicting_titles, ..
            }
            | Self::ActiveOverlapLimit {
                conflicting_titles, ..
            } => conflicting_titles,
        }
    }
}

impl std::fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriorityLimit {
                cap,
                conflicting_titles,
            } => {
                write!(
                    f,
                    "Priority promotion cap of {cap} reached; currently eligible: {}",
                    conflicting_titles.join(", ")
                )
            }
            Self::ActiveOverlapLimit {
                cap,
                conflicting_titles,
            } => {
                write!(
                    f,
                    "Concurrent promotion cap of {cap} reached; currently eligible: {}",
                    conflicting_titles.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for AdmissionError {}

/// Errors that can occur while deciding a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The hypothetical rule-set is malformed.
    DomainViolation(DomainError),
    /// The mutation was rejected by a cap.
    AdmissionDenied(AdmissionError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::AdmissionDenied(err) => write!(f, "Admission denied: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<AdmissionError> for CoreError {
    fn from(err: AdmissionError) -> Self {
        Self::AdmissionDenied(err)
    }
}

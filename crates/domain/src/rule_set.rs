// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Time, Weekday};

/// The canonical numeric identifier of a promotion, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromotionId(i64);

impl PromotionId {
    /// Creates a promotion identifier from its numeric value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric value of this identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PromotionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A set of weekdays a promotion is restricted to.
///
/// Indices follow the storefront convention: 0 = Sunday through
/// 6 = Saturday. An empty set means the promotion runs every day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekdaySet(Vec<Weekday>);

impl WeekdaySet {
    /// Creates an empty set (no weekday restriction).
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a set from 0-based weekday indices (0 = Sunday).
    ///
    /// Duplicate indices are collapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is greater than 6.
    pub fn from_indices(indices: &[u8]) -> Result<Self, DomainError> {
        let mut days: Vec<Weekday> = Vec::with_capacity(indices.len());
        for index in indices {
            let day: Weekday = weekday_from_index(*index)?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        Ok(Self(days))
    }

    /// Checks whether the given weekday is in the set.
    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    /// Returns `true` if no weekday restriction is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the 0-based weekday indices in this set (0 = Sunday).
    #[must_use]
    pub fn indices(&self) -> Vec<u8> {
        self.0
            .iter()
            .map(|day| day.number_days_from_sunday())
            .collect()
    }
}

/// Converts a 0-based index (0 = Sunday) into a weekday.
const fn weekday_from_index(index: u8) -> Result<Weekday, DomainError> {
    match index {
        0 => Ok(Weekday::Sunday),
        1 => Ok(Weekday::Monday),
        2 => Ok(Weekday::Tuesday),
        3 => Ok(Weekday::Wednesday),
        4 => Ok(Weekday::Thursday),
        5 => Ok(Weekday::Friday),
        6 => Ok(Weekday::Saturday),
        _ => Err(DomainError::InvalidWeekday(index)),
    }
}

/// The rule configuration attached to a promotion.
///
/// This is the entity the eligibility engine operates on. The display
/// payload (`title`, `description`, `image_ref`) is opaque to the engine;
/// the remaining fields drive the evaluation in [`crate::evaluate`].
///
/// Each constraint dimension (dates, times, weekdays) is independently
/// optional. An absent dimension always matches; it never blocks
/// eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRuleSet {
    /// The canonical identifier assigned by the store.
    /// `None` indicates the promotion has not been persisted yet.
    pub promotion_id: Option<PromotionId>,
    /// Display title, also used to name conflicts in admission errors.
    pub title: String,
    /// Display description. Opaque to the engine.
    pub description: String,
    /// Reference to a stored banner image. Opaque to the engine.
    pub image_ref: Option<String>,
    /// Master switch. An inactive promotion is never eligible.
    pub is_active: bool,
    /// Marks the promotion as competing for the capped priority slots.
    pub is_priority: bool,
    /// First calendar date the promotion is valid (inclusive).
    pub valid_from: Option<Date>,
    /// Last calendar date the promotion is valid (inclusive).
    pub valid_to: Option<Date>,
    /// Daily window start time (inclusive).
    pub start_time: Option<Time>,
    /// Daily window end time (inclusive).
    pub end_time: Option<Time>,
    /// Weekdays the promotion runs on. Empty means every day.
    pub days_of_week: WeekdaySet,
}

impl PromotionRuleSet {
    /// Creates a new unpersisted rule-set with the operator default
    /// configuration: active, non-priority, no constraints.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            promotion_id: None,
            title: title.to_string(),
            description: String::new(),
            image_ref: None,
            is_active: true,
            is_priority: false,
            valid_from: None,
            valid_to: None,
            start_time: None,
            end_time: None,
            days_of_week: WeekdaySet::empty(),
        }
    }

    /// Returns a copy of this rule-set carrying the given store identifier.
    #[must_use]
    pub fn with_id(mut self, id: PromotionId) -> Self {
        self.promotion_id = Some(id);
        self
    }
}

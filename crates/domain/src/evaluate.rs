// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Eligibility evaluation for promotion rule-sets.
//!
//! This module classifies a promotion as "eligible now" against its
//! optional date-range, time-of-day, and day-of-week constraints.
//!
//! ## Invariants
//!
//! - The evaluation is a pure function of `(rule, at)`: no I/O, no hidden
//!   state, identical inputs always produce identical results.
//! - `is_active = false` dominates every other field.
//! - An absent constraint dimension always matches (wildcard).
//! - All bounds are inclusive on both ends.
//! - A time window with `start_time > end_time` never matches. Windows
//!   crossing midnight are rejected at input validation, not wrapped.
//! - Malformed shapes (a single date or time bound) are treated as
//!   "dimension absent"; the evaluator never fails on input shape.
//!
//! ## Usage
//!
//! This logic is used by:
//! - The public storefront (to decide which banners to show)
//! - The admission controller (to compute the currently-eligible set and
//!   to test hypothetical rule-sets before a mutation is allowed)

use crate::instant::LocalInstant;
use crate::rule_set::PromotionRuleSet;
use time::{Date, Time};

/// The constraint dimension that rejected a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The master switch is off.
    Inactive,
    /// The instant's date is outside `valid_from..=valid_to`.
    DateWindow,
    /// The instant's clock is outside `start_time..=end_time`.
    TimeWindow,
    /// The instant's weekday is not in `days_of_week`.
    DayOfWeek,
}

impl Constraint {
    /// Converts this constraint to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::DateWindow => "date_window",
            Self::TimeWindow => "time_window",
            Self::DayOfWeek => "day_of_week",
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of evaluating one rule-set at one instant.
///
/// Not persisted. The rejecting constraint is reported for operator
/// diagnostics and is not required for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Whether the promotion should currently be shown.
    pub eligible: bool,
    /// The first constraint that rejected, if any.
    pub rejected_by: Option<Constraint>,
}

impl EvaluationResult {
    /// An eligible outcome.
    #[must_use]
    pub const fn eligible() -> Self {
        Self {
            eligible: true,
            rejected_by: None,
        }
    }

    /// A rejection by the given constraint.
    #[must_use]
    pub const fn rejected(constraint: Constraint) -> Self {
        Self {
            eligible: false,
            rejected_by: Some(constraint),
        }
    }
}

/// Evaluates a rule-set at an instant.
///
/// Checks are AND'ed and short-circuit in a fixed order: active flag,
/// date window, time window, day of week. The first failing dimension is
/// reported in the result.
#[must_use]
pub fn evaluate(rule: &PromotionRuleSet, at: LocalInstant) -> EvaluationResult {
    if !rule.is_active {
        return EvaluationResult::rejected(Constraint::Inactive);
    }

    // Both bounds are required for the dimension to constrain; a single
    // bound is treated as unconstrained (see validate_rule_set).
    if let (Some(from), Some(to)) = (rule.valid_from, rule.valid_to) {
        let today: Date = at.date();
        if today < from || today > to {
            return EvaluationResult::rejected(Constraint::DateWindow);
        }
    }

    // An inverted window (start > end) can never satisfy both comparisons,
    // so it never matches without needing a dedicated branch.
    if let (Some(start), Some(end)) = (rule.start_time, rule.end_time) {
        let clock: Time = at.clock();
        if clock < start || clock > end {
            return EvaluationResult::rejected(Constraint::TimeWindow);
        }
    }

    if !rule.days_of_week.is_empty() && !rule.days_of_week.contains(at.weekday()) {
        return EvaluationResult::rejected(Constraint::DayOfWeek);
    }

    EvaluationResult::eligible()
}

/// Convenience wrapper over [`evaluate`] returning only the boolean.
#[must_use]
pub fn is_eligible(rule: &PromotionRuleSet, at: LocalInstant) -> bool {
    evaluate(rule, at).eligible
}

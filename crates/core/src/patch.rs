// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use taproom_domain::{PromotionRuleSet, WeekdaySet};
use time::{Date, Time};

/// A partial update to a promotion rule-set, expressed as data.
///
/// `None` at the outer level means "leave the field unchanged". For the
/// window bounds a second `Option` distinguishes setting a bound
/// (`Some(Some(_))`) from clearing it (`Some(None)`), so an operator can
/// remove a constraint without rewriting the whole rule-set.
///
/// Patches are the only way mutations enter the admission check: the
/// check materializes the hypothetical rule-set the store would hold
/// after the patch and decides on that, never on the raw request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromotionPatch {
    /// New display title.
    pub title: Option<String>,
    /// New display description.
    pub description: Option<String>,
    /// New banner image reference, or `Some(None)` to remove it.
    pub image_ref: Option<Option<String>>,
    /// New master-switch value.
    pub is_active: Option<bool>,
    /// New priority flag.
    pub is_priority: Option<bool>,
    /// New first valid date, or `Some(None)` to clear the bound.
    pub valid_from: Option<Option<Date>>,
    /// New last valid date, or `Some(None)` to clear the bound.
    pub valid_to: Option<Option<Date>>,
    /// New window start time, or `Some(None)` to clear the bound.
    pub start_time: Option<Option<Time>>,
    /// New window end time, or `Some(None)` to clear the bound.
    pub end_time: Option<Option<Time>>,
    /// New weekday restriction. An empty set clears the restriction.
    pub days_of_week: Option<WeekdaySet>,
}

impl PromotionPatch {
    /// Materializes the rule-set the store would hold after applying
    /// this patch to `base`. The base is not modified.
    #[must_use]
    pub fn apply_to(&self, base: &PromotionRuleSet) -> PromotionRuleSet {
        let mut merged: PromotionRuleSet = base.clone();

        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(image_ref) = &self.image_ref {
            merged.image_ref = image_ref.clone();
        }
        if let Some(is_active) = self.is_active {
            merged.is_active = is_active;
        }
        if let Some(is_priority) = self.is_priority {
            merged.is_priority = is_priority;
        }
        if let Some(valid_from) = self.valid_from {
            merged.valid_from = valid_from;
        }
        if let Some(valid_to) = self.valid_to {
            merged.valid_to = valid_to;
        }
        if let Some(start_time) = self.start_time {
            merged.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            merged.end_time = end_time;
        }
        if let Some(days_of_week) = &self.days_of_week {
            merged.days_of_week = days_of_week.clone();
        }

        merged
    }
}

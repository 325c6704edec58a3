// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission control over the promotion collection.
//!
//! The functions here answer "what is eligible right now?" and gate
//! mutations that could violate the priority-overlap invariant: at most
//! `priority_cap` promotions flagged priority may be eligible at the same
//! instant. The cap is a concurrent-visibility constraint, not a blanket
//! limit on how many promotions may carry the flag — a priority promotion
//! whose window does not include "now" can always be flagged or
//! activated, because it cannot cause overlap today.
//!
//! Everything in this module is pure over an immutable snapshot of the
//! collection. Loading the snapshot and persisting an admitted mutation
//! belong to the callers; a rejected mutation therefore never leaves a
//! partial write behind.

use crate::error::{AdmissionError, CoreError};
use crate::patch::PromotionPatch;
use taproom_domain::{LocalInstant, PromotionRuleSet, is_eligible, validate_rule_set};

/// The caps the admission check enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    /// Maximum number of concurrently-eligible priority promotions.
    pub priority_cap: usize,
    /// Optional broader cap on concurrently-eligible promotions of any
    /// kind. `None` disables the check.
    pub active_cap: Option<usize>,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            priority_cap: 2,
            active_cap: None,
        }
    }
}

/// Returns the subset of the collection that is eligible at `at`.
///
/// The collection is expected to hold every rule-set, active and
/// inactive; filtering happens here via the evaluator, not in the query
/// that loaded the snapshot.
#[must_use]
pub fn eligible_now<'a>(
    rules: &'a [PromotionRuleSet],
    at: LocalInstant,
) -> Vec<&'a PromotionRuleSet> {
    rules.iter().filter(|rule| is_eligible(rule, at)).collect()
}

/// Counts the currently-eligible promotions flagged priority.
#[must_use]
pub fn count_priority_eligible(rules: &[PromotionRuleSet], at: LocalInstant) -> usize {
    rules
        .iter()
        .filter(|rule| rule.is_priority && is_eligible(rule, at))
        .count()
}

/// Whether `candidate` is a different promotion than `hypothetical`.
///
/// Unpersisted rule-sets carry no identifier and never alias a stored
/// row, so they always count as "other".
fn is_other(candidate: &PromotionRuleSet, hypothetical: &PromotionRuleSet) -> bool {
    match (candidate.promotion_id, hypothetical.promotion_id) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

/// Checks whether a hypothetical rule-set may enter the collection.
///
/// The hypothetical is the state the target row would have after the
/// proposed mutation. The existing rows are counted with their stored
/// rules, excluding the target row itself.
///
/// # Errors
///
/// Returns an error if admitting the hypothetical would exceed the
/// priority cap, or the optional concurrent-activation cap when one is
/// configured. The error carries the titles of every currently-eligible
/// blocker so the operator can choose which to deactivate.
pub fn check_admission(
    existing: &[PromotionRuleSet],
    hypothetical: &PromotionRuleSet,
    policy: &AdmissionPolicy,
    at: LocalInstant,
) -> Result<(), AdmissionError> {
    // If the hypothetical is not eligible now, no overlap can occur:
    // allow unconditionally.
    if !is_eligible(hypothetical, at) {
        return Ok(());
    }

    if hypothetical.is_priority {
        let conflicting_titles: Vec<String> = existing
            .iter()
            .filter(|rule| {
                is_other(rule, hypothetical) && rule.is_priority && is_eligible(rule, at)
            })
            .map(|rule| rule.title.clone())
            .collect();

        if conflicting_titles.len() >= policy.priority_cap {
            return Err(AdmissionError::PriorityLimit {
                cap: policy.priority_cap,
                conflicting_titles,
            });
        }
    }

    if let Some(active_cap) = policy.active_cap {
        let conflicting_titles: Vec<String> = existing
            .iter()
            .filter(|rule| is_other(rule, hypothetical) && is_eligible(rule, at))
            .map(|rule| rule.title.clone())
            .collect();

        if conflicting_titles.len() >= active_cap {
            return Err(AdmissionError::ActiveOverlapLimit {
                cap: active_cap,
                conflicting_titles,
            });
        }
    }

    Ok(())
}

/// Decides a proposed mutation against the target rule-set.
///
/// Materializes the hypothetical (`patch` over `target`), validates its
/// shape, runs the admission check against the rest of the collection,
/// and returns the merged rule-set for the caller to persist. Nothing is
/// written here; on rejection the target's stored state is untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The merged rule-set fails boundary validation
/// - The mutation would exceed a configured cap
pub fn admit(
    existing: &[PromotionRuleSet],
    target: &PromotionRuleSet,
    patch: &PromotionPatch,
    policy: &AdmissionPolicy,
    at: LocalInstant,
) -> Result<PromotionRuleSet, CoreError> {
    let hypothetical: PromotionRuleSet = patch.apply_to(target);

    validate_rule_set(&hypothetical)?;
    check_admission(existing, &hypothetical, policy, at)?;

    Ok(hypothetical)
}

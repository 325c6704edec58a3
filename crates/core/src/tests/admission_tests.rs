// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{monday_noon, priority_promo, promo};
use crate::{
    AdmissionError, AdmissionPolicy, CoreError, PromotionPatch, admit, check_admission,
    count_priority_eligible, eligible_now,
};
use taproom_domain::{DomainError, LocalInstant, PromotionRuleSet, WeekdaySet};
use time::macros::time;

#[test]
fn test_eligible_now_filters_through_evaluator() {
    let mut off: PromotionRuleSet = promo(1, "Switched Off");
    off.is_active = false;
    let on: PromotionRuleSet = promo(2, "Switched On");

    let rules: Vec<PromotionRuleSet> = vec![off, on];
    let eligible: Vec<&PromotionRuleSet> = eligible_now(&rules, monday_noon());

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].title, "Switched On");
}

#[test]
fn test_eligible_now_is_idempotent() {
    let rules: Vec<PromotionRuleSet> = vec![promo(1, "A"), priority_promo(2, "B")];
    let at: LocalInstant = monday_noon();

    let first: Vec<&PromotionRuleSet> = eligible_now(&rules, at);
    let second: Vec<&PromotionRuleSet> = eligible_now(&rules, at);

    assert_eq!(first, second);
}

#[test]
fn test_count_priority_eligible_ignores_non_priority() {
    let rules: Vec<PromotionRuleSet> = vec![
        promo(1, "Plain"),
        priority_promo(2, "First"),
        priority_promo(3, "Second"),
    ];

    assert_eq!(count_priority_eligible(&rules, monday_noon()), 2);
}

#[test]
fn test_count_priority_eligible_ignores_ineligible_priority() {
    let mut dormant: PromotionRuleSet = priority_promo(2, "Dormant");
    dormant.is_active = false;

    let rules: Vec<PromotionRuleSet> = vec![priority_promo(1, "Live"), dormant];

    assert_eq!(count_priority_eligible(&rules, monday_noon()), 1);
}

#[test]
fn test_activation_allowed_with_no_eligible_priority_promotions() {
    let existing: Vec<PromotionRuleSet> = vec![promo(1, "Plain")];
    let target: PromotionRuleSet = priority_promo(2, "Newcomer");
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_activation_rejected_at_cap_reports_both_blockers() {
    let existing: Vec<PromotionRuleSet> = vec![
        priority_promo(1, "First"),
        priority_promo(2, "Second"),
        promo(3, "Plain"),
    ];
    let target: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = priority_promo(4, "Third");
        rule.is_active = false;
        rule
    };
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    let err: CoreError = result.unwrap_err();
    let CoreError::AdmissionDenied(AdmissionError::PriorityLimit {
        cap,
        conflicting_titles,
    }) = err
    else {
        panic!("expected PriorityLimit, got {err:?}");
    };
    assert_eq!(cap, 2);
    assert_eq!(conflicting_titles, vec!["First", "Second"]);
}

#[test]
fn test_priority_flag_flip_is_gated_like_activation() {
    let existing: Vec<PromotionRuleSet> =
        vec![priority_promo(1, "First"), priority_promo(2, "Second")];
    // Already active, merely flipping the flag.
    let target: PromotionRuleSet = promo(3, "Aspirant");
    let patch: PromotionPatch = PromotionPatch {
        is_priority: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(matches!(
        result,
        Err(CoreError::AdmissionDenied(AdmissionError::PriorityLimit { .. }))
    ));
}

#[test]
fn test_ineligible_hypothetical_is_admitted_unconditionally() {
    let existing: Vec<PromotionRuleSet> =
        vec![priority_promo(1, "First"), priority_promo(2, "Second")];
    // Priority, but its daily window does not include noon.
    let mut target: PromotionRuleSet = priority_promo(3, "Early Bird");
    target.start_time = Some(time!(06:00));
    target.end_time = Some(time!(09:00));
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_target_row_is_excluded_from_its_own_count() {
    // Two eligible priority promotions; re-saving one of them must not
    // count itself as a blocker.
    let existing: Vec<PromotionRuleSet> =
        vec![priority_promo(1, "First"), priority_promo(2, "Second")];
    let target: PromotionRuleSet = existing[0].clone();
    let patch: PromotionPatch = PromotionPatch {
        description: Some(String::from("refreshed copy")),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_blockers_counted_by_stored_rules_not_hypothetical() {
    // The second blocker is only eligible evenings by its stored rules;
    // at noon it is not a blocker even though it is priority-flagged.
    let mut evening: PromotionRuleSet = priority_promo(2, "Evenings Only");
    evening.start_time = Some(time!(18:00));
    evening.end_time = Some(time!(22:00));
    let existing: Vec<PromotionRuleSet> = vec![priority_promo(1, "First"), evening];

    let target: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = priority_promo(3, "Third");
        rule.is_active = false;
        rule
    };
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_unpersisted_hypothetical_counts_every_stored_row() {
    let existing: Vec<PromotionRuleSet> =
        vec![priority_promo(1, "First"), priority_promo(2, "Second")];
    // A brand-new promotion, no id yet.
    let candidate: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = PromotionRuleSet::new("Fresh");
        rule.is_priority = true;
        rule
    };

    let result = check_admission(
        &existing,
        &candidate,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(matches!(
        result,
        Err(AdmissionError::PriorityLimit { .. })
    ));
}

#[test]
fn test_admit_validates_merged_shape() {
    let existing: Vec<PromotionRuleSet> = Vec::new();
    let target: PromotionRuleSet = promo(1, "Broken Window");
    let patch: PromotionPatch = PromotionPatch {
        start_time: Some(Some(time!(22:00))),
        end_time: Some(Some(time!(02:00))),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidTimeWindow { .. }
        ))
    ));
}

#[test]
fn test_active_cap_disabled_by_default() {
    let existing: Vec<PromotionRuleSet> = vec![
        promo(1, "A"),
        promo(2, "B"),
        promo(3, "C"),
        promo(4, "D"),
    ];
    let target: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = promo(5, "E");
        rule.is_active = false;
        rule
    };
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(
        &existing,
        &target,
        &patch,
        &AdmissionPolicy::default(),
        monday_noon(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_active_cap_rejects_any_kind_of_promotion() {
    let policy: AdmissionPolicy = AdmissionPolicy {
        priority_cap: 2,
        active_cap: Some(3),
    };
    let existing: Vec<PromotionRuleSet> =
        vec![promo(1, "A"), promo(2, "B"), priority_promo(3, "C")];
    let target: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = promo(4, "D");
        rule.is_active = false;
        rule
    };
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };

    let result = admit(&existing, &target, &patch, &policy, monday_noon());

    let err: CoreError = result.unwrap_err();
    let CoreError::AdmissionDenied(AdmissionError::ActiveOverlapLimit {
        cap,
        conflicting_titles,
    }) = err
    else {
        panic!("expected ActiveOverlapLimit, got {err:?}");
    };
    assert_eq!(cap, 3);
    assert_eq!(conflicting_titles, vec!["A", "B", "C"]);
}

#[test]
fn test_admission_error_codes() {
    let priority: AdmissionError = AdmissionError::PriorityLimit {
        cap: 2,
        conflicting_titles: Vec::new(),
    };
    let overlap: AdmissionError = AdmissionError::ActiveOverlapLimit {
        cap: 5,
        conflicting_titles: Vec::new(),
    };

    assert_eq!(priority.code(), "PRIORITY_LIMIT");
    assert_eq!(overlap.code(), "ACTIVE_OVERLAP_LIMIT");
}

// The end-to-end scenario: A (always on), B (today only), C (one minute
// past midnight), all priority, evaluated at noon; then a fourth
// always-on priority promotion D.
#[test]
fn test_priority_cap_scenario_at_noon() {
    let at: LocalInstant = monday_noon();

    let a: PromotionRuleSet = priority_promo(1, "A");

    let mut b: PromotionRuleSet = priority_promo(2, "B");
    b.days_of_week = WeekdaySet::from_indices(&[1]).unwrap(); // Monday

    let mut c: PromotionRuleSet = priority_promo(3, "C");
    c.start_time = Some(time!(00:00));
    c.end_time = Some(time!(00:01));

    let existing: Vec<PromotionRuleSet> = vec![a, b, c.clone()];

    // Eligible priority set at noon is {A, B}: C's window closed at 00:01.
    assert_eq!(count_priority_eligible(&existing, at), 2);

    // Re-activating C now succeeds despite 2 already eligible, because C
    // itself is not eligible at noon.
    let patch: PromotionPatch = PromotionPatch {
        is_active: Some(true),
        ..PromotionPatch::default()
    };
    assert!(admit(&existing, &c, &patch, &AdmissionPolicy::default(), at).is_ok());

    // A fourth always-on priority promotion is rejected, reporting A and B.
    let d: PromotionRuleSet = {
        let mut rule: PromotionRuleSet = priority_promo(4, "D");
        rule.is_active = false;
        rule
    };
    let result = admit(&existing, &d, &patch, &AdmissionPolicy::default(), at);

    let CoreError::AdmissionDenied(AdmissionError::PriorityLimit {
        conflicting_titles, ..
    }) = result.unwrap_err()
    else {
        panic!("expected PriorityLimit");
    };
    assert_eq!(conflicting_titles, vec!["A", "B"]);
}

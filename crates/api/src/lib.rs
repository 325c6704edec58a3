// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Taproom promotion engine.
//!
//! This crate translates caller-facing requests into domain types, runs
//! the admission flow, and translates domain/core errors into the API
//! error contract. Every function here is pure over an immutable snapshot
//! of the promotion collection; persisting an admitted mutation is the
//! server's job, which is what guarantees a rejected mutation never
//! partially applies.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;

use serde::{Deserialize, Deserializer, Serialize};
use taproom::{AdmissionPolicy, PromotionPatch, admit};
use taproom_domain::{
    LocalInstant, PromotionId, PromotionRuleSet, WeekdaySet, parse_date, parse_time,
};
use time::{Date, Time};

pub use error::{ApiError, translate_core_error, translate_domain_error};

/// Deserializes a field that distinguishes "absent" from "null".
///
/// Plain `Option<Option<T>>` collapses `null` to the outer `None`; this
/// adapter keeps `null` as `Some(None)` so PATCH bodies can clear a bound
/// explicitly. Combine with `#[serde(default)]` for the absent case.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// API request to create a new promotion.
///
/// This DTO is distinct from domain types and represents the API
/// contract. Dates are ISO 8601 (`YYYY-MM-DD`); times are minute-level
/// (`HH:MM`); weekdays are 0 (Sunday) through 6 (Saturday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePromotionRequest {
    /// Display title.
    pub title: String,
    /// Display description.
    #[serde(default)]
    pub description: Option<String>,
    /// Reference to a stored banner image.
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Master switch. Defaults to active.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Priority flag. Defaults to off.
    #[serde(default)]
    pub is_priority: Option<bool>,
    /// First valid date (inclusive).
    #[serde(default)]
    pub valid_from: Option<String>,
    /// Last valid date (inclusive).
    #[serde(default)]
    pub valid_to: Option<String>,
    /// Daily window start time (inclusive).
    #[serde(default)]
    pub start_time: Option<String>,
    /// Daily window end time (inclusive).
    #[serde(default)]
    pub end_time: Option<String>,
    /// Weekday restriction; absent or empty means every day.
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
}

/// API request for a partial update to a promotion.
///
/// Absent fields are left unchanged. For the window bounds an explicit
/// `null` clears the bound, which is how an operator removes a constraint
/// without rewriting the whole rule-set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdatePromotionRequest {
    /// New display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New banner image reference, or `null` to remove it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<Option<String>>,
    /// New master-switch value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// New priority flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_priority: Option<bool>,
    /// New first valid date, or `null` to clear the bound.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_from: Option<Option<String>>,
    /// New last valid date, or `null` to clear the bound.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_to: Option<Option<String>>,
    /// New window start time, or `null` to clear the bound.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<Option<String>>,
    /// New window end time, or `null` to clear the bound.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<Option<String>>,
    /// New weekday restriction. An empty list clears the restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
}

/// A promotion rule-set as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionResponse {
    /// The store identifier. Absent only for never-persisted rule-sets.
    pub id: Option<i64>,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Reference to a stored banner image.
    pub image_ref: Option<String>,
    /// Master switch.
    pub is_active: bool,
    /// Priority flag.
    pub is_priority: bool,
    /// First valid date (inclusive), ISO 8601.
    pub valid_from: Option<String>,
    /// Last valid date (inclusive), ISO 8601.
    pub valid_to: Option<String>,
    /// Daily window start time (inclusive), `HH:MM`.
    pub start_time: Option<String>,
    /// Daily window end time (inclusive), `HH:MM`.
    pub end_time: Option<String>,
    /// Weekday restriction indices, 0 = Sunday. Empty means every day.
    pub days_of_week: Vec<u8>,
}

/// API response listing every stored promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPromotionsResponse {
    /// All stored promotions, active and inactive.
    pub promotions: Vec<PromotionResponse>,
}

/// API response listing the currently-eligible promotions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligiblePromotionsResponse {
    /// The instant the evaluation ran at.
    pub evaluated_at: String,
    /// The eligible subset.
    pub promotions: Vec<PromotionResponse>,
}

/// API response carrying the priority-eligible count for UI badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCountResponse {
    /// The instant the evaluation ran at.
    pub evaluated_at: String,
    /// How many priority promotions are eligible now.
    pub count: usize,
    /// The configured cap.
    pub cap: usize,
}

/// Converts a rule-set into its caller-facing representation.
#[must_use]
pub fn promotion_to_response(rule: &PromotionRuleSet) -> PromotionResponse {
    PromotionResponse {
        id: rule.promotion_id.map(PromotionId::value),
        title: rule.title.clone(),
        description: rule.description.clone(),
        image_ref: rule.image_ref.clone(),
        is_active: rule.is_active,
        is_priority: rule.is_priority,
        valid_from: rule.valid_from.map(|date| date.to_string()),
        valid_to: rule.valid_to.map(|date| date.to_string()),
        start_time: rule.start_time.map(format_clock),
        end_time: rule.end_time.map(format_clock),
        days_of_week: rule.days_of_week.indices(),
    }
}

/// Formats a time of day at minute resolution.
fn format_clock(clock: Time) -> String {
    format!("{:02}:{:02}", clock.hour(), clock.minute())
}

/// Lists every stored promotion for the admin UI.
///
/// This is a read-only operation; no eligibility filtering is applied.
#[must_use]
pub fn list_promotions(rules: &[PromotionRuleSet]) -> ListPromotionsResponse {
    ListPromotionsResponse {
        promotions: rules.iter().map(promotion_to_response).collect(),
    }
}

/// Lists the promotions eligible at `at`.
///
/// Used by the public storefront to decide which banners to show and by
/// the admin UI to preview the effect of pending changes. Loading all
/// rule-sets and filtering via the evaluator (rather than in the query)
/// is deliberate; the store stays a dumb keyed collection.
#[must_use]
pub fn list_eligible_now(
    rules: &[PromotionRuleSet],
    at: LocalInstant,
) -> EligiblePromotionsResponse {
    EligiblePromotionsResponse {
        evaluated_at: at.to_string(),
        promotions: taproom::eligible_now(rules, at)
            .into_iter()
            .map(promotion_to_response)
            .collect(),
    }
}

/// Counts the currently-eligible priority promotions.
#[must_use]
pub fn priority_count(
    rules: &[PromotionRuleSet],
    policy: &AdmissionPolicy,
    at: LocalInstant,
) -> PriorityCountResponse {
    PriorityCountResponse {
        evaluated_at: at.to_string(),
        count: taproom::count_priority_eligible(rules, at),
        cap: policy.priority_cap,
    }
}

/// Builds and admits a new promotion rule-set.
///
/// The returned rule-set is admitted but not yet persisted; the caller
/// inserts it into the store, which assigns the identifier.
///
/// # Errors
///
/// Returns an error if:
/// - Any date, time, or weekday field fails to parse
/// - The rule-set fails boundary validation
/// - Admitting it would exceed a configured cap
pub fn create_promotion(
    rules: &[PromotionRuleSet],
    request: CreatePromotionRequest,
    policy: &AdmissionPolicy,
    at: LocalInstant,
) -> Result<PromotionRuleSet, ApiError> {
    let mut candidate: PromotionRuleSet = PromotionRuleSet::new(&request.title);

    if let Some(description) = request.description {
        candidate.description = description;
    }
    candidate.image_ref = request.image_ref;
    candidate.is_active = request.is_active.unwrap_or(true);
    candidate.is_priority = request.is_priority.unwrap_or(false);
    candidate.valid_from = parse_optional_date(request.valid_from.as_deref())?;
    candidate.valid_to = parse_optional_date(request.valid_to.as_deref())?;
    candidate.start_time = parse_optional_time(request.start_time.as_deref())?;
    candidate.end_time = parse_optional_time(request.end_time.as_deref())?;
    if let Some(indices) = request.days_of_week {
        candidate.days_of_week =
            WeekdaySet::from_indices(&indices).map_err(translate_domain_error)?;
    }

    // An empty patch over the candidate reuses the validate-then-check
    // admission flow unchanged.
    admit(rules, &candidate, &PromotionPatch::default(), policy, at)
        .map_err(translate_core_error)
}

/// Decides a partial update against the stored target rule-set.
///
/// This is the gatekeeping operation: it materializes the hypothetical
/// rule-set the store would hold after the update and admits or rejects
/// it as of `at`. The returned rule-set is admitted but not yet
/// persisted; the caller saves it, so a rejection leaves the stored
/// state untouched byte for byte.
///
/// # Errors
///
/// Returns an error if:
/// - The target promotion does not exist in the snapshot
/// - Any date, time, or weekday field fails to parse
/// - The merged rule-set fails boundary validation
/// - The update would exceed a configured cap
pub fn attempt_activate(
    rules: &[PromotionRuleSet],
    id: PromotionId,
    request: UpdatePromotionRequest,
    policy: &AdmissionPolicy,
    at: LocalInstant,
) -> Result<PromotionRuleSet, ApiError> {
    let target: &PromotionRuleSet = rules
        .iter()
        .find(|rule| rule.promotion_id == Some(id))
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Promotion"),
            message: format!("Promotion {id} does not exist"),
        })?;

    let patch: PromotionPatch = build_patch(request)?;

    admit(rules, target, &patch, policy, at).map_err(translate_core_error)
}

/// Translates an update request into a core patch, parsing date and time
/// strings at the boundary.
fn build_patch(request: UpdatePromotionRequest) -> Result<PromotionPatch, ApiError> {
    let days_of_week: Option<WeekdaySet> = match request.days_of_week {
        Some(indices) => {
            Some(WeekdaySet::from_indices(&indices).map_err(translate_domain_error)?)
        }
        None => None,
    };

    Ok(PromotionPatch {
        title: request.title,
        description: request.description,
        image_ref: request.image_ref,
        is_active: request.is_active,
        is_priority: request.is_priority,
        valid_from: parse_date_edit(request.valid_from)?,
        valid_to: parse_date_edit(request.valid_to)?,
        start_time: parse_time_edit(request.start_time)?,
        end_time: parse_time_edit(request.end_time)?,
        days_of_week,
    })
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(|raw| parse_date(raw).map_err(translate_domain_error))
        .transpose()
}

fn parse_optional_time(value: Option<&str>) -> Result<Option<Time>, ApiError> {
    value
        .map(|raw| parse_time(raw).map_err(translate_domain_error))
        .transpose()
}

fn parse_date_edit(value: Option<Option<String>>) -> Result<Option<Option<Date>>, ApiError> {
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(raw)) => Ok(Some(Some(
            parse_date(&raw).map_err(translate_domain_error)?,
        ))),
    }
}

fn parse_time_edit(value: Option<Option<String>>) -> Result<Option<Option<Time>>, ApiError> {
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(raw)) => Ok(Some(Some(
            parse_time(&raw).map_err(translate_domain_error)?,
        ))),
    }
}

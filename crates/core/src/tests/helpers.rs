// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use taproom_domain::{LocalInstant, PromotionId, PromotionRuleSet};
use time::macros::{date, time};

/// A stored rule-set: active, non-priority, unconstrained.
pub fn promo(id: i64, title: &str) -> PromotionRuleSet {
    PromotionRuleSet::new(title).with_id(PromotionId::new(id))
}

/// A stored rule-set flagged priority.
pub fn priority_promo(id: i64, title: &str) -> PromotionRuleSet {
    let mut rule: PromotionRuleSet = promo(id, title);
    rule.is_priority = true;
    rule
}

/// Noon on Monday 2024-01-15, the reference instant for these tests.
pub fn monday_noon() -> LocalInstant {
    LocalInstant::new(date!(2024 - 01 - 15), time!(12:00))
}

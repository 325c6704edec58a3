// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Promotion store collaborator.
//!
//! The engine treats the store as a simple keyed collection of rule-sets
//! and never issues raw queries. This crate defines that contract plus an
//! in-memory reference implementation used by the server and by tests.
//! Durability and cross-process atomicity belong to whatever real backend
//! a deployment substitutes behind [`PromotionStore`].
//!
//! Store failures propagate unchanged: a failed read must never be
//! treated as "zero eligible promotions".

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

use taproom_domain::{PromotionId, PromotionRuleSet};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by the store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No promotion exists under the given identifier.
    #[error("Promotion {0} not found")]
    NotFound(PromotionId),
    /// The backend could not be reached.
    #[error("Promotion store unavailable: {0}")]
    Unavailable(String),
}

/// The keyed-collection contract the engine consumes.
pub trait PromotionStore {
    /// Loads every stored rule-set, active and inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn load_all(&self) -> Result<Vec<PromotionRuleSet>, StoreError>;

    /// Loads a single rule-set by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion does not exist or the backend
    /// is unavailable.
    fn load_one(&self, id: PromotionId) -> Result<PromotionRuleSet, StoreError>;

    /// Persists a new rule-set, assigning its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable.
    fn insert(&mut self, rule_set: PromotionRuleSet) -> Result<PromotionRuleSet, StoreError>;

    /// Replaces the stored rule-set under `id` with the given one.
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion does not exist or the backend
    /// is unavailable.
    fn save(
        &mut self,
        id: PromotionId,
        rule_set: PromotionRuleSet,
    ) -> Result<PromotionRuleSet, StoreError>;

    /// Removes the rule-set under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion does not exist or the backend
    /// is unavailable.
    fn delete(&mut self, id: PromotionId) -> Result<(), StoreError>;
}

/// In-memory keyed collection with monotonic identifier assignment.
#[derive(Debug)]
pub struct MemoryStore {
    /// Stored rule-sets in insertion order.
    rows: Vec<PromotionRuleSet>,
    /// The next identifier to hand out.
    next_id: i64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    fn position(&self, id: PromotionId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.promotion_id == Some(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PromotionStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<PromotionRuleSet>, StoreError> {
        Ok(self.rows.clone())
    }

    fn load_one(&self, id: PromotionId) -> Result<PromotionRuleSet, StoreError> {
        self.rows
            .iter()
            .find(|row| row.promotion_id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn insert(&mut self, rule_set: PromotionRuleSet) -> Result<PromotionRuleSet, StoreError> {
        let id: PromotionId = PromotionId::new(self.next_id);
        self.next_id += 1;

        let persisted: PromotionRuleSet = rule_set.with_id(id);
        self.rows.push(persisted.clone());
        debug!(promotion_id = %id, title = %persisted.title, "Inserted promotion");

        Ok(persisted)
    }

    fn save(
        &mut self,
        id: PromotionId,
        rule_set: PromotionRuleSet,
    ) -> Result<PromotionRuleSet, StoreError> {
        let index: usize = self.position(id).ok_or(StoreError::NotFound(id))?;

        // The stored identifier is authoritative; the incoming rule-set
        // cannot reassign it.
        let persisted: PromotionRuleSet = rule_set.with_id(id);
        if let Some(row) = self.rows.get_mut(index) {
            *row = persisted.clone();
        }
        debug!(promotion_id = %id, "Saved promotion");

        Ok(persisted)
    }

    fn delete(&mut self, id: PromotionId) -> Result<(), StoreError> {
        let index: usize = self.position(id).ok_or(StoreError::NotFound(id))?;
        self.rows.remove(index);
        debug!(promotion_id = %id, "Deleted promotion");

        Ok(())
    }
}

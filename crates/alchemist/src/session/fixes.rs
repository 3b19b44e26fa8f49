//! Request tokens for AI fix suggestions.
//!
//! A suggestion is only ever recorded or applied against the cell state it
//! was requested for. Replacing a table bumps that table's generation and
//! editing a cell bumps the cell's generation; a token minted before either
//! change is stale and its suggestion is dropped.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AlchemistError, Result};
use crate::schema::EntityKind;

/// Identifies one fix request and the cell state it was issued against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixToken {
    pub id: u64,
    pub entity: EntityKind,
    pub row: usize,
    pub column: String,
    pub table_generation: u64,
    pub cell_generation: u64,
}

impl FixToken {
    fn cell(&self) -> CellKey {
        (self.entity, self.row, self.column.clone())
    }

    fn stale_error(&self) -> AlchemistError {
        AlchemistError::StaleFix {
            entity: self.entity.to_string(),
            row: self.row,
            column: self.column.clone(),
        }
    }
}

/// Outcome of completing a fix request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixStatus {
    /// Suggestion stored and ready to apply.
    Recorded,
    /// The cell changed since the request; suggestion discarded.
    Stale,
    /// The gateway produced nothing.
    Unavailable,
}

/// A suggestion waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFix {
    pub token: FixToken,
    pub suggestion: String,
}

type CellKey = (EntityKind, usize, String);

/// Generation counters and pending suggestions.
#[derive(Debug, Clone, Default)]
pub struct FixTracker {
    next_id: u64,
    table_generations: HashMap<EntityKind, u64>,
    cell_generations: HashMap<CellKey, u64>,
    pending: IndexMap<CellKey, PendingFix>,
}

impl FixTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn table_generation(&self, entity: EntityKind) -> u64 {
        self.table_generations.get(&entity).copied().unwrap_or(0)
    }

    fn cell_generation(&self, key: &CellKey) -> u64 {
        self.cell_generations.get(key).copied().unwrap_or(0)
    }

    /// Mint a token for the cell's current state.
    pub fn issue(&mut self, entity: EntityKind, row: usize, column: &str) -> FixToken {
        self.next_id += 1;
        let key = (entity, row, column.to_string());
        FixToken {
            id: self.next_id,
            entity,
            row,
            column: column.to_string(),
            table_generation: self.table_generation(entity),
            cell_generation: self.cell_generation(&key),
        }
    }

    /// Whether the token still describes the cell as it is now.
    pub fn is_current(&self, token: &FixToken) -> bool {
        token.id <= self.next_id
            && token.table_generation == self.table_generation(token.entity)
            && token.cell_generation == self.cell_generation(&token.cell())
    }

    /// Record the gateway's answer for a token.
    ///
    /// A response for an older request never replaces a newer pending one
    /// for the same cell.
    pub fn complete(&mut self, token: FixToken, suggestion: Option<String>) -> FixStatus {
        if !self.is_current(&token) {
            tracing::info!(
                entity = %token.entity,
                row = token.row,
                column = %token.column,
                "discarding stale fix suggestion"
            );
            return FixStatus::Stale;
        }

        let key = token.cell();
        if self.pending.get(&key).is_some_and(|p| p.token.id > token.id) {
            return FixStatus::Stale;
        }

        match suggestion {
            Some(suggestion) => {
                self.pending.insert(key, PendingFix { token, suggestion });
                FixStatus::Recorded
            }
            None => FixStatus::Unavailable,
        }
    }

    /// Take the pending suggestion for `token`, failing if it is stale or
    /// was never recorded.
    pub fn take(&mut self, token: &FixToken) -> Result<String> {
        let key = token.cell();
        let recorded = self.pending.get(&key).is_some_and(|p| p.token == *token);
        if !recorded || !self.is_current(token) {
            return Err(token.stale_error());
        }
        self.pending
            .shift_remove(&key)
            .map(|p| p.suggestion)
            .ok_or_else(|| token.stale_error())
    }

    /// Pending suggestions that can still be applied.
    pub fn pending(&self) -> impl Iterator<Item = &PendingFix> {
        self.pending.values().filter(|p| self.is_current(&p.token))
    }

    /// Note an edit to one cell.
    pub fn cell_changed(&mut self, entity: EntityKind, row: usize, column: &str) {
        *self
            .cell_generations
            .entry((entity, row, column.to_string()))
            .or_insert(0) += 1;
        self.prune();
    }

    /// Note a wholesale replacement of one table.
    pub fn table_replaced(&mut self, entity: EntityKind) {
        *self.table_generations.entry(entity).or_insert(0) += 1;
        self.cell_generations.retain(|(kind, _, _), _| *kind != entity);
        self.prune();
    }

    fn prune(&mut self) {
        let stale: Vec<CellKey> = self
            .pending
            .iter()
            .filter(|(_, p)| !self.is_current(&p.token))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            self.pending.shift_remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_take() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Tasks, 3, "Duration");
        assert_eq!(tracker.complete(token.clone(), Some("2".into())), FixStatus::Recorded);
        assert_eq!(tracker.pending().count(), 1);
        assert_eq!(tracker.take(&token).unwrap(), "2");
        assert!(tracker.take(&token).is_err());
    }

    #[test]
    fn test_edit_makes_token_stale() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Tasks, 3, "Duration");
        tracker.cell_changed(EntityKind::Tasks, 3, "Duration");
        assert_eq!(tracker.complete(token, Some("2".into())), FixStatus::Stale);
        assert_eq!(tracker.pending().count(), 0);
    }

    #[test]
    fn test_edit_elsewhere_keeps_token() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Tasks, 3, "Duration");
        tracker.cell_changed(EntityKind::Tasks, 3, "TaskName");
        tracker.cell_changed(EntityKind::Clients, 3, "Duration");
        assert_eq!(tracker.complete(token, Some("2".into())), FixStatus::Recorded);
    }

    #[test]
    fn test_replace_discards_pending() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Workers, 0, "AvailableSlots");
        tracker.complete(token.clone(), Some("[1,2]".into()));
        tracker.table_replaced(EntityKind::Workers);
        assert_eq!(tracker.pending().count(), 0);
        assert!(matches!(tracker.take(&token), Err(AlchemistError::StaleFix { .. })));
    }

    #[test]
    fn test_older_response_does_not_replace_newer() {
        let mut tracker = FixTracker::new();
        let first = tracker.issue(EntityKind::Clients, 1, "PriorityLevel");
        let second = tracker.issue(EntityKind::Clients, 1, "PriorityLevel");
        assert_eq!(tracker.complete(second.clone(), Some("3".into())), FixStatus::Recorded);
        assert_eq!(tracker.complete(first.clone(), Some("5".into())), FixStatus::Stale);
        assert!(tracker.take(&first).is_err());
        assert_eq!(tracker.take(&second).unwrap(), "3");
    }

    #[test]
    fn test_unavailable() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Clients, 0, "ClientID");
        assert_eq!(tracker.complete(token, None), FixStatus::Unavailable);
    }

    #[test]
    fn test_forged_token_rejected() {
        let mut tracker = FixTracker::new();
        let token = tracker.issue(EntityKind::Clients, 0, "ClientName");
        tracker.complete(token.clone(), Some("Acme".into()));
        let forged = FixToken { id: 99, ..token };
        assert!(tracker.take(&forged).is_err());
    }
}

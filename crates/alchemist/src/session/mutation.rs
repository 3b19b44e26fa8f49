//! State changes accepted by [`AppState::dispatch`](super::AppState::dispatch).

use crate::input::SourceMetadata;
use crate::rules::{Rule, WeightPreset, Weights};
use crate::schema::{EntityKind, EntityTable};

use super::fixes::FixToken;

/// One change to the session. Every mutation is followed by a full
/// revalidation.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Replace a whole table, typically after an import.
    ReplaceTable {
        table: EntityTable,
        source: Option<SourceMetadata>,
    },
    /// Overwrite one cell.
    EditCell {
        entity: EntityKind,
        row: usize,
        column: String,
        value: String,
    },
    /// Write a recorded suggestion, if its token is still current.
    ApplyFix { token: FixToken },
    /// Append a rule.
    AddRule(Rule),
    /// Replace all weights.
    SetWeights(Weights),
    /// Change one weight by name.
    SetWeight { name: String, value: i64 },
    /// Load a named weight profile.
    ApplyPreset(WeightPreset),
}

impl Mutation {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::ReplaceTable { .. } => "replace_table",
            Mutation::EditCell { .. } => "edit_cell",
            Mutation::ApplyFix { .. } => "apply_fix",
            Mutation::AddRule(_) => "add_rule",
            Mutation::SetWeights(_) => "set_weights",
            Mutation::SetWeight { .. } => "set_weight",
            Mutation::ApplyPreset(_) => "apply_preset",
        }
    }
}

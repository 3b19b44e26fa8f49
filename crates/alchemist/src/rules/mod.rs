//! Business rules, prioritization weights and the rules export.

mod export;
mod rule;
mod store;
mod weights;

pub use export::{RULES_FILE_NAME, RulesExport};
pub use rule::{KnownRule, Rule, RuleDraft};
pub use store::RuleStore;
pub use weights::{MAX_WEIGHT, MIN_WEIGHT, WeightPreset, Weights};

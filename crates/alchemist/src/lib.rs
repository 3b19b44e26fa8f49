//! Alchemist: cleaning and business-rule configuration for client, worker
//! and task spreadsheets.
//!
//! Three CSV tables are imported through a header mapper, validated per
//! table and across tables, edited cell by cell (by hand or from AI
//! suggestions), and exported together with a set of business rules and
//! prioritization weights.
//!
//! # Core Principles
//!
//! - **Full recompute**: every change revalidates all three tables
//! - **Single writer**: all changes go through [`AppState::dispatch`]
//! - **Optional AI**: every gateway call may fail without side effects
//!
//! # Example
//!
//! ```no_run
//! use alchemist::{AppState, EntityKind, Mutation};
//!
//! let mut state = AppState::with_samples().unwrap();
//! println!("{} problems", state.report().total());
//!
//! state
//!     .dispatch(Mutation::EditCell {
//!         entity: EntityKind::Tasks,
//!         row: 3,
//!         column: "Duration".into(),
//!         value: "2".into(),
//!     })
//!     .unwrap();
//!
//! for hit in state.search(EntityKind::Tasks, "Duration > 1") {
//!     println!("row {}", hit.row);
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod query;
pub mod rules;
pub mod schema;
pub mod session;
pub mod validation;

pub use config::{AlchemistConfig, ProviderChoice};
pub use error::{AlchemistError, Result};
pub use input::{HeaderMapping, Parser, ParserConfig, SourceMetadata};
pub use llm::{
    AiGateway, AnthropicProvider, FixRequest, GeminiProvider, LlmConfig, MockProvider,
    RecommendRequest,
};
pub use query::{Comparison, Query};
pub use rules::{KnownRule, Rule, RuleDraft, RuleStore, RulesExport, WeightPreset, Weights};
pub use schema::{
    ClientRecord, Dataset, EntityKind, EntityRecord, EntityTable, Record, TaskRecord, WorkerRecord,
};
pub use session::{AppState, ExportSnapshot, FixStatus, FixToken, ImportSummary, Mutation, PendingFix, SearchHit};
pub use validation::{ErrorKind, Severity, ValidationEngine, ValidationError, ValidationReport};

//! API request handlers.

mod ai;
mod data;
mod fixes;
mod rules;

pub use ai::*;
pub use data::*;
pub use fixes::*;
pub use rules::*;

use alchemist::EntityKind;

use crate::server::error::ApiError;

/// Parse an entity path segment.
fn parse_entity(raw: &str) -> Result<EntityKind, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown entity: {}", raw)))
}

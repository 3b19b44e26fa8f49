//! Business rule shapes.
//!
//! Four rule templates are understood. Anything else (hand-written JSON, a
//! model inventing a new shape) is kept as-is and carried through export
//! untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AlchemistError, Result};
use crate::validation::split_list;

/// One of the four recognised rule templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum KnownRule {
    /// Tasks that must run together.
    CoRun { tasks: Vec<String> },
    /// Minimum number of common slots for a worker group.
    SlotRestriction { worker_group: String, min_slots: i64 },
    /// Maximum slots per phase for a worker group.
    LoadLimit { worker_group: String, max_slots: i64 },
    /// Phases a task may run in.
    PhaseWindow { task_id: String, allowed_phases: Vec<i64> },
}

impl KnownRule {
    /// The `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            KnownRule::CoRun { .. } => "coRun",
            KnownRule::SlotRestriction { .. } => "slotRestriction",
            KnownRule::LoadLimit { .. } => "loadLimit",
            KnownRule::PhaseWindow { .. } => "phaseWindow",
        }
    }
}

impl fmt::Display for KnownRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownRule::CoRun { tasks } => write!(f, "Co-Run: Tasks {}", tasks.join(", ")),
            KnownRule::SlotRestriction {
                worker_group,
                min_slots,
            } => write!(
                f,
                "Slot Restriction: WorkerGroup {}, Min Common Slots {}",
                worker_group, min_slots
            ),
            KnownRule::LoadLimit {
                worker_group,
                max_slots,
            } => write!(
                f,
                "Load Limit: WorkerGroup {}, Max Slots Per Phase {}",
                worker_group, max_slots
            ),
            KnownRule::PhaseWindow {
                task_id,
                allowed_phases,
            } => {
                let phases: Vec<String> = allowed_phases.iter().map(|p| p.to_string()).collect();
                write!(
                    f,
                    "Phase Window: Task {}, Allowed Phases {}",
                    task_id,
                    phases.join(", ")
                )
            }
        }
    }
}

/// A rule in the store: a recognised template, or an arbitrary JSON value
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rule {
    Known(KnownRule),
    Opaque(Value),
}

impl Rule {
    /// Classify a JSON value.
    ///
    /// A value is a known rule only when it deserializes into a template and
    /// serializes back to the same value. Extra keys, non-integer numbers or
    /// wrongly typed fields all fall through to `Opaque`.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<KnownRule>(value.clone()) {
            Ok(known) if serde_json::to_value(&known).is_ok_and(|v| v == value) => {
                Rule::Known(known)
            }
            _ => Rule::Opaque(value),
        }
    }

    /// The JSON form of this rule.
    pub fn to_value(&self) -> Value {
        match self {
            Rule::Known(known) => serde_json::to_value(known).unwrap_or(Value::Null),
            Rule::Opaque(value) => value.clone(),
        }
    }

    /// Whether this rule matched one of the templates.
    pub fn is_known(&self) -> bool {
        matches!(self, Rule::Known(_))
    }

    /// The `type` field, if there is a string one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Rule::Known(known) => Some(known.type_name()),
            Rule::Opaque(value) => value.get("type").and_then(Value::as_str),
        }
    }
}

impl From<KnownRule> for Rule {
    fn from(rule: KnownRule) -> Self {
        Rule::Known(rule)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Rule::from_value)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Known(known) => known.fmt(f),
            Rule::Opaque(value) => write!(f, "{}", value),
        }
    }
}

/// Manual rule entry: raw form text per template, turned into a rule by
/// [`RuleDraft::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RuleDraft {
    CoRun { tasks: String },
    SlotRestriction { worker_group: String, min_slots: String },
    LoadLimit { worker_group: String, max_slots: String },
    PhaseWindow { task_id: String, allowed_phases: String },
}

impl RuleDraft {
    /// Validate the form text and build a rule.
    pub fn build(&self) -> Result<Rule> {
        let rule = match self {
            RuleDraft::CoRun { tasks } => {
                let tasks: Vec<String> = split_list(tasks).map(str::to_string).collect();
                if tasks.is_empty() {
                    return Err(invalid("co-run needs at least one task ID"));
                }
                KnownRule::CoRun { tasks }
            }
            RuleDraft::SlotRestriction {
                worker_group,
                min_slots,
            } => KnownRule::SlotRestriction {
                worker_group: required(worker_group, "worker group")?,
                min_slots: integer(min_slots, "min common slots")?,
            },
            RuleDraft::LoadLimit {
                worker_group,
                max_slots,
            } => KnownRule::LoadLimit {
                worker_group: required(worker_group, "worker group")?,
                max_slots: integer(max_slots, "max slots per phase")?,
            },
            RuleDraft::PhaseWindow {
                task_id,
                allowed_phases,
            } => {
                let allowed_phases = split_list(allowed_phases)
                    .map(|p| integer(p, "phase"))
                    .collect::<Result<Vec<_>>>()?;
                if allowed_phases.is_empty() {
                    return Err(invalid("phase window needs at least one phase"));
                }
                KnownRule::PhaseWindow {
                    task_id: required(task_id, "task ID")?,
                    allowed_phases,
                }
            }
        };
        Ok(Rule::Known(rule))
    }
}

fn invalid(message: impl Into<String>) -> AlchemistError {
    AlchemistError::InvalidRule(message.into())
}

fn required(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

fn integer(value: &str, what: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid(format!("{} must be an integer, got '{}'", what, value.trim())))
}

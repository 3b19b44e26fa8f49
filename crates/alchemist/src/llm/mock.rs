//! Mock AI gateway for tests and offline use.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AlchemistError, Result};
use crate::rules::{KnownRule, Rule};
use crate::schema::EntityRecord;
use crate::validation::{parse_int_prefix, split_list};

use super::provider::{AiGateway, FixRequest, LlmConfig, RecommendRequest};

static TASK_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bT\d+\b").expect("valid task id pattern"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid number pattern"));
static GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgroup\s+(\w+)").expect("valid group pattern"));

/// Mock gateway that answers from simple heuristics, with no network access.
pub struct MockProvider {
    config: LlmConfig,
    failing: bool,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::default(),
            failing: false,
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            failing: false,
        }
    }

    /// A mock whose every call fails, for exercising fallbacks.
    pub fn failing() -> Self {
        Self {
            config: LlmConfig::default(),
            failing: true,
        }
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(AlchemistError::Llm("mock gateway configured to fail".to_string()));
        }
        Ok(())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AiGateway for MockProvider {
    fn suggest_fix(&self, request: &FixRequest) -> Result<String> {
        self.check()?;
        let value = request.value.trim();

        let suggestion = match request.col.as_str() {
            "PriorityLevel" => parse_int_prefix(value)
                .map(|p| p.clamp(1, 5))
                .unwrap_or(1)
                .to_string(),
            "Duration" | "MaxLoadPerPhase" => parse_int_prefix(value)
                .filter(|v| *v >= 1)
                .unwrap_or(1)
                .to_string(),
            "AttributesJSON" => "{}".to_string(),
            "AvailableSlots" => {
                let slots: Vec<String> = split_list(value.trim_matches(['[', ']']))
                    .filter_map(parse_int_prefix)
                    .map(|s| s.to_string())
                    .collect();
                format!("[{}]", slots.join(","))
            }
            "RequestedTaskIDs" => {
                // Keep only entries that look like task IDs.
                let kept: Vec<&str> = split_list(value)
                    .filter(|id| TASK_ID.is_match(id))
                    .collect();
                kept.join(",")
            }
            _ => value.to_string(),
        };
        Ok(suggestion)
    }

    fn recommend_rules(&self, request: &RecommendRequest) -> Result<Vec<Rule>> {
        self.check()?;
        let mut rules = Vec::new();

        let has = |name: &str| request.rules.iter().any(|r| r.type_name() == Some(name));

        let task_ids: Vec<String> = request
            .data
            .tasks
            .iter()
            .filter_map(|t| t.get("TaskID"))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .take(2)
            .collect();
        if task_ids.len() == 2 && !has("coRun") {
            rules.push(Rule::Known(KnownRule::CoRun { tasks: task_ids }));
        }

        let groups: IndexSet<&str> = request
            .data
            .workers
            .iter()
            .filter_map(|w| w.get("WorkerGroup"))
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect();
        if let Some(group) = groups.first() {
            if !has("loadLimit") {
                rules.push(Rule::Known(KnownRule::LoadLimit {
                    worker_group: group.to_string(),
                    max_slots: 2,
                }));
            }
        }

        Ok(rules)
    }

    fn nl_to_rule(&self, text: &str) -> Result<Rule> {
        self.check()?;
        let lower = text.to_lowercase();
        let tasks: Vec<String> = TASK_ID
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        let group = GROUP.captures(text).map(|c| c[1].to_string());
        let number = || {
            NUMBER
                .find(text)
                .and_then(|m| m.as_str().parse::<i64>().ok())
        };

        let rule = if lower.contains("phase") && tasks.len() == 1 {
            let allowed_phases: Vec<i64> = NUMBER
                .find_iter(&text[TASK_ID.find(text).map_or(0, |m| m.end())..])
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            KnownRule::PhaseWindow {
                task_id: tasks[0].clone(),
                allowed_phases,
            }
        } else if tasks.len() >= 2 {
            KnownRule::CoRun { tasks }
        } else if let (Some(worker_group), Some(n)) = (group, number()) {
            if lower.contains("min") || lower.contains("common") {
                KnownRule::SlotRestriction {
                    worker_group,
                    min_slots: n,
                }
            } else {
                KnownRule::LoadLimit {
                    worker_group,
                    max_slots: n,
                }
            }
        } else {
            return Err(AlchemistError::Llm(format!(
                "could not parse a rule from '{}'",
                text
            )));
        };

        Ok(Rule::Known(rule))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

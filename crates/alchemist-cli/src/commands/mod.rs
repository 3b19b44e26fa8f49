//! CLI command implementations.

pub mod export;
pub mod rule;
pub mod search;
pub mod serve;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use alchemist::{AiGateway, AlchemistConfig, AppState, Mutation, RulesExport};

use crate::cli::{DataArgs, LlmArgs};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Read the configuration file (if any) and apply `ALCHEMIST_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<AlchemistConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AlchemistConfig::load(path)?,
        None => AlchemistConfig::default(),
    };
    Ok(config.with_overrides(|key| std::env::var(key).ok())?)
}

/// Build the session state: configured samples, then any explicit files.
pub fn load_state(
    config: &AlchemistConfig,
    data: &DataArgs,
    verbose: bool,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(dir) = &data.samples_dir {
        config.samples_dir = Some(dir.clone());
    }

    let mut state = config.initial_state()?;
    let parser = config.parser();

    for (entity, path) in data.files() {
        let summary = state.import_path(&parser, entity, &path)?;
        if verbose {
            println!(
                "Loaded {} {} from {} ({})",
                summary.rows,
                entity,
                path.display(),
                summary.source.hash.dimmed()
            );
        }
        let unmatched = summary.mapping.unmatched();
        if !unmatched.is_empty() {
            println!(
                "{} {}: ignoring unrecognized columns: {}",
                "Note:".yellow(),
                entity,
                unmatched.join(", ")
            );
        }
        for header in summary.mapping.collisions() {
            println!(
                "{} {}: column '{}' duplicates an earlier column and was dropped",
                "Warning:".yellow(),
                entity,
                header
            );
        }
    }

    Ok(state)
}

/// Load the rules and weights of a rules file into the session.
pub fn apply_rules(state: &mut AppState, export: RulesExport) -> alchemist::Result<()> {
    for rule in export.rules {
        state.dispatch(Mutation::AddRule(rule))?;
    }
    state.dispatch(Mutation::SetWeights(export.weights))
}

/// Read a rules file, or start empty when it does not exist yet.
pub fn read_rules(path: &Path) -> alchemist::Result<RulesExport> {
    if path.exists() {
        RulesExport::load(path)
    } else {
        Ok(RulesExport::default())
    }
}

/// Build the AI gateway, with CLI flags layered over the configuration.
pub fn build_gateway(
    config: &AlchemistConfig,
    llm: &LlmArgs,
) -> alchemist::Result<Option<Arc<dyn AiGateway>>> {
    let mut config = config.clone();
    if let Some(provider) = llm.llm {
        config.provider = provider;
    }
    if let Some(model) = &llm.model {
        config.llm.model = Some(model.clone());
    }
    config.build_gateway()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemist::{EntityKind, KnownRule, ProviderChoice, Rule, Weights};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_state_imports_explicit_files() {
        let dir = tempdir().unwrap();
        let tasks = dir.path().join("my_tasks.csv");
        fs::write(&tasks, "TaskID,TaskName,Duration\nT9,Only,0\n").unwrap();

        let data = DataArgs {
            tasks: Some(tasks),
            ..DataArgs::default()
        };
        let state = load_state(&AlchemistConfig::default(), &data, false).unwrap();

        assert_eq!(state.dataset().tasks.len(), 1);
        assert!(!state.dataset().clients.is_empty());
        assert_eq!(state.report().errors_at(EntityKind::Tasks, 0, "Duration").len(), 1);
    }

    #[test]
    fn test_read_rules_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let export = read_rules(&dir.path().join("rules.json")).unwrap();
        assert!(export.rules.is_empty());
        assert_eq!(export.weights, Weights::default());
    }

    #[test]
    fn test_apply_rules() {
        let mut state = AppState::default();
        let export = RulesExport::new(
            vec![Rule::Known(KnownRule::CoRun {
                tasks: vec!["T1".into(), "T2".into()],
            })],
            Weights::new(2, 3, 4, 5).unwrap(),
        );
        apply_rules(&mut state, export.clone()).unwrap();
        assert_eq!(state.rules_export(), export);
    }

    #[test]
    fn test_build_gateway_flags_override_config() {
        let config = AlchemistConfig::default();
        assert!(build_gateway(&config, &LlmArgs::default()).unwrap().is_none());

        let llm = LlmArgs {
            llm: Some(ProviderChoice::Mock),
            model: Some("offline".into()),
        };
        let gateway = build_gateway(&config, &llm).unwrap().unwrap();
        assert_eq!(gateway.config().model.as_deref(), Some("offline"));
    }
}

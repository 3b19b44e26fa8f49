//! Rule commands - add, translate, recommend and list rules in a rules file.

use std::path::Path;

use colored::Colorize;

use alchemist::llm::{nl_to_rule_or_message, recommend_rules_or_empty};
use alchemist::{AlchemistConfig, RecommendRequest, Rule, RulesExport};

use super::{CommandResult, build_gateway, load_state, read_rules};
use crate::cli::RuleAction;

pub fn run(config: &AlchemistConfig, action: RuleAction, verbose: bool) -> CommandResult {
    match action {
        RuleAction::Add {
            template,
            tasks,
            group,
            slots,
            task,
            phases,
            rules,
        } => {
            let rule = template.draft(tasks, group, slots, task, phases).build()?;
            let mut export = read_rules(&rules)?;
            export.rules.push(rule.clone());
            export.save(&rules)?;
            println!("{} {}", "Added rule:".green().bold(), rule);
            print_location(&rules, &export);
        }

        RuleAction::FromText {
            text,
            llm,
            rules,
            dry_run,
        } => {
            let gateway = build_gateway(config, &llm)?
                .ok_or("AI features are disabled. Pass --llm or set ALCHEMIST_PROVIDER.")?;
            if verbose {
                println!("Asking {} to parse: {}", gateway.name(), text);
            }

            let rule = nl_to_rule_or_message(gateway.as_ref(), &text)?;
            println!("{} {}", "Rule:".cyan().bold(), rule);
            println!("{}", serde_json::to_string_pretty(&rule)?);

            if !dry_run {
                let mut export = read_rules(&rules)?;
                export.rules.push(rule);
                export.save(&rules)?;
                print_location(&rules, &export);
            }
        }

        RuleAction::Recommend {
            data,
            llm,
            rules,
            apply,
        } => {
            let gateway = build_gateway(config, &llm)?
                .ok_or("AI features are disabled. Pass --llm or set ALCHEMIST_PROVIDER.")?;
            let state = load_state(config, &data, verbose)?;
            let mut export = read_rules(&rules)?;

            let request = RecommendRequest::new(state.dataset().clone(), export.rules.clone());
            let recommended = recommend_rules_or_empty(gateway.as_ref(), &request);

            if recommended.is_empty() {
                println!("{}", "No recommendations.".yellow());
                return Ok(());
            }

            println!(
                "{} {} from {}",
                "Recommended".cyan().bold(),
                recommended.len(),
                gateway.name()
            );
            print_rules(&recommended);

            if apply {
                export.rules.extend(recommended);
                export.save(&rules)?;
                print_location(&rules, &export);
            }
        }

        RuleAction::List { rules } => {
            let export = read_rules(&rules)?;
            if export.rules.is_empty() {
                println!("No rules in {}", rules.display());
            } else {
                print_rules(&export.rules);
            }
            println!(
                "{} {}",
                "Weights:".cyan().bold(),
                serde_json::to_string(&export.weights)?
            );
        }
    }

    Ok(())
}

fn print_rules(rules: &[Rule]) {
    for (i, rule) in rules.iter().enumerate() {
        let tag = match rule.type_name() {
            Some(name) => name.to_string(),
            None => "unknown".dimmed().to_string(),
        };
        println!("  {:>2}. [{}] {}", i + 1, tag, rule);
    }
}

fn print_location(path: &Path, export: &RulesExport) {
    println!("Saved {} rules to {}", export.rules.len(), path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{LlmArgs, RuleTemplate};
    use alchemist::{KnownRule, ProviderChoice};
    use tempfile::tempdir;

    #[test]
    fn test_add_appends_to_rules_file() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        let config = AlchemistConfig::default();

        for tasks in ["T1,T2", "T3, T4"] {
            run(
                &config,
                RuleAction::Add {
                    template: RuleTemplate::CoRun,
                    tasks: Some(tasks.into()),
                    group: None,
                    slots: None,
                    task: None,
                    phases: None,
                    rules: rules.clone(),
                },
                false,
            )
            .unwrap();
        }

        let export = RulesExport::load(&rules).unwrap();
        assert_eq!(export.rules.len(), 2);
        assert_eq!(
            export.rules[1],
            Rule::Known(KnownRule::CoRun {
                tasks: vec!["T3".into(), "T4".into()]
            })
        );
    }

    #[test]
    fn test_add_rejects_bad_input_without_writing() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("rules.json");

        let result = run(
            &AlchemistConfig::default(),
            RuleAction::Add {
                template: RuleTemplate::LoadLimit,
                tasks: None,
                group: Some("GroupA".into()),
                slots: Some("two".into()),
                task: None,
                phases: None,
                rules: rules.clone(),
            },
            false,
        );

        assert!(result.is_err());
        assert!(!rules.exists());
    }

    #[test]
    fn test_from_text_requires_gateway() {
        let dir = tempdir().unwrap();
        let result = run(
            &AlchemistConfig::default(),
            RuleAction::FromText {
                text: "T1 and T2 together".into(),
                llm: LlmArgs::default(),
                rules: dir.path().join("rules.json"),
                dry_run: true,
            },
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_text_with_mock() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        run(
            &AlchemistConfig::default(),
            RuleAction::FromText {
                text: "T1 and T2 must run together".into(),
                llm: LlmArgs {
                    llm: Some(ProviderChoice::Mock),
                    model: None,
                },
                rules: rules.clone(),
                dry_run: false,
            },
            false,
        )
        .unwrap();

        let export = RulesExport::load(&rules).unwrap();
        assert_eq!(export.rules.len(), 1);
        assert_eq!(export.rules[0].type_name(), Some("coRun"));
    }
}

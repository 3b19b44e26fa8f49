//! Validate command - run every validator and list the results.

use colored::Colorize;

use alchemist::{AlchemistConfig, EntityKind, Severity, ValidationReport};

use super::{CommandResult, load_state};
use crate::cli::DataArgs;

pub fn run(
    config: &AlchemistConfig,
    data: DataArgs,
    entity: Option<EntityKind>,
    json_output: bool,
    verbose: bool,
) -> CommandResult {
    let state = load_state(config, &data, verbose)?;
    let report = state.report();
    let entities: Vec<EntityKind> = match entity {
        Some(entity) => vec![entity],
        None => EntityKind::ALL.to_vec(),
    };

    if json_output {
        let mut out = serde_json::Map::new();
        for entity in &entities {
            out.insert(
                entity.to_string(),
                serde_json::to_value(report.for_entity(*entity))?,
            );
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for entity in &entities {
        print_table_report(report, *entity, state.dataset().len(*entity));
    }

    println!(
        "{} {} errors, {} warnings",
        "Total:".bold(),
        report.error_count().to_string().red(),
        report.warning_count().to_string().yellow()
    );

    Ok(())
}

fn print_table_report(report: &ValidationReport, entity: EntityKind, rows: usize) {
    let errors = report.for_entity(entity);
    println!(
        "{} {} ({} rows)",
        entity.label().cyan().bold(),
        if errors.is_empty() {
            "clean".green().to_string()
        } else {
            format!("{} issues", errors.len()).red().to_string()
        },
        rows
    );

    for error in errors {
        let tag = match error.severity {
            Severity::Error => "error".red(),
            Severity::Warning => "warn ".yellow(),
        };
        println!(
            "  {} row {:>4}  {:<18} {}",
            tag,
            error.row,
            error.column.white(),
            error.message
        );
    }
    println!();
}

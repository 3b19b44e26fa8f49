//! Search command - filter one table with a single comparison.

use colored::Colorize;

use alchemist::{AlchemistConfig, EntityKind, Query};

use super::{CommandResult, load_state};
use crate::cli::DataArgs;

pub fn run(
    config: &AlchemistConfig,
    data: DataArgs,
    entity: EntityKind,
    query: String,
    json_output: bool,
    verbose: bool,
) -> CommandResult {
    let state = load_state(config, &data, verbose)?;
    let hits = state.search(entity, &query);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if Query::parse(&query).is_none() {
        println!(
            "{} could not understand '{}'. Use <field> <op> <number>, e.g. \"Duration > 2\".",
            "Note:".yellow(),
            query
        );
        return Ok(());
    }

    println!(
        "{} {} of {} {} match {}",
        "Search:".cyan().bold(),
        hits.len().to_string().white().bold(),
        state.dataset().len(entity),
        entity,
        query.white()
    );
    for hit in &hits {
        println!("  row {:>4}  {}", hit.row, serde_json::to_string(&hit.record)?);
    }

    Ok(())
}

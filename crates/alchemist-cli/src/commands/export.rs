//! Export command - write the cleaned CSVs and rules.json.

use std::path::PathBuf;

use colored::Colorize;

use alchemist::{AlchemistConfig, Mutation, WeightPreset};

use super::{CommandResult, apply_rules, load_state, read_rules};
use crate::cli::DataArgs;

pub fn run(
    config: &AlchemistConfig,
    data: DataArgs,
    output: Option<PathBuf>,
    rules: Option<PathBuf>,
    preset: Option<WeightPreset>,
    verbose: bool,
) -> CommandResult {
    let mut state = load_state(config, &data, verbose)?;

    if let Some(path) = rules {
        let export = read_rules(&path)?;
        if verbose {
            println!("Loaded {} rules from {}", export.rules.len(), path.display());
        }
        apply_rules(&mut state, export)?;
    }
    if let Some(preset) = preset {
        state.dispatch(Mutation::ApplyPreset(preset))?;
    }

    let report = state.report();
    if !report.is_clean() {
        println!(
            "{} exporting with {} errors and {} warnings outstanding",
            "Warning:".yellow(),
            report.error_count(),
            report.warning_count()
        );
    }

    let dir = output.unwrap_or_else(|| config.export_dir());
    let written = state.export_all(&dir)?;

    println!("{} {}", "Exported to".green().bold(), dir.display());
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}

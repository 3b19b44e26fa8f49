//! Data Alchemist CLI - validate, search, export and configure rules.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Validate { data, entity, json } => {
            commands::validate::run(&config, data, entity, json, cli.verbose)
        }

        Commands::Search {
            entity,
            query,
            data,
            json,
        } => commands::search::run(&config, data, entity, query, json, cli.verbose),

        Commands::Export {
            data,
            output,
            rules,
            preset,
        } => commands::export::run(&config, data, output, rules, preset, cli.verbose),

        Commands::Rule { action } => commands::rule::run(&config, action, cli.verbose),

        Commands::Serve {
            data,
            llm,
            port,
            no_open,
        } => commands::serve::run(&config, data, llm, port, no_open, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

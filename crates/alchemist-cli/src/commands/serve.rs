//! Serve command - run the JSON HTTP API over one session.

use colored::Colorize;

use alchemist::AlchemistConfig;

use super::{CommandResult, build_gateway, load_state};
use crate::cli::{DataArgs, LlmArgs};
use crate::server::{app, state::ServerState};

pub fn run(
    config: &AlchemistConfig,
    data: DataArgs,
    llm: LlmArgs,
    port: u16,
    no_open: bool,
    verbose: bool,
) -> CommandResult {
    let session = load_state(config, &data, verbose)?;

    // The blocking HTTP clients inside providers must be created and dropped
    // outside the async runtime.
    let gateway = build_gateway(config, &llm)?;
    let mut state =
        ServerState::new(session, config.parser()).with_export_dir(config.export_dir());
    if let Some(gateway) = &gateway {
        state = state.with_gateway(gateway.clone());
    }

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting Data Alchemist API at".cyan().bold(),
        url.white().bold()
    );
    println!();
    match &state.gateway_name {
        Some(name) => println!("  AI gateway: {}", name),
        None => println!("  AI gateway: {}", "disabled".dimmed()),
    }
    println!("  Export dir: {}", config.export_dir().display());
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    if !no_open {
        if let Err(e) = open::that(format!("{}/api/data", url)) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let shutdown = async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
        };

        if let Err(e) = app::run_server(state, port, shutdown).await {
            eprintln!("Server error: {}", e);
        }
    });
    drop(runtime);
    drop(gateway);

    Ok(())
}

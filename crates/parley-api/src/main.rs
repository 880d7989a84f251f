//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes tracing and the session cache, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::tracing_setup::init_tracing(cli.log_directives(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.base_url.clone()).await?;

    match cli.command {
        Commands::Sessions => {
            cli::session::list_sessions(&state, cli.json).await?;
        }

        Commands::New { title } => {
            cli::session::create_session(&state, title, cli.json).await?;
        }

        Commands::Show { target } => {
            cli::session::show_session(&state, &target, cli.json).await?;
        }

        Commands::Rename { id, title } => {
            cli::session::rename_session(&state, &id, &title, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::session::delete_session(&state, &id, force, cli.json).await?;
        }

        Commands::Config => {
            cli::config::show_config(&state, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

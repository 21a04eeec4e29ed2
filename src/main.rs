//! Voice Timer - task countdowns with spoken reminders

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use voice_timer::cli::{self, Cli, Commands};
use voice_timer::config::Config;
use voice_timer::{logging, tui};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completion must work without a writable app directory
    if let Some(Commands::Completion { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "vtimer", &mut std::io::stdout());
        return Ok(());
    }

    logging::init()?;

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Some(Commands::Run(args)) => cli::run::run(&config, args).await,
        Some(Commands::Speech { command }) => cli::speech::run(&config, command),
        Some(Commands::Completion { .. }) => Ok(()),
        None => tui::run(config).await,
    }
}

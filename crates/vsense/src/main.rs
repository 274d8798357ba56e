mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, PlatformAction};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { platform, limit } => commands::list::run(platform.as_deref(), limit),
        Commands::Export { output } => commands::export::run(output.as_deref()),
        Commands::Import { file } => commands::import::run(&file),
        Commands::Remove { url } => commands::remove::run(&url),
        Commands::Clear { yes } => commands::clear::run(yes),
        Commands::Stats => commands::stats::run(),
        Commands::Inspect { fixture, watched } => commands::inspect::run(&fixture, watched),
        Commands::Save { fixture } => commands::save::run(&fixture),
        Commands::Version => commands::version::run(),
        Commands::Platforms { action } => match action {
            Some(PlatformAction::List) | None => commands::platforms::run_list(),
            Some(PlatformAction::Enable { name }) => commands::platforms::run_enable(&name),
            Some(PlatformAction::Disable { name }) => commands::platforms::run_disable(&name),
        },
    }
}

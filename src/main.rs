use clap::Parser;
use souschef::{
    cli::{commands, Cli, Commands},
    Settings,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,souschef=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Parse { file, json } => commands::parse(&file, json)?,
        Commands::Ask { file, questions } => commands::ask(&settings, &file, &questions)?,
        Commands::Chat { file } => commands::chat(&settings, &file)?,
    }

    Ok(())
}

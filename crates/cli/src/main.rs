//! DCL CLI: the main entry point.
//!
//! Commands:
//! - `parse`: Parse an instruction and print it as JSON
//! - `assemble`: Resolve an instruction and print the invocation context
//! - `run`: Resolve an instruction and send it to the configured adapter
//! - `modules`: List loaded module ids and aliases
//! - `check`: Load and validate bundles, print the load report
//! - `config`: Configuration helpers

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dcl",
    about = "DCL: resolve declarative instructions against module bundles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: commands::GlobalOpts,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an instruction and print it as JSON
    Parse {
        /// Instruction text, e.g. "WRITE 'Topic' USING Lens('l1')"
        text: String,
    },

    /// Resolve an instruction and print the invocation context as JSON
    Assemble { text: String },

    /// Resolve an instruction and send it to the generation adapter
    Run { text: String },

    /// List module ids and aliases
    Modules,

    /// Load and validate bundles
    Check,

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a default config file
    Default,
    /// Print the config file path
    Path,
    /// Load and validate the config file
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    let filter = if cli.global.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Parse { text } => commands::parse::run(&text)?,
        Commands::Assemble { text } => commands::assemble::run(&cli.global, &text)?,
        Commands::Run { text } => commands::run::run(&cli.global, &text).await?,
        Commands::Modules => commands::modules::run(&cli.global)?,
        Commands::Check => commands::check::run(&cli.global)?,
        Commands::Config { action } => match action {
            ConfigAction::Default => commands::config_cmd::default(),
            ConfigAction::Path => commands::config_cmd::path(&cli.global),
            ConfigAction::Validate => commands::config_cmd::validate(&cli.global)?,
        },
    }

    Ok(())
}

//! Subcommand implementations and the setup they share.

pub mod assemble;
pub mod check;
pub mod config_cmd;
pub mod modules;
pub mod parse;
pub mod run;

use std::path::PathBuf;

use clap::Args;
use dcl_agent::AssemblyStrategy;
use dcl_config::AppConfig;
use dcl_registry::{BundleLoader, LoadReport, ModuleRegistry};

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file (defaults to ~/.dcl/config.toml)
    #[arg(short, long, global = true, env = "DCL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bundle directory; repeat in precedence order. Replaces configured bundles.
    #[arg(short, long = "bundle", global = true)]
    pub bundles: Vec<PathBuf>,

    /// Assembly strategy: structured or concatenation
    #[arg(short, long, global = true)]
    pub strategy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalOpts {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
    }
}

/// Load the config file with environment and command-line overrides applied.
pub fn load_config(opts: &GlobalOpts) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_with_env(&opts.config_path())
        .map_err(|e| format!("Failed to load config: {e}"))?;

    if !opts.bundles.is_empty() {
        config.bundles = opts.bundles.clone();
    }
    if let Some(strategy) = &opts.strategy {
        config.strategy = strategy.clone();
    }

    Ok(config)
}

pub fn strategy(config: &AppConfig) -> Result<AssemblyStrategy, Box<dyn std::error::Error>> {
    Ok(config.strategy.parse::<AssemblyStrategy>()?)
}

/// Load and validate the configured bundles.
pub fn load_registry(config: &AppConfig) -> Result<(ModuleRegistry, LoadReport), Box<dyn std::error::Error>> {
    if config.bundles.is_empty() {
        tracing::warn!("No bundles configured; the registry will be empty");
    }
    let loader = BundleLoader::new().with_index_file(&config.index_file);
    Ok(loader.load_bundles(config.bundles.as_slice())?)
}

//! `dcl config`: Configuration helpers.

use dcl_config::AppConfig;

use super::GlobalOpts;

pub fn default() {
    print!("{}", AppConfig::default_toml());
}

pub fn path(opts: &GlobalOpts) {
    println!("{}", opts.config_path().display());
}

pub fn validate(opts: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(opts)?;
    super::strategy(&config)?;

    let mut warnings = Vec::new();
    if config.bundles.is_empty() {
        warnings.push("No bundles configured (set `bundles`, DCL_BUNDLES or --bundle)".to_string());
    }
    for bundle in &config.bundles {
        if !bundle.is_dir() {
            warnings.push(format!("Bundle directory does not exist: {}", bundle.display()));
        }
    }
    if config.provider.kind == "openai" && !config.has_api_key() {
        warnings.push("provider.kind is openai but no API key is set".to_string());
    }

    println!("✅ Config parsed successfully");
    for w in &warnings {
        println!("⚠️  {w}");
    }
    println!();
    println!("   Strategy:  {}", config.strategy);
    println!("   Provider:  {} ({})", config.provider.kind, config.provider.model);
    println!("   Index:     {}", config.index_file);
    println!("   Bundles:   {}", config.bundles.len());
    Ok(())
}

//! `dcl check`: Load and validate bundles, print the load report.

use super::GlobalOpts;

pub fn run(opts: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(opts)?;
    super::strategy(&config)?;

    let (registry, report) = match super::load_registry(&config) {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("❌ {e}");
            return Err(e);
        }
    };

    for bundle in &report.bundles {
        if !bundle.found {
            println!("⚠️  {:<24} not found, skipped", bundle.name);
            continue;
        }
        println!(
            "   {:<24} modules: {} (+{} duplicate)  aliases: {} (+{} duplicate)",
            bundle.name,
            bundle.modules_inserted,
            bundle.modules_skipped,
            bundle.aliases_inserted,
            bundle.aliases_skipped,
        );
    }

    println!();
    println!(
        "✅ Registry valid: {} modules, {} aliases, {} duplicates skipped",
        registry.len(),
        registry.alias_count(),
        report.duplicates_skipped()
    );
    Ok(())
}

//! `dcl modules`: List loaded modules and aliases.

use super::GlobalOpts;

pub fn run(opts: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(opts)?;
    let (registry, _) = super::load_registry(&config)?;

    println!("Modules ({}):", registry.len());
    for id in registry.list() {
        if let Some(module) = registry.get(id) {
            println!("  {id:<48} {}", module.module_type);
        }
    }

    println!();
    println!("Aliases ({}):", registry.alias_count());
    for (name, target) in registry.aliases() {
        println!("  {name:<24} -> {target}");
    }

    Ok(())
}

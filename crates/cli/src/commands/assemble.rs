//! `dcl assemble`: Resolve an instruction and print the invocation context.

use super::GlobalOpts;

pub fn run(opts: &GlobalOpts, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(opts)?;
    let strategy = super::strategy(&config)?;
    let (registry, _) = super::load_registry(&config)?;

    let instruction = dcl_parser::parse_instruction(text)?;
    let context = strategy.assemble(&instruction, &registry);

    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

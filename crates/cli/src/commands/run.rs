//! `dcl run`: Resolve an instruction and print the adapter's response.

use dcl_agent::DclAgent;

use super::GlobalOpts;

pub async fn run(opts: &GlobalOpts, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(opts)?;
    let strategy = super::strategy(&config)?;
    let (registry, _) = super::load_registry(&config)?;
    let adapter = dcl_providers::build_from_config(&config.provider)?;

    let agent = DclAgent::from_registry(registry, adapter)?.with_strategy(strategy);
    let response = agent.execute(text).await?;

    println!("{response}");
    Ok(())
}

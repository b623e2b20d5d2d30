//! `dcl parse`: Print an instruction's structure as JSON.

pub fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let instruction = dcl_parser::parse_instruction(text)?;
    println!("{}", serde_json::to_string_pretty(&instruction)?);
    Ok(())
}

//! Canonicalize command implementation.

use payproof_canonical::canonicalize;
use serde_json::Value;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let json_str = super::read_input(input.as_deref())?;
    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;

    println!("{}", canonicalize(&value)?);
    Ok(())
}

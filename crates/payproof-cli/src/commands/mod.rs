//! Command implementations.

use std::io::{self, Read};

pub mod batch;
pub mod canonicalize;
pub mod identifier;
pub mod pack;
pub mod registry;
#[cfg(feature = "dev-tools")]
pub mod sign;
pub mod template;
pub mod verify;

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

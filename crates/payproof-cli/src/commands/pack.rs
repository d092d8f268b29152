//! Pack and unpack commands for the identifier packing codec.

use payproof_canonical::{pack_str, unpack_str, PackingProfile};

fn profile(max_len: usize) -> Result<PackingProfile, Box<dyn std::error::Error>> {
    PackingProfile::from_max_len(max_len)
        .ok_or_else(|| format!("Unknown profile {}; expected 21 or 56", max_len).into())
}

pub fn pack(identifier: String, max_len: usize) -> Result<(), Box<dyn std::error::Error>> {
    let elements = pack_str(profile(max_len)?, &identifier)?;
    println!("{}", serde_json::to_string(&elements)?);
    Ok(())
}

/// Accepts elements as separate arguments or as one JSON array.
pub fn unpack(elements: Vec<String>, max_len: usize) -> Result<(), Box<dyn std::error::Error>> {
    let parsed: Vec<u64> = match elements.as_slice() {
        [single] if single.trim_start().starts_with('[') => serde_json::from_str(single)
            .map_err(|e| format!("Invalid element array: {}", e))?,
        _ => elements
            .iter()
            .map(|e| {
                e.parse::<u64>()
                    .map_err(|_| format!("Invalid element '{}'", e))
            })
            .collect::<Result<_, _>>()?,
    };

    println!("{}", unpack_str(profile(max_len)?, &parsed)?);
    Ok(())
}

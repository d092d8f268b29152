//! Output formatting utilities.

use payproof_registry::RegistryEvent;
use serde::Serialize;

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats an audit record as a table row.
pub fn format_history_row(event: &RegistryEvent) -> String {
    format!(
        "{:<6} {:<7} {:<20} {:<66} {}",
        event.sequence,
        event.action.to_string(),
        event.recorded_at.format("%Y-%m-%dT%H:%M:%SZ"),
        event.provider_hash.to_hex(),
        event.caller
    )
}

/// Prints the history table header.
#[allow(clippy::print_literal)]
pub fn print_history_header() {
    println!(
        "{:<6} {:<7} {:<20} {:<66} {}",
        "SEQ", "ACTION", "RECORDED_AT", "PROVIDER_HASH", "CALLER"
    );
    println!("{}", "-".repeat(144));
}

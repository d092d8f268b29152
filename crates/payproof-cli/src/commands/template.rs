//! Template hash command.

use payproof_registry::{ProviderTemplate, TemplateBlueprint};

pub fn hash(
    input: Option<String>,
    positions: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(input.as_deref())?;
    let template: ProviderTemplate =
        serde_json::from_str(&text).map_err(|e| format!("Invalid template: {}", e))?;

    match positions {
        None => println!("{}", template.canonical_hash()?),
        Some(count) => {
            let blueprint = TemplateBlueprint::new(template);
            if !blueprint.is_positional() {
                return Err("template has no {{INDEX}} placeholder".into());
            }
            for hash in blueprint.hashes_for_positions(count)? {
                println!("{}", hash);
            }
        }
    }
    Ok(())
}

//! Registry commands: list, check, add, remove, history.

use crate::config::Config;
use crate::output::{format_history_row, print_history_header, print_json};
use chrono::{DateTime, Utc};
use payproof_canonical::{Address, PaymentMethod, ProviderHash};
use payproof_registry::{
    filter_history, ActionFilter, AndFilter, CallerFilter, EventFilter, JournalStore,
    ProviderHashFilter, ProviderRegistry, RegistryAction, TimeRangeFilter, WriteOptions,
};

/// Opens the journal-backed registry configured for `method`.
pub fn open(
    config: &Config,
    method: &PaymentMethod,
) -> Result<ProviderRegistry<JournalStore>, Box<dyn std::error::Error>> {
    let registry_config = config.registry(method)?;
    if let Some(parent) = registry_config.journal.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = JournalStore::open(&registry_config.journal, method, WriteOptions::default())
        .map_err(|e| {
            format!(
                "Failed to open registry journal {}: {}",
                registry_config.journal.display(),
                e
            )
        })?;
    Ok(ProviderRegistry::new(
        method.clone(),
        registry_config.operators.iter().cloned(),
        store,
    ))
}

pub fn list(
    config: &Config,
    method: PaymentMethod,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open(config, &method)?;
    let hashes = registry.enumerate();
    if json_output {
        print_json(&hashes)?;
    } else {
        for hash in hashes {
            println!("{}", hash);
        }
    }
    Ok(())
}

pub fn check(
    config: &Config,
    method: PaymentMethod,
    hash: ProviderHash,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open(config, &method)?;
    if !registry.is_registered(&hash) {
        return Err(format!("{} is not registered for {}", hash, method).into());
    }
    println!("{} is registered for {}", hash, method);
    Ok(())
}

pub fn mutate(
    config: &Config,
    method: PaymentMethod,
    caller: Address,
    hash: ProviderHash,
    action: RegistryAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = open(config, &method)?;
    let event = match action {
        RegistryAction::Add => registry.add(&caller, hash)?,
        RegistryAction::Remove => registry.remove(&caller, hash)?,
    };
    print_json(&event)?;
    Ok(())
}

pub struct HistoryArgs {
    pub method: PaymentMethod,
    pub action: Option<RegistryAction>,
    pub caller: Option<Address>,
    pub hash: Option<ProviderHash>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub json: bool,
}

pub fn history(config: &Config, args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = open(config, &args.method)?;

    let mut filters: Vec<Box<dyn EventFilter>> = Vec::new();
    if let Some(action) = args.action {
        filters.push(Box::new(ActionFilter { action }));
    }
    if let Some(caller) = args.caller {
        filters.push(Box::new(CallerFilter { caller }));
    }
    if let Some(provider_hash) = args.hash {
        filters.push(Box::new(ProviderHashFilter { provider_hash }));
    }
    if args.after.is_some() || args.before.is_some() {
        filters.push(Box::new(TimeRangeFilter {
            after: args.after,
            before: args.before,
        }));
    }

    let events = filter_history(registry.history(), &AndFilter { filters });
    if args.json {
        print_json(&events)?;
    } else {
        print_history_header();
        for event in events {
            println!("{}", format_history_row(event));
        }
    }
    Ok(())
}

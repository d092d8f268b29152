//! Payproof CLI - verify payment attestation proofs and operate provider registries.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use payproof_canonical::{Address, PaymentMethod, ProviderHash};
use payproof_registry::RegistryAction;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use commands::{batch, canonicalize, identifier, pack, registry, template, verify};
use config::Config;

#[derive(Parser)]
#[command(name = "payproof")]
#[command(author, version, about = "Payment attestation proof verification and provider registry CLI")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "PAYPROOF_CONFIG", default_value = "payproof.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical form of input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Recompute the identifier of a claim info document
    Identifier {
        /// Claim info JSON file (or stdin)
        input: Option<String>,
        /// Also print sign data for this owner
        #[arg(long, requires_all = ["timestamp_s", "epoch"])]
        owner: Option<String>,
        /// Claim timestamp (unix seconds)
        #[arg(long)]
        timestamp_s: Option<u64>,
        /// Witness-scheme epoch
        #[arg(long)]
        epoch: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify a proof against the witness set
    Verify {
        /// Proof JSON file, extension or app-clip shape (or stdin)
        input: Option<String>,
        /// Authorized witness address (repeatable; overrides config)
        #[arg(long = "witness")]
        witnesses: Vec<Address>,
        /// Required distinct witness signatures (overrides config)
        #[arg(long)]
        threshold: Option<usize>,
        /// Also require the claim's provider hash to be registered for this method
        #[arg(long)]
        method: Option<PaymentMethod>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pack an identifier into field elements
    Pack {
        /// Identifier text
        identifier: String,
        /// Profile maximum length (21 or 56)
        #[arg(long, default_value_t = 21)]
        profile: usize,
    },
    /// Unpack field elements into an identifier
    Unpack {
        /// Elements, as separate numbers or one JSON array
        #[arg(required = true)]
        elements: Vec<String>,
        /// Profile maximum length (21 or 56)
        #[arg(long, default_value_t = 21)]
        profile: usize,
    },
    /// Provider template operations
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Provider registry operations
    Registry {
        #[command(subcommand)]
        action: RegistryCommands,
    },
    /// Batched registry lifecycle
    Batch {
        #[command(subcommand)]
        action: BatchCommands,
    },
    /// Sign a claim with local witness keys
    #[cfg(feature = "dev-tools")]
    Sign {
        /// Claim info JSON file (or stdin)
        input: Option<String>,
        /// Witness seed, 32 bytes hex (repeatable)
        #[arg(long = "seed", required = true)]
        seeds: Vec<String>,
        /// Claim owner address
        #[arg(long)]
        owner: String,
        /// Claim timestamp (unix seconds)
        #[arg(long)]
        timestamp_s: u64,
        /// Witness-scheme epoch
        #[arg(long, default_value_t = 1)]
        epoch: u64,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// Print the commitment hash of a template
    Hash {
        /// Template JSON file (or stdin)
        input: Option<String>,
        /// Treat the template as a blueprint and hash positions 0..N
        #[arg(long)]
        positions: Option<usize>,
    },
}

#[derive(Subcommand)]
enum RegistryCommands {
    /// List registered provider hashes
    List {
        #[arg(long)]
        method: PaymentMethod,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero unless a hash is registered
    Check {
        #[arg(long)]
        method: PaymentMethod,
        hash: ProviderHash,
    },
    /// Register a provider hash
    Add {
        #[arg(long)]
        method: PaymentMethod,
        /// Operator performing the mutation
        #[arg(long)]
        caller: Address,
        hash: ProviderHash,
    },
    /// Withdraw a provider hash
    Remove {
        #[arg(long)]
        method: PaymentMethod,
        /// Operator performing the mutation
        #[arg(long)]
        caller: Address,
        hash: ProviderHash,
    },
    /// Show the audit history
    History {
        #[arg(long)]
        method: PaymentMethod,
        /// Only this action (add or remove)
        #[arg(long, value_parser = parse_action)]
        action: Option<RegistryAction>,
        /// Only this operator
        #[arg(long)]
        caller: Option<Address>,
        /// Only this provider hash
        #[arg(long)]
        hash: Option<ProviderHash>,
        /// Only records at or after this RFC 3339 time
        #[arg(long)]
        after: Option<DateTime<Utc>>,
        /// Only records at or before this RFC 3339 time
        #[arg(long)]
        before: Option<DateTime<Utc>>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BatchCommands {
    /// Validate batch entries against the registry
    Plan {
        #[arg(long)]
        method: PaymentMethod,
        /// JSON array of {"action", "provider_hash"} (or stdin)
        input: Option<String>,
    },
    /// Plan and write a proposal for the execution layer
    Propose {
        #[arg(long)]
        method: PaymentMethod,
        /// JSON array of {"action", "provider_hash"} (or stdin)
        input: Option<String>,
    },
    /// Apply a proposal to the local registry
    Execute {
        /// Operator performing the mutations
        #[arg(long)]
        caller: Address,
        /// Proposal JSON file (or stdin)
        input: Option<String>,
    },
}

fn parse_action(value: &str) -> Result<RegistryAction, String> {
    match value {
        "add" => Ok(RegistryAction::Add),
        "remove" => Ok(RegistryAction::Remove),
        other => Err(format!("unknown action '{}'; expected add or remove", other)),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = Config::load(&cli.config)
        .map_err(Into::into)
        .and_then(|config| run(&config, cli.command));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Identifier {
            input,
            owner,
            timestamp_s,
            epoch,
            json,
        } => {
            let sign_data = match (owner, timestamp_s, epoch) {
                (Some(owner), Some(timestamp_s), Some(epoch)) => Some(identifier::SignDataArgs {
                    owner,
                    timestamp_s,
                    epoch,
                }),
                _ => None,
            };
            identifier::run(input, sign_data, json)
        }
        Commands::Verify {
            input,
            witnesses,
            threshold,
            method,
            json,
        } => verify::run(
            config,
            verify::VerifyArgs {
                input,
                witnesses,
                threshold,
                method,
                json,
            },
        ),
        Commands::Pack {
            identifier,
            profile,
        } => pack::pack(identifier, profile),
        Commands::Unpack { elements, profile } => pack::unpack(elements, profile),
        Commands::Template { action } => match action {
            TemplateCommands::Hash { input, positions } => template::hash(input, positions),
        },
        Commands::Registry { action } => match action {
            RegistryCommands::List { method, json } => registry::list(config, method, json),
            RegistryCommands::Check { method, hash } => registry::check(config, method, hash),
            RegistryCommands::Add {
                method,
                caller,
                hash,
            } => registry::mutate(config, method, caller, hash, RegistryAction::Add),
            RegistryCommands::Remove {
                method,
                caller,
                hash,
            } => registry::mutate(config, method, caller, hash, RegistryAction::Remove),
            RegistryCommands::History {
                method,
                action,
                caller,
                hash,
                after,
                before,
                json,
            } => registry::history(
                config,
                registry::HistoryArgs {
                    method,
                    action,
                    caller,
                    hash,
                    after,
                    before,
                    json,
                },
            ),
        },
        Commands::Batch { action } => match action {
            BatchCommands::Plan { method, input } => batch::plan(config, method, input),
            BatchCommands::Propose { method, input } => batch::propose(config, method, input),
            BatchCommands::Execute { caller, input } => batch::execute(config, caller, input),
        },
        #[cfg(feature = "dev-tools")]
        Commands::Sign {
            input,
            seeds,
            owner,
            timestamp_s,
            epoch,
        } => commands::sign::run(commands::sign::SignArgs {
            input,
            seeds,
            owner,
            timestamp_s,
            epoch,
        }),
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hawala_send::address::{chains_accepting, classify, decode_prefix};
use hawala_send::send::plan_send;
use hawala_send::utils::init_tracing;
use hawala_send::{ChainRegistry, SendConfig};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "hawala-send")]
#[command(about = "Inspect chain routing for Hawala sends without broadcasting", version)]
struct Cli {
    /// Chain registry JSON file (defaults to the built-in table)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Session configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered chains
    Chains {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Classify an address as JSON
    Classify {
        address: String,
    },

    /// Dry-run the path and route a send would take
    Plan {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Minimal denom of the token to send
        #[arg(long)]
        denom: String,

        /// Active chain key (defaults to the chain owning --from)
        #[arg(long)]
        chain: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<SendConfig> {
    let config = match &cli.config {
        Some(path) => SendConfig::load(path)?,
        None => SendConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(registry) = &cli.registry {
        config.registry_file = Some(registry.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.log_filter);

    let registry = config.load_registry()?;
    debug!(chains = registry.len(), "registry loaded");

    match &cli.command {
        Commands::Chains { json } => print_chains(&registry, *json)?,
        Commands::Classify { address } => print_classification(&registry, address)?,
        Commands::Plan {
            from,
            to,
            denom,
            chain,
        } => {
            let active_key = match chain {
                Some(key) => key.clone(),
                None => decode_prefix(from)
                    .ok()
                    .and_then(|prefix| registry.chain_key_for_prefix(&prefix).map(str::to_string))
                    .unwrap_or_else(|| config.active_chain.clone()),
            };
            let active = registry
                .chain(&active_key)
                .with_context(|| format!("Unknown chain: {}", active_key))?;
            let plan = plan_send(&registry, active, from, to, denom)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}

fn print_chains(registry: &ChainRegistry, as_json: bool) -> Result<()> {
    if as_json {
        let chains: Vec<_> = registry
            .chains()
            .into_iter()
            .map(|c| {
                json!({
                    "key": c.key,
                    "name": c.chain_name,
                    "prefix": c.address_prefix,
                    "family": c.family.label(),
                    "chainId": c.chain_id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&chains)?);
        return Ok(());
    }

    println!("{:<12} {:<8} {:<18} {}", "KEY", "PREFIX", "FAMILY", "NAME");
    for chain in registry.chains() {
        println!(
            "{:<12} {:<8} {:<18} {}",
            chain.key,
            chain.address_prefix,
            chain.family.label(),
            chain.chain_name
        );
    }
    Ok(())
}

fn print_classification(registry: &ChainRegistry, address: &str) -> Result<()> {
    let kind = match classify(registry, address) {
        Ok(kind) => kind,
        Err(e) => bail!("{}", e),
    };
    let accepting: Vec<&str> = chains_accepting(registry, address)
        .into_iter()
        .map(|c| c.key.as_str())
        .collect();

    let output = json!({
        "address": address.trim(),
        "classification": kind,
        "chains": accepting,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

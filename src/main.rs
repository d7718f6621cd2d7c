//! burn-gate command-line front-end.
//!
//! ```text
//! burn-gate [--config FILE] [--json] [--quiet] <command>
//!
//!   burn <ID>... [--yes]   confirm and burn tokens through the gate
//!   owner <ID>             print the current owner
//!   show <ID>              owner, tokenURI and metadata
//!   status                 RPC connectivity and chain ID
//! ```
//!
//! Burning reads the signing key from `BURN_GATE_PRIVATE_KEY`.

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use burn_gate::blockchain::{BlockchainClient, BlockchainError, BurnExecutor, NftContract, Wallet};
use burn_gate::config::{load_or_default, GateConfig};
use burn_gate::gate::{BurnOutcome, BurnService, TokenId, TransactionGate};
use burn_gate::metadata::{MetadataClient, TokenMetadata};
use burn_gate::notify::{ConsoleNotifier, Notifier, TracingNotifier};
use burn_gate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "burn-gate")]
#[command(about = "Guarded NFT burns and gallery lookups", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Hide progress notices; warnings and errors are still shown.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Burn one or more NFTs
    Burn {
        /// Token IDs; non-digit characters are ignored
        #[arg(required = true)]
        token_ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the owner of an NFT
    Owner { token_id: String },
    /// Show owner, token URI and metadata of an NFT
    Show { token_id: String },
    /// Check RPC connectivity and chain ID
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::debug!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.blockchain.contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Burn { token_ids, yes } => {
            burn(&config, &token_ids, yes, cli.json, cli.quiet).await
        }
        Commands::Owner { token_id } => owner(&config, &token_id, cli.json).await,
        Commands::Show { token_id } => show(&config, &token_id, cli.json).await,
        Commands::Status => status(&config, cli.json).await,
    }
}

/// Yes/no confirmation on the terminal, one question at a time.
struct Prompt {
    assume_yes: bool,
    turn: Mutex<()>,
}

impl Prompt {
    fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            turn: Mutex::new(()),
        }
    }

    async fn ask(&self, token_id: TokenId) -> bool {
        if self.assume_yes {
            return true;
        }

        let _turn = self.turn.lock().await;
        let question = format!(
            "Burn NFT with token ID {}? This action cannot be undone. [y/N] ",
            token_id
        );

        tokio::task::spawn_blocking(move || {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "{}", question);
            let _ = stderr.flush();

            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return false;
            }
            matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}

async fn burn(
    config: &GateConfig,
    token_ids: &[String],
    yes: bool,
    json_output: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Wallet::from_env(config.blockchain.chain_id)?;
    let client = BlockchainClient::with_wallet(config.blockchain.clone(), &wallet).await?;
    let executor = Arc::new(BurnExecutor::new(client)?);
    // Under --json, stdout carries results only and notices go to the log.
    let notifier: Arc<dyn Notifier> = if json_output {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier::new(quiet))
    };
    let service = BurnService::new(TransactionGate::new(), executor, notifier);
    let prompt = Prompt::new(yes);

    // Every request is polled right away, so a repeated ID in the same
    // invocation meets the first one's reservation.
    let outcomes: Vec<BurnOutcome> = join_all(
        token_ids
            .iter()
            .map(|raw| service.burn(raw, |token_id| prompt.ask(token_id))),
    )
    .await;

    let mut failed = 0;
    for (raw, outcome) in token_ids.iter().zip(&outcomes) {
        if matches!(outcome, Err(e) if !e.is_cancelled()) {
            failed += 1;
        }
        if json_output {
            println!("{}", burn_json(raw, outcome));
        } else if let Ok(receipt) = outcome {
            println!(
                "{}\t{}\tblock {}\t{}",
                receipt.token_id,
                receipt.tx_hash,
                receipt.block_number.map(|b| b.to_string()).unwrap_or_else(|| "?".into()),
                receipt.verification.label()
            );
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} burn requests failed", failed, token_ids.len()).into());
    }
    Ok(())
}

fn burn_json(raw: &str, outcome: &BurnOutcome) -> serde_json::Value {
    match outcome {
        Ok(receipt) => json!({ "input": raw, "status": "success", "receipt": receipt }),
        Err(e) => json!({ "input": raw, "status": e.label(), "error": e.to_string() }),
    }
}

async fn owner(
    config: &GateConfig,
    raw_id: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let token_id = TokenId::parse(raw_id)?;
    let contract = NftContract::new(BlockchainClient::new(config.blockchain.clone()).await?)?;
    let owner = contract.owner_of(token_id).await?;

    if json_output {
        println!("{}", json!({ "token_id": token_id, "owner": owner }));
    } else {
        println!("{}", owner);
    }
    Ok(())
}

#[derive(Serialize)]
struct TokenView {
    token_id: TokenId,
    owner: Option<String>,
    token_uri: Option<String>,
    metadata: Option<TokenMetadata>,
}

async fn show(
    config: &GateConfig,
    raw_id: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let token_id = TokenId::parse(raw_id)?;
    let contract = NftContract::new(BlockchainClient::new(config.blockchain.clone()).await?)?;

    let owner = match contract.owner_of(token_id).await {
        Ok(owner) => Some(owner.to_string()),
        Err(BlockchainError::NonexistentToken(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let mut view = TokenView {
        token_id,
        owner,
        token_uri: None,
        metadata: None,
    };

    if view.owner.is_some() {
        let token_uri = contract.token_uri(token_id).await?;
        let metadata_client = MetadataClient::new(&config.metadata)?;
        view.metadata = match metadata_client.fetch(&token_uri).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(token_uri = %token_uri, error = %e, "Metadata unavailable");
                None
            }
        };
        view.token_uri = Some(token_uri);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("token     {}", view.token_id);
    match &view.owner {
        Some(owner) => println!("owner     {}", owner),
        None => println!("owner     (burned or never minted)"),
    }
    if let Some(uri) = &view.token_uri {
        println!("uri       {}", uri);
    }
    if let Some(meta) = &view.metadata {
        if let Some(name) = &meta.name {
            println!("name      {}", name);
        }
        if let Some(description) = &meta.description {
            println!("about     {}", description);
        }
        if let Some(image) = meta.image_url.as_ref().or(meta.image.as_ref()) {
            println!("image     {}", image);
        }
    }
    Ok(())
}

async fn status(config: &GateConfig, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let client = BlockchainClient::new(config.blockchain.clone()).await?;
    let chain_id = client.get_chain_id().await?;
    let block = client.get_block_number().await?;
    let healthy = client.is_healthy().await;
    let chain_matches = chain_id.0 == config.blockchain.chain_id;

    if json_output {
        println!(
            "{}",
            json!({
                "rpc_url": config.blockchain.rpc_url,
                "chain_id": chain_id.0,
                "expected_chain_id": config.blockchain.chain_id,
                "chain_matches": chain_matches,
                "block_number": block,
                "healthy": healthy,
            })
        );
    } else {
        println!("rpc       {}", config.blockchain.rpc_url);
        println!(
            "chain     {}{}",
            chain_id.0,
            if chain_matches { "" } else { " (MISMATCH)" }
        );
        println!("block     {}", block);
        println!("contract  {}", config.blockchain.contract_address);
    }

    if !chain_matches {
        return Err(BlockchainError::ChainMismatch {
            expected: config.blockchain.chain_id,
            actual: chain_id.0,
        }
        .into());
    }
    Ok(())
}

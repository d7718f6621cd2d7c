//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the primary JSON-RPC endpoint and its failovers
//! - Query chain state (chain id, blocks, gas price, receipts)
//! - Run read-only contract calls and gas estimation
//! - Submit signed transactions through the primary endpoint
//! - Provide health check for blockchain connectivity

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportError;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Signing address, when a wallet was supplied.
    sender: Option<Address>,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a read-only client.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        Self::connect(config, None).await
    }

    /// Create a client that signs transactions with `wallet`.
    pub async fn with_wallet(config: BlockchainConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        if wallet.chain_id() != config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: config.chain_id,
                actual: wallet.chain_id(),
            });
        }
        Self::connect(config, Some(wallet)).await
    }

    async fn connect(config: BlockchainConfig, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let signer = wallet.map(Wallet::ethereum_wallet);
        let mut providers = Vec::new();

        // 1. Primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(build_provider(primary_url, signer.as_ref()));

        // 2. Failover providers
        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(build_provider(url, signer.as_ref())),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            sender: wallet.map(Wallet::address),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get gas price".to_string()))
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get receipt".to_string()))
    }

    /// Execute a read-only call.
    ///
    /// A revert is returned immediately as [`BlockchainError::Reverted`];
    /// only transport failures move on to the next provider.
    pub async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.call(tx.clone()).into_future();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    if let Some(reason) = revert_reason(&e) {
                        return Err(BlockchainError::Reverted(reason));
                    }
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to execute call".to_string()))
    }

    /// Estimate the gas a transaction would use.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.estimate_gas(tx.clone()).into_future();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    if let Some(reason) = revert_reason(&e) {
                        return Err(BlockchainError::GasEstimation(reason));
                    }
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to estimate gas".to_string()))
    }

    /// Sign and broadcast a transaction through the primary provider.
    ///
    /// Never retried on another endpoint: a timed-out send may still have
    /// reached the mempool.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        if self.sender.is_none() {
            return Err(BlockchainError::NotAvailable(
                "no signing wallet configured".to_string(),
            ));
        }

        let fut = self.providers[0].send_transaction(tx);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
                Ok(tx_hash)
            }
            Ok(Err(e)) => match revert_reason(&e) {
                Some(reason) => Err(BlockchainError::Reverted(reason)),
                None => Err(BlockchainError::Rpc(format!("Failed to send transaction: {}", e))),
            },
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Check if the blockchain is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// Address transactions are signed with, if any.
    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    /// The configured NFT contract address.
    pub fn contract_address(&self) -> BlockchainResult<Address> {
        self.config
            .contract_address
            .parse()
            .map_err(|_| BlockchainError::InvalidAddress(self.config.contract_address.clone()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Number of configured endpoints.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("sender", &self.sender)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

fn build_provider(url: url::Url, signer: Option<&alloy::network::EthereumWallet>) -> DynProvider {
    match signer {
        Some(wallet) => Arc::new(ProviderBuilder::new().wallet(wallet.clone()).connect_http(url))
            as DynProvider,
        None => Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider,
    }
}

/// Extract the revert reason when the node answered with an execution error.
fn revert_reason(error: &TransportError) -> Option<String> {
    let payload = error.as_error_resp()?;
    let revert_data = payload.as_revert_data();
    if revert_data.is_none() && !payload.message.to_lowercase().contains("revert") {
        return None;
    }

    Some(match revert_data {
        Some(data) if !data.is_empty() => format!("{} (data: {})", payload.message, data),
        _ => payload.message.to_string(),
    })
}

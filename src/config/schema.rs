//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file, and
//! every section has defaults so an empty file is a valid configuration
//! pointing at the 0G testnet deployment.

use serde::{Deserialize, Serialize};

/// Root configuration for burn-gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Chain and contract settings.
    pub blockchain: BlockchainConfig,

    /// Token metadata lookup.
    pub metadata: MetadataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// Chain ID (16601 for the 0G testnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address of the NFT contract exposing `burnNFT`.
    pub contract_address: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of blocks (including the inclusion block) before a burn is final.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for a receipt with enough confirmations.
    pub confirmation_timeout_secs: u64,

    /// Base interval between receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Multiplier applied to the gas estimate (1.2 = 20% buffer).
    pub gas_limit_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://evmrpc-testnet.0g.ai".to_string(),
            failover_urls: vec![
                "https://og-testnet-evm.itrocket.net".to_string(),
                "https://lightnode-json-rpc-0g.grandvalleys.com".to_string(),
                "https://0g-json-rpc-public.originstake.com".to_string(),
            ],
            chain_id: 16601,
            contract_address: "0x3ad6ca089c783c637b7049c82aaf317a055fd850".to_string(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
            gas_limit_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Token metadata configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Gateway prefix that `ipfs://` URIs are rewritten to.
    pub ipfs_gateway: String,

    /// HTTP timeout for metadata requests in seconds.
    pub request_timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: "https://gateway.pinata.cloud/ipfs/".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

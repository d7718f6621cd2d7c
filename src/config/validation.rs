//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All errors are collected so a broken file can be fixed in one pass.

use alloy::primitives::Address;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GateConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let chain = &config.blockchain;

    if url::Url::parse(&chain.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a valid URL", chain.rpc_url),
        ));
    }
    for (i, failover) in chain.failover_urls.iter().enumerate() {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError::new(
                &format!("blockchain.failover_urls[{}]", i),
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }
    if chain.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.contract_address",
            format!("'{}' is not a valid address", chain.contract_address),
        ));
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be non-zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_blocks == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_blocks", "must be >= 1"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be > 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be > 0"));
    }
    if !(1.0..=5.0).contains(&chain.gas_limit_multiplier) {
        errors.push(ValidationError::new(
            "blockchain.gas_limit_multiplier",
            "must be between 1.0 and 5.0",
        ));
    }
    if chain.max_gas_price_gwei == 0 {
        errors.push(ValidationError::new("blockchain.max_gas_price_gwei", "must be > 0"));
    }

    let metadata = &config.metadata;
    if url::Url::parse(&metadata.ipfs_gateway).is_err() {
        errors.push(ValidationError::new(
            "metadata.ipfs_gateway",
            format!("'{}' is not a valid URL", metadata.ipfs_gateway),
        ));
    }
    if metadata.request_timeout_secs == 0 {
        errors.push(ValidationError::new("metadata.request_timeout_secs", "must be > 0"));
    }

    let observability = &config.observability;
    if !["trace", "debug", "info", "warn", "error"].contains(&observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GateConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.blockchain.contract_address = "0x1234".to_string();
        config.blockchain.gas_limit_multiplier = 0.5;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "blockchain.rpc_url",
                "blockchain.contract_address",
                "blockchain.gas_limit_multiplier",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_zero_gas_price_ceiling_rejected() {
        let mut config = GateConfig::default();
        config.blockchain.max_gas_price_gwei = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "blockchain.max_gas_price_gwei");
    }

    #[test]
    fn test_bad_failover_url_indexed() {
        let mut config = GateConfig::default();
        config.blockchain.failover_urls.push("::".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "blockchain.failover_urls[3]");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GateConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}

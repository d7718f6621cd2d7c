//! HTTP retrieval of token metadata.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::MetadataConfig;
use crate::metadata::types::{resolve_uri, MetadataError, TokenMetadata};

/// Fetches and caches metadata documents by token URI.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    gateway: String,
    cache: Arc<DashMap<String, TokenMetadata>>,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            gateway: config.ipfs_gateway.clone(),
            cache: Arc::new(DashMap::new()),
        })
    }

    /// Fetch the document behind `token_uri`.
    ///
    /// Successful lookups are cached for the life of the client; failures
    /// are not.
    pub async fn fetch(&self, token_uri: &str) -> Result<TokenMetadata, MetadataError> {
        if let Some(cached) = self.cache.get(token_uri) {
            return Ok(cached.value().clone());
        }

        let url = resolve_uri(token_uri, &self.gateway)?;
        tracing::debug!(token_uri = %token_uri, url = %url, "Fetching token metadata");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let mut metadata: TokenMetadata = response.json().await?;
        metadata.image_url = metadata
            .image
            .as_deref()
            .and_then(|image| resolve_uri(image, &self.gateway).ok());

        self.cache.insert(token_uri.to_string(), metadata.clone());
        Ok(metadata)
    }

    /// Number of cached documents.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_uri_not_cached() {
        let client = MetadataClient::new(&MetadataConfig::default()).unwrap();
        let err = client.fetch("data:application/json,{}").await.unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedUri(_)));
        assert_eq!(client.cached(), 0);
    }
}

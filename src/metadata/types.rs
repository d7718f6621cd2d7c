//! Metadata document and URI handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const IPFS_SCHEME: &str = "ipfs://";

/// ERC-721 metadata JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Image URI as stored in the document (often `ipfs://`).
    #[serde(default)]
    pub image: Option<String>,

    /// `image` rewritten to a fetchable URL. Filled in after download.
    #[serde(default, skip_deserializing)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub attributes: Vec<serde_json::Value>,
}

/// Errors from metadata retrieval.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported metadata URI '{0}'")]
    UnsupportedUri(String),
}

/// Rewrite `ipfs://` URIs onto `gateway`; HTTP(S) URIs pass through.
///
/// Accepts both `ipfs://<cid>` and `ipfs://ipfs/<cid>`.
pub fn resolve_uri(uri: &str, gateway: &str) -> Result<String, MetadataError> {
    let uri = uri.trim();
    if let Some(path) = uri.strip_prefix(IPFS_SCHEME) {
        let path = path.strip_prefix("ipfs/").unwrap_or(path);
        if path.is_empty() {
            return Err(MetadataError::UnsupportedUri(uri.to_string()));
        }
        let gateway = gateway.trim_end_matches('/');
        return Ok(format!("{}/{}", gateway, path));
    }

    if uri.starts_with("https://") || uri.starts_with("http://") {
        return Ok(uri.to_string());
    }

    Err(MetadataError::UnsupportedUri(uri.to_string()))
}

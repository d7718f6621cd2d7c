//! Token metadata lookup for the gallery view.
//!
//! # Data Flow
//! ```text
//! tokenURI(token)          (blockchain::contract)
//!     → resolve_uri        (ipfs:// → configured gateway)
//!     → MetadataClient     (HTTP GET, JSON, cached per URI)
//!     → TokenMetadata      (name, description, image + resolved image URL)
//! ```

pub mod client;
pub mod types;

pub use client::MetadataClient;
pub use types::{resolve_uri, MetadataError, TokenMetadata};

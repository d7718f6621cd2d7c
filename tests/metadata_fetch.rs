//! Metadata retrieval against a mock IPFS gateway.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use burn_gate::config::MetadataConfig;
use burn_gate::metadata::{MetadataClient, MetadataError};

mod common;

fn client_for(gateway: String) -> MetadataClient {
    let config = MetadataConfig {
        ipfs_gateway: gateway,
        request_timeout_secs: 5,
    };
    MetadataClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_resolves_ipfs_and_caches() {
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let addr = common::start_mock_gateway(move |path| {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            if path == "/ipfs/QmToken42" {
                (
                    200,
                    r#"{"name":"Sunset #42","description":"Burnable art","image":"ipfs://QmImage42","attributes":[{"trait_type":"mood","value":"calm"}]}"#.into(),
                )
            } else {
                (404, "not found".into())
            }
        }
    })
    .await;

    let client = client_for(format!("http://{}/ipfs/", addr));

    let metadata = client.fetch("ipfs://QmToken42").await.unwrap();
    assert_eq!(metadata.name.as_deref(), Some("Sunset #42"));
    assert_eq!(
        metadata.image_url,
        Some(format!("http://{}/ipfs/QmImage42", addr))
    );
    assert_eq!(metadata.attributes.len(), 1);

    let again = client.fetch("ipfs://QmToken42").await.unwrap();
    assert_eq!(again, metadata);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(client.cached(), 1);
}

#[tokio::test]
async fn test_missing_document_is_not_cached() {
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let addr = common::start_mock_gateway(move |_| {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            (404, "not found".into())
        }
    })
    .await;

    let client = client_for(format!("http://{}/ipfs/", addr));

    for _ in 0..2 {
        let err = client.fetch("ipfs://QmGone").await.unwrap_err();
        assert!(matches!(err, MetadataError::Status { status: 404, .. }));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(client.cached(), 0);
}

#[tokio::test]
async fn test_http_uri_is_fetched_directly() {
    let addr = common::start_mock_gateway(|path| async move {
        if path == "/meta/7.json" {
            (200, r#"{"name":"Seven"}"#.into())
        } else {
            (404, "not found".into())
        }
    })
    .await;

    let client = client_for("https://gateway.invalid/ipfs/".into());
    let metadata = client
        .fetch(&format!("http://{}/meta/7.json", addr))
        .await
        .unwrap();

    assert_eq!(metadata.name.as_deref(), Some("Seven"));
    assert!(metadata.image_url.is_none());
}

#[tokio::test]
async fn test_unsupported_scheme_rejected_without_request() {
    let client = client_for("https://gateway.invalid/ipfs/".into());
    let err = client.fetch("ar://abcdef").await.unwrap_err();
    assert!(matches!(err, MetadataError::UnsupportedUri(_)));
}

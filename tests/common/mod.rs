//! Shared collaborators for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use burn_gate::blockchain::{BlockchainError, BlockchainResult, BurnReceipt, BurnVerification, TokenBurner};
use burn_gate::notify::{Notifier, Severity};
use burn_gate::TokenId;

/// A verified receipt for `token_id`.
pub fn receipt(token_id: TokenId) -> BurnReceipt {
    BurnReceipt {
        token_id,
        tx_hash: TxHash::repeat_byte(0x5a),
        block_number: Some(1_000),
        gas_used: 48_213,
        verification: BurnVerification::BurnEvent,
    }
}

/// Burner whose calls block until the test releases them.
///
/// Each call announces its token ID on `started`, then waits for one
/// instruction from [`BurnerControl::release`]: `Ok(())` completes the burn,
/// `Err` fails it.
pub struct ControlledBurner {
    started: mpsc::UnboundedSender<TokenId>,
    outcomes: tokio::sync::Mutex<mpsc::UnboundedReceiver<BlockchainResult<()>>>,
    calls: AtomicUsize,
}

pub struct BurnerControl {
    pub started: mpsc::UnboundedReceiver<TokenId>,
    outcomes: mpsc::UnboundedSender<BlockchainResult<()>>,
}

impl BurnerControl {
    pub fn release(&self, outcome: BlockchainResult<()>) {
        let _ = self.outcomes.send(outcome);
    }

    /// Wait until a burn call has started, failing the test after a second.
    pub async fn next_started(&mut self) -> TokenId {
        tokio::time::timeout(Duration::from_secs(1), self.started.recv())
            .await
            .expect("burn did not start in time")
            .expect("burner dropped")
    }
}

impl ControlledBurner {
    pub fn new() -> (Arc<Self>, BurnerControl) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let burner = Arc::new(Self {
            started: started_tx,
            outcomes: tokio::sync::Mutex::new(outcome_rx),
            calls: AtomicUsize::new(0),
        });
        let control = BurnerControl {
            started: started_rx,
            outcomes: outcome_tx,
        };
        (burner, control)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenBurner for ControlledBurner {
    async fn burn(&self, token_id: TokenId) -> BlockchainResult<BurnReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.send(token_id);

        let next = self.outcomes.lock().await.recv().await;
        match next {
            Some(Ok(())) => Ok(receipt(token_id)),
            Some(Err(e)) => Err(e),
            None => Err(BlockchainError::NotAvailable("test finished".into())),
        }
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct MemoryNotifier {
    events: Mutex<Vec<(String, Severity)>>,
}

impl MemoryNotifier {
    pub fn events(&self) -> Vec<(String, Severity)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events().iter().filter(|(_, s)| *s == severity).count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.events.lock().unwrap().push((message.to_string(), severity));
    }
}

/// Confirmation callback that counts how often it is asked.
#[derive(Clone, Default)]
pub struct CountingConfirm {
    asked: Arc<AtomicUsize>,
}

impl CountingConfirm {
    pub fn answer(&self, accept: bool) -> impl FnOnce(TokenId) -> std::future::Ready<bool> {
        let asked = self.asked.clone();
        move |_| {
            asked.fetch_add(1, Ordering::SeqCst);
            std::future::ready(accept)
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

/// Start a mock HTTP server on an ephemeral port.
///
/// `f` receives the request path and returns a status code and body.
pub async fn start_mock_gateway<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

//! Bindings for the gallery NFT contract.
//!
//! Only the surface the burn flow and the gallery view touch is declared:
//! `ownerOf`, `tokenURI`, `burnNFT`, and the two events a burn can emit.

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::gate::TokenId;

sol! {
    function ownerOf(uint256 tokenId) external view returns (address owner);

    function tokenURI(uint256 tokenId) external view returns (string uri);

    function burnNFT(uint256 tokenId) external;

    /// Emitted by the gallery contract when a token is burned.
    #[derive(Debug)]
    event NFTBurned(uint256 indexed tokenId, address indexed owner);

    /// Standard ERC-721 transfer; a burn transfers to the zero address.
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

/// Revert fragments meaning "this token does not exist".
///
/// Covers the OpenZeppelin v4 messages and the v5 `ERC721NonexistentToken`
/// custom error selector.
const NONEXISTENT_MARKERS: &[&str] = &[
    "nonexistent token",
    "invalid token id",
    "erc721nonexistenttoken",
    "0x7e273289",
];

/// Whether a revert reason reports a missing token.
pub fn is_nonexistent_token(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    NONEXISTENT_MARKERS.iter().any(|marker| reason.contains(marker))
}

/// Read and encode calls against the configured NFT contract.
#[derive(Debug, Clone)]
pub struct NftContract {
    client: BlockchainClient,
    address: Address,
}

impl NftContract {
    pub fn new(client: BlockchainClient) -> BlockchainResult<Self> {
        let address = client.contract_address()?;
        Ok(Self { client, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }

    /// Current owner of `token_id`.
    pub async fn owner_of(&self, token_id: TokenId) -> BlockchainResult<Address> {
        let call = ownerOfCall {
            tokenId: token_id.as_u256(),
        };
        let output = self
            .client
            .call(self.request(call.abi_encode()))
            .await
            .map_err(|e| map_missing_token(e, token_id))?;

        ownerOfCall::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Rpc(format!("Malformed ownerOf response: {}", e)))
    }

    /// Metadata URI of `token_id`.
    pub async fn token_uri(&self, token_id: TokenId) -> BlockchainResult<String> {
        let call = tokenURICall {
            tokenId: token_id.as_u256(),
        };
        let output = self
            .client
            .call(self.request(call.abi_encode()))
            .await
            .map_err(|e| map_missing_token(e, token_id))?;

        tokenURICall::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Rpc(format!("Malformed tokenURI response: {}", e)))
    }

    /// Unsigned `burnNFT(token_id)` transaction from `from`.
    pub fn burn_request(&self, token_id: TokenId, from: Address) -> TransactionRequest {
        let call = burnNFTCall {
            tokenId: token_id.as_u256(),
        };
        self.request(call.abi_encode()).with_from(from)
    }

    fn request(&self, input: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(input)
    }
}

fn map_missing_token(error: BlockchainError, token_id: TokenId) -> BlockchainError {
    match error {
        BlockchainError::Reverted(reason) if is_nonexistent_token(&reason) => {
            BlockchainError::NonexistentToken(token_id)
        }
        other => other,
    }
}

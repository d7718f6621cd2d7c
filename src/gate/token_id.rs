//! Normalization of user-supplied token identifiers.
//!
//! Identifiers arrive as free text (button attributes, URL fragments, CLI
//! arguments). Every non-digit character is stripped and the remaining digits
//! must form a positive 256-bit integer, so `"#42"`, `"token-42"` and `"042"`
//! all name the same token.

use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A validated, strictly positive ERC-721 token ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(U256);

/// Reasons a raw identifier does not reduce to a token ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdError {
    /// Nothing left after stripping non-digit characters.
    #[error("token ID must contain numeric characters (got {0:?})")]
    NoDigits(String),

    /// The digits parse to zero.
    #[error("token ID must be a positive number")]
    NotPositive,

    /// More digits than a uint256 can hold.
    #[error("token ID {0} does not fit in 256 bits")]
    Overflow(String),
}

impl TokenId {
    /// Build a token ID from a native integer.
    pub fn new(value: u64) -> Result<Self, TokenIdError> {
        if value == 0 {
            return Err(TokenIdError::NotPositive);
        }
        Ok(Self(U256::from(value)))
    }

    /// Normalize free text into a token ID.
    pub fn parse(raw: &str) -> Result<Self, TokenIdError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(TokenIdError::NoDigits(raw.to_string()));
        }

        let value = U256::from_str_radix(&digits, 10)
            .map_err(|_| TokenIdError::Overflow(digits.clone()))?;
        if value.is_zero() {
            return Err(TokenIdError::NotPositive);
        }

        Ok(Self(value))
    }

    /// The ID as an ABI `uint256`.
    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TokenId> for U256 {
    fn from(id: TokenId) -> Self {
        id.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Decimal rather than U256's hex encoding, to match what users type.
impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//! Identifiers - Addresses, tokens and trading pairs
//!
//! Callers are identified only by an opaque address string presented by the
//! host. The engine never interprets its format beyond basic sanity checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum identifier length in bytes
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Errors that can occur when parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Empty identifier")]
    Empty,

    #[error("Identifier too long (max {max} bytes): {0}", max = MAX_IDENTIFIER_LEN)]
    TooLong(String),

    #[error("Identifier contains whitespace: {0:?}")]
    Whitespace(String),

    #[error("Invalid pair format (expected TOKEN_A/TOKEN_B): {0}")]
    InvalidPair(String),
}

fn validate(raw: &str) -> Result<(), IdentifierError> {
    if raw.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if raw.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong(raw.to_string()));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(IdentifierError::Whitespace(raw.to_string()));
    }
    Ok(())
}

/// Unique address of a trader or administrator.
///
/// # Example
/// ```
/// use tradeguard_core::Address;
///
/// let alice: Address = "SP2ALICE".parse().unwrap();
/// assert_eq!(alice.as_str(), "SP2ALICE");
///
/// assert!("".parse::<Address>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create a new address, rejecting empty or malformed input
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        validate(&raw)?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Token identifier (contract principal, ticker, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        validate(&raw)?;
        if raw.contains('/') {
            return Err(IdentifierError::InvalidPair(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TokenId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TokenId> for String {
    fn from(token: TokenId) -> Self {
        token.0
    }
}

/// Trading pair key for price history.
///
/// The pair is ordered as presented by the caller: `A/B` and `B/A` are
/// distinct histories.
///
/// Format: `TOKEN_A/TOKEN_B`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairId {
    pub token_a: TokenId,
    pub token_b: TokenId,
}

impl PairId {
    pub fn new(token_a: TokenId, token_b: TokenId) -> Self {
        Self { token_a, token_b }
    }

    /// Returns true if both legs name the same token
    pub fn is_degenerate(&self) -> bool {
        self.token_a == self.token_b
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_a, self.token_b)
    }
}

impl FromStr for PairId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('/')
            .ok_or_else(|| IdentifierError::InvalidPair(s.to_string()))?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

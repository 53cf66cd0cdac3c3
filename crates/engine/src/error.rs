//! Fraud engine errors

use thiserror::Error;
use tradeguard_core::{Address, ErrorCode, IdentifierError, PairId, Period, ReasonError};

/// Errors from the fraud engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not authorized: {caller} is not the engine owner")]
    NotAuthorized { caller: Address },

    #[error("Address flagged: {address}")]
    AddressFlagged { address: Address },

    #[error("Invalid pair: {0} trades a token against itself")]
    InvalidPair(PairId),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid flag reason: {0}")]
    InvalidReason(#[from] ReasonError),

    #[error("Stale period: {period} is older than the latest committed period {latest}")]
    StalePeriod { period: Period, latest: Period },

    #[error("Engine not initialized: journal has no genesis event")]
    NotInitialized,

    #[error("Engine already initialized at sequence {0}")]
    AlreadyInitialized(u64),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

impl EngineError {
    /// Stable numeric code for policy rejections
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            EngineError::NotAuthorized { .. } => Some(ErrorCode::NotAuthorized),
            EngineError::AddressFlagged { .. } => Some(ErrorCode::AddressFlagged),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Configuration loading/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Journal storage errors
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Corrupt journal: {0}")]
    Chain(#[from] ChainError),

    #[error("Journal poisoned after a failed write; reopen to resume")]
    Poisoned,
}

/// Hash chain integrity errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Broken link at sequence {sequence}: expected prev_hash {expected}, got {actual}")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at sequence {sequence}: expected {expected}, got {actual}")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}

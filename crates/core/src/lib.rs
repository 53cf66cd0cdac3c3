//! TradeGuard Core - Domain types
//!
//! This crate contains the fundamental types shared by the fraud engine:
//! - `Address`, `TokenId`, `PairId`: validated identifiers
//! - `Period`: the discrete execution step (block height) keying history
//! - Records: `BlockActivity`, `PricePoint`, `WashScore`, `FlagRecord`
//! - `ErrorCode`: stable numeric codes surfaced to callers

pub mod code;
pub mod ident;
pub mod period;
pub mod record;

pub use code::ErrorCode;
pub use ident::{Address, IdentifierError, PairId, TokenId};
pub use period::Period;
pub use record::{BlockActivity, FlagReason, FlagRecord, PricePoint, ReasonError, WashScore};

//! TradeGuard CLI - operator tool over a journal-backed fraud engine
//!
//! This crate provides the CLI binary and command orchestration.

pub mod commands;
pub mod context;

pub use context::AppContext;

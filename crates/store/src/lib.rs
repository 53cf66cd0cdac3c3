//! TradeGuard State Store
//!
//! Keyed maps whose reads never fail: an absent key yields the record's
//! zero value. Two shapes are provided:
//!
//! - [`KeyedStore`] - one record per key (wash scores, flags)
//! - [`WindowedStore`] - one record per (key, period), keeping only the most
//!   recent `retention` periods per key (activity, price history)

pub mod keyed;
pub mod windowed;

pub use keyed::KeyedStore;
pub use windowed::WindowedStore;

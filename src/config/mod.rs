//! Configuration module for the chart assistant.

pub mod annotation;
pub mod binance;
pub mod chart;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod feed;
pub mod gemini;
pub mod persistence;
pub mod watchlist;

// Re-export commonly used items
pub use annotation::ANNOTATION;
pub use binance::{BINANCE, BinanceApiConfig};
pub use chart::CHART;
pub use feed::FEED;
pub use gemini::GEMINI;
pub use persistence::PERSISTENCE;
pub use watchlist::{WATCHLIST, WatchlistItem};

//! config/watchlist.rs Instruments offered for one-click chart synthesis.
//!
//! Reference prices only anchor the synthetic fallback when no exchange
//! history is available; they are not quotes.

use crate::domain::MarketType;

pub struct WatchlistItem {
    pub ticker: &'static str,
    pub name: &'static str,
    pub market: MarketType,
    pub reference_price: f64,
}

pub const WATCHLIST: &[WatchlistItem] = &[
    WatchlistItem { ticker: "BTC/USDT", name: "Bitcoin", market: MarketType::Crypto, reference_price: 96_400.0 },
    WatchlistItem { ticker: "ETH/USDT", name: "Ethereum", market: MarketType::Crypto, reference_price: 2_650.0 },
    WatchlistItem { ticker: "RELIANCE", name: "Reliance Ind.", market: MarketType::Equity, reference_price: 2_980.0 },
    WatchlistItem { ticker: "TCS", name: "Tata Consultancy", market: MarketType::Equity, reference_price: 4_120.0 },
    WatchlistItem { ticker: "HDFCBANK", name: "HDFC Bank", market: MarketType::Equity, reference_price: 1_450.0 },
    WatchlistItem { ticker: "EUR/USD", name: "Euro", market: MarketType::Forex, reference_price: 1.0854 },
    WatchlistItem { ticker: "GBP/USD", name: "Pound", market: MarketType::Forex, reference_price: 1.2650 },
    WatchlistItem { ticker: "USD/JPY", name: "Yen", market: MarketType::Forex, reference_price: 151.24 },
];

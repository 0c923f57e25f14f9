use serde::{Deserialize, Serialize};

use crate::utils::TimeUtils;

/// A display symbol ("BTC/USDT", "EURUSD", "AAPL") paired with a candle interval.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct SymbolInterval {
    pub name: String,
    pub interval_ms: i64,
}

impl SymbolInterval {
    pub fn new(name: impl Into<String>, interval_ms: i64) -> Self {
        Self {
            name: name.into(),
            interval_ms,
        }
    }

    /// The name we pass into the exchange API: separators removed, uppercased.
    /// "btc/usdt" -> "BTCUSDT"
    pub fn exchange_name(&self) -> String {
        Self::to_exchange_name(&self.name)
    }

    pub fn to_exchange_name(text: &str) -> String {
        text.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    }
}

impl std::fmt::Display for SymbolInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} · {}",
            self.name,
            TimeUtils::interval_to_string(self.interval_ms)
        )
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Which source drives a feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum InstrumentClass {
    /// Exchange WebSocket stream (crypto pairs)
    Live,
    /// Local random-walk timer (equities, FX)
    Simulated,
}

/// Category of tradable symbol. Decides the feed source and price formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum MarketType {
    Crypto,
    Equity,
    Forex,
}

impl MarketType {
    pub fn instrument_class(&self) -> InstrumentClass {
        match self {
            MarketType::Crypto => InstrumentClass::Live,
            MarketType::Equity | MarketType::Forex => InstrumentClass::Simulated,
        }
    }
}

/// One normalized price/volume update. Each tick replaces the previous one
/// for its symbol wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTick {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub is_up: bool,
    pub instrument_class: InstrumentClass,
}

/// (current - reference) / reference * 100, or 0 when the reference is zero.
pub fn percent_change(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_against_open() {
        assert!((percent_change(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert!((percent_change(90.0, 100.0) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn percent_change_with_zero_reference_is_flat() {
        assert_eq!(percent_change(5.0, 0.0), 0.0);
    }

    #[test]
    fn crypto_is_the_only_live_market() {
        assert_eq!(MarketType::Crypto.instrument_class(), InstrumentClass::Live);
        assert_eq!(MarketType::Equity.instrument_class(), InstrumentClass::Simulated);
        assert_eq!(MarketType::Forex.instrument_class(), InstrumentClass::Simulated);
    }
}

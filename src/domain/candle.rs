use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLC bar. Used for chart synthesis only, so no quote volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub base_volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        open_time_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        base_volume: f64,
    ) -> Self {
        Candle {
            open_time_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_volume,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close_price >= self.open_price {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open_price, self.close_price),
            CandleType::Bearish => (self.close_price, self.open_price),
        }
    }

    /// High/low must enclose the body
    pub fn is_consistent(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.low_price <= body_low && self.high_price >= body_high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearish_body_range_is_close_to_open() {
        let candle = Candle::new(0, 105.0, 110.0, 95.0, 100.0, 1.0);
        assert_eq!(candle.get_type(), CandleType::Bearish);
        assert_eq!(candle.body_range(), (100.0, 105.0));
        assert!(candle.is_consistent());
    }

    #[test]
    fn flat_candle_counts_as_bullish() {
        let candle = Candle::new(0, 100.0, 100.0, 100.0, 100.0, 0.0);
        assert_eq!(candle.get_type(), CandleType::Bullish);
    }

    #[test]
    fn wick_inside_body_is_inconsistent() {
        let candle = Candle::new(0, 100.0, 101.0, 99.5, 102.0, 1.0);
        assert!(!candle.is_consistent());
    }
}

//! Anchored random walk, used when no exchange history exists.

use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CHART;
use crate::domain::Candle;
use crate::utils::now_timestamp_ms;

use super::{CandleRequest, CandleSource};

pub struct SyntheticCandles {
    volatility: f64,
    rng: Mutex<StdRng>,
}

impl Default for SyntheticCandles {
    fn default() -> Self {
        Self::with_rng(StdRng::seed_from_u64(rand::random()))
    }
}

impl SyntheticCandles {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            volatility: CHART.synthetic_volatility,
            rng: Mutex::new(rng),
        }
    }

    /// `count` candles starting at `anchor`, the last one closing
    /// one interval before `end_ms`.
    pub fn generate(&self, anchor: f64, count: usize, interval_ms: i64, end_ms: i64) -> Vec<Candle> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let step = anchor * self.volatility;
        let mut price = anchor;

        (0..count)
            .map(|i| {
                let open = price;
                let close = open + rng.random_range(-1.0..1.0) * step;
                let high = open.max(close) + rng.random::<f64>() * step * 0.5;
                let low = open.min(close) - rng.random::<f64>() * step * 0.5;
                price = close;
                let open_time_ms = end_ms - (count - i) as i64 * interval_ms;
                Candle::new(open_time_ms, open, high, low, close, 0.0)
            })
            .collect()
    }
}

#[async_trait]
impl CandleSource for SyntheticCandles {
    fn signature(&self) -> &'static str {
        "Synthetic"
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>> {
        if !(request.reference_price.is_finite() && request.reference_price > 0.0) {
            bail!(
                "{} has no usable reference price ({})",
                request.symbol,
                request.reference_price
            );
        }
        Ok(self.generate(
            request.reference_price,
            request.limit,
            request.symbol.interval_ms,
            now_timestamp_ms(),
        ))
    }
}

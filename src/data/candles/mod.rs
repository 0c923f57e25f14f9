//! Historical candles for chart synthesis.
//!
//! Sources are tried in order; the first that returns a non-empty series wins.
pub mod binance;
pub mod synthetic;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::config::CHART;
use crate::domain::{Candle, MarketType, SymbolInterval};

pub use binance::BinanceCandles;
pub use synthetic::SyntheticCandles;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// What a chart is being synthesized for.
#[derive(Debug, Clone)]
pub struct CandleRequest {
    pub symbol: SymbolInterval,
    pub market: MarketType,
    /// Anchor for synthesized series when no history is available
    pub reference_price: f64,
    pub limit: usize,
}

impl CandleRequest {
    pub fn new(ticker: &str, market: MarketType, reference_price: f64) -> Self {
        Self {
            symbol: SymbolInterval::new(ticker, CHART.interval_ms),
            market,
            reference_price,
            limit: CHART.candle_count,
        }
    }
}

#[async_trait]
pub trait CandleSource: Send + Sync {
    // Either an ordered (oldest first) candle series OR an anyhow::Error
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>>;

    /// Identifies which source produced the data.
    fn signature(&self) -> &'static str;
}

/// Binance for crypto, synthetic otherwise (and as the fallback).
pub fn default_sources() -> Vec<Box<dyn CandleSource>> {
    vec![Box::new(BinanceCandles), Box::new(SyntheticCandles::default())]
}

pub async fn get_candles_async(
    sources: &[Box<dyn CandleSource>],
    request: &CandleRequest,
) -> Result<(Vec<Candle>, &'static str)> {
    for source in sources {
        match source.fetch_candles(request).await {
            Ok(candles) if !candles.is_empty() => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_candle_sources {
                    log::info!(
                        "{} candles for {} from {}",
                        candles.len(),
                        request.symbol,
                        source.signature()
                    );
                }
                return Ok((candles, source.signature()));
            }
            Ok(_) => {
                log::info!("{} returned no candles for {}", source.signature(), request.symbol);
            }
            Err(e) => {
                log::info!("{} failed for {}: {:#}", source.signature(), request.symbol, e);
            }
        }
    }
    Err(anyhow!("All candle sources failed for {}", request.symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Failing;
    #[async_trait]
    impl CandleSource for Failing {
        async fn fetch_candles(&self, _request: &CandleRequest) -> Result<Vec<Candle>> {
            bail!("offline")
        }
        fn signature(&self) -> &'static str {
            "Failing"
        }
    }

    struct Empty;
    #[async_trait]
    impl CandleSource for Empty {
        async fn fetch_candles(&self, _request: &CandleRequest) -> Result<Vec<Candle>> {
            Ok(Vec::new())
        }
        fn signature(&self) -> &'static str {
            "Empty"
        }
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn falls_through_to_synthetic() {
        let sources: Vec<Box<dyn CandleSource>> = vec![
            Box::new(Failing),
            Box::new(Empty),
            Box::new(SyntheticCandles::seeded(7)),
        ];
        let request = CandleRequest::new("TCS", MarketType::Equity, 4120.0);
        let (candles, signature) = block_on(get_candles_async(&sources, &request)).unwrap();
        assert_eq!(signature, "Synthetic");
        assert_eq!(candles.len(), CHART.candle_count);
    }

    #[test]
    fn all_failing_is_an_error() {
        let sources: Vec<Box<dyn CandleSource>> = vec![Box::new(Failing), Box::new(Empty)];
        let request = CandleRequest::new("TCS", MarketType::Equity, 4120.0);
        assert!(block_on(get_candles_async(&sources, &request)).is_err());
    }

    #[test]
    fn binance_declines_non_crypto_without_network() {
        let request = CandleRequest::new("EUR/USD", MarketType::Forex, 1.08);
        assert!(block_on(BinanceCandles.fetch_candles(&request)).is_err());
    }
}

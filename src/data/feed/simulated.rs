//! Random-walk price generator for instruments without a public stream.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FEED;
use crate::domain::market_tick::percent_change;
use crate::domain::{InstrumentClass, MarketTick};

use super::sink::TickSink;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Runtime copy of `FEED.simulated` so tests can speed the clock up.
#[derive(Debug, Clone)]
pub struct SimulatedParams {
    pub tick_interval: Duration,
    pub max_delta: f64,
    pub base_price_min: f64,
    pub base_price_max: f64,
    pub high_low_band: f64,
    pub max_volume: f64,
}

impl Default for SimulatedParams {
    fn default() -> Self {
        let s = &FEED.simulated;
        Self {
            tick_interval: s.tick_interval,
            max_delta: s.max_delta,
            base_price_min: s.base_price_min,
            base_price_max: s.base_price_max,
            high_low_band: s.high_low_band,
            max_volume: s.max_volume,
        }
    }
}

pub struct SimulatedMarket {
    symbol: String,
    base_price: f64,
    price: f64,
    params: SimulatedParams,
    rng: StdRng,
}

impl SimulatedMarket {
    /// Seeds the base price uniformly from the configured range.
    pub fn new(symbol: &str, params: SimulatedParams, mut rng: StdRng) -> Self {
        let base_price = if params.base_price_max > params.base_price_min {
            rng.random_range(params.base_price_min..params.base_price_max)
        } else {
            params.base_price_min
        };
        Self::with_base_price(symbol, base_price, params, rng)
    }

    pub fn with_base_price(symbol: &str, base_price: f64, params: SimulatedParams, rng: StdRng) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            base_price,
            price: base_price,
            params,
            rng,
        }
    }

    pub fn from_entropy(symbol: &str, params: SimulatedParams) -> Self {
        Self::new(symbol, params, StdRng::seed_from_u64(rand::random()))
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Moves the price by at most `max_delta` and reports change against the
    /// original base, not the previous tick.
    pub fn next_tick(&mut self) -> MarketTick {
        let max_delta = self.params.max_delta.abs();
        if max_delta > 0.0 {
            self.price += self.rng.random_range(-max_delta..=max_delta);
        }

        let volume = if self.params.max_volume > 0.0 {
            self.rng.random_range(0.0..self.params.max_volume).floor()
        } else {
            0.0
        };
        let change_percent = percent_change(self.price, self.base_price);

        MarketTick {
            symbol: self.symbol.clone(),
            price: self.price,
            change_percent,
            high: self.price + self.params.high_low_band,
            low: self.price - self.params.high_low_band,
            volume,
            is_up: change_percent >= 0.0,
            instrument_class: InstrumentClass::Simulated,
        }
    }
}

/// Timer loop: one tick straight away, then one per interval until the sink
/// reports teardown.
pub(crate) async fn run_simulated_feed(mut market: SimulatedMarket, interval: Duration, sink: TickSink) {
    if !sink.mark_connected() {
        return;
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_feed_lifecycle {
        log::info!(
            "[feed] simulated {} armed (base {:.2}, every {:?})",
            market.symbol,
            market.base_price,
            interval
        );
    }

    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        timer.tick().await;
        let tick = market.next_tick();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_feed_ticks {
            log::info!("[sim-tick] {} -> {:.4}", tick.symbol, tick.price);
        }

        if !sink.emit(tick) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_delta: f64) -> SimulatedParams {
        SimulatedParams {
            tick_interval: Duration::from_millis(1),
            max_delta,
            ..SimulatedParams::default()
        }
    }

    #[test]
    fn base_price_is_drawn_from_configured_range() {
        for seed in 0..50 {
            let market = SimulatedMarket::new("aapl", params(0.25), StdRng::seed_from_u64(seed));
            assert!(market.base_price() >= 50.0 && market.base_price() < 150.0);
        }
    }

    #[test]
    fn every_tick_stays_within_per_tick_delta() {
        let max_delta = 0.25;
        let base = 100.0;
        let mut market =
            SimulatedMarket::with_base_price("TSLA", base, params(max_delta), StdRng::seed_from_u64(7));

        let mut previous = base;
        for n in 1..=500 {
            let tick = market.next_tick();
            assert!((tick.price - previous).abs() <= max_delta + 1e-12);
            // n ticks can never drift further than n * max_delta from the base
            assert!((tick.price - base).abs() <= n as f64 * max_delta + 1e-9);
            previous = tick.price;
        }
    }

    #[test]
    fn tick_fields_follow_price_and_base() {
        let mut market =
            SimulatedMarket::with_base_price("msft", 80.0, params(0.25), StdRng::seed_from_u64(1));
        let tick = market.next_tick();

        assert_eq!(tick.symbol, "MSFT");
        assert_eq!(tick.high, tick.price + 2.0);
        assert_eq!(tick.low, tick.price - 2.0);
        assert!(tick.volume >= 0.0 && tick.volume < 1_000_000.0);
        assert_eq!(tick.is_up, tick.price >= 80.0);
        assert!((tick.change_percent - (tick.price - 80.0) / 80.0 * 100.0).abs() < 1e-9);
        assert_eq!(tick.instrument_class, InstrumentClass::Simulated);
    }

    #[test]
    fn zero_volatility_holds_price() {
        let mut market =
            SimulatedMarket::with_base_price("EURUSD", 1.08, params(0.0), StdRng::seed_from_u64(3));
        for _ in 0..10 {
            assert_eq!(market.next_tick().price, 1.08);
        }
    }
}

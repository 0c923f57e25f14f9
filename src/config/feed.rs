//! Live/simulated feed configuration.

use std::time::Duration;

/// Knobs for the simulated (non-crypto) price generator
pub struct SimulatedFeedSettings {
    /// Time between simulated ticks
    pub tick_interval: Duration,
    /// Per-tick price move is uniform in [-max_delta, +max_delta]
    pub max_delta: f64,
    /// Range the seeded base price is drawn from (low inclusive, high exclusive)
    pub base_price_min: f64,
    pub base_price_max: f64,
    /// Reported high/low sit this far either side of the current price
    pub high_low_band: f64,
    /// Reported volume is drawn from [0, max_volume)
    pub max_volume: f64,
}

pub struct FeedSettings {
    /// Symbol the live widget opens with
    pub default_live_symbol: &'static str,
    /// Symbol used when switching the widget to simulated instruments
    pub default_simulated_symbol: &'static str,
    pub simulated: SimulatedFeedSettings,
}

pub const FEED: FeedSettings = FeedSettings {
    default_live_symbol: "BTCUSDT",
    default_simulated_symbol: "AAPL",
    simulated: SimulatedFeedSettings {
        tick_interval: Duration::from_millis(1000),
        max_delta: 0.25,
        base_price_min: 50.0,
        base_price_max: 150.0,
        high_low_band: 2.0,
        max_volume: 1_000_000.0,
    },
};

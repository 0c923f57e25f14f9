use itertools::{Itertools, MinMaxResult};

use crate::domain::Candle;

/// Linearly maps `value` from [in_min, in_max] onto [out_min, out_max].
/// A degenerate input range maps everything to the middle of the output range.
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span.abs() < f64::EPSILON {
        return (out_min + out_max) / 2.0;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Lowest low and highest high across the series.
pub fn price_extent(candles: &[Candle]) -> Option<(f64, f64)> {
    match candles
        .iter()
        .flat_map(|c| [c.low_price, c.high_price])
        .minmax_by(f64::total_cmp)
    {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(low, high) => Some((low, high)),
    }
}

//! Raw exchange frame -> `MarketTick`. No transport in here.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::market_tick::percent_change;
use crate::domain::{InstrumentClass, MarketTick};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed ticker frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Binance `<symbol>@miniTicker` payload. Prices arrive as strings.
#[derive(Debug, Deserialize)]
struct MiniTickerData {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "c")]
    close_price: String,
    #[serde(rename = "o")]
    open_price: String,
    #[serde(rename = "h")]
    high_price: String,
    #[serde(rename = "l")]
    low_price: String,
    #[serde(rename = "v")]
    base_volume: String,
}

/// Combined-stream envelope (`/stream?streams=...`)
#[derive(Debug, Deserialize)]
struct CombinedStreamMessage {
    #[serde(rename = "stream")]
    _stream: String,
    data: MiniTickerData,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TickerFrame {
    Combined(CombinedStreamMessage),
    Single(MiniTickerData),
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, FeedError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Normalizes one mini-ticker frame (single or combined stream form).
pub fn parse_mini_ticker(raw: &str) -> Result<MarketTick, FeedError> {
    let data = match serde_json::from_str::<TickerFrame>(raw)? {
        TickerFrame::Combined(wrapper) => wrapper.data,
        TickerFrame::Single(data) => data,
    };

    let price = parse_field("c", &data.close_price)?;
    let open = parse_field("o", &data.open_price)?;

    Ok(MarketTick {
        symbol: data.symbol,
        price,
        change_percent: percent_change(price, open),
        high: parse_field("h", &data.high_price)?,
        low: parse_field("l", &data.low_price)?,
        volume: parse_field("v", &data.base_volume)?,
        is_up: price >= open,
        instrument_class: InstrumentClass::Live,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{"e":"24hrMiniTicker","E":1700000000000,"s":"BTCUSDT","c":"110.00","o":"100.00","h":"115.5","l":"98.25","v":"1234.5","q":"135000.0"}"#;

    #[test]
    fn single_stream_frame_normalizes() {
        let tick = parse_mini_ticker(FRAME).unwrap();
        assert_eq!(tick.symbol, "BTCUSDT");
        assert_eq!(tick.price, 110.0);
        assert!((tick.change_percent - 10.0).abs() < 1e-9);
        assert_eq!(tick.high, 115.5);
        assert_eq!(tick.low, 98.25);
        assert_eq!(tick.volume, 1234.5);
        assert!(tick.is_up);
        assert_eq!(tick.instrument_class, InstrumentClass::Live);
    }

    #[test]
    fn combined_envelope_normalizes_to_same_tick() {
        let wrapped = format!(r#"{{"stream":"btcusdt@miniTicker","data":{}}}"#, FRAME);
        assert_eq!(parse_mini_ticker(&wrapped).unwrap(), parse_mini_ticker(FRAME).unwrap());
    }

    #[test]
    fn falling_price_is_down() {
        let raw = r#"{"s":"ETHUSDT","c":"90","o":"100","h":"101","l":"89","v":"5"}"#;
        let tick = parse_mini_ticker(raw).unwrap();
        assert!(!tick.is_up);
        assert!((tick.change_percent + 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_open_does_not_produce_nan() {
        let raw = r#"{"s":"NEWUSDT","c":"1.5","o":"0","h":"1.5","l":"0","v":"0"}"#;
        let tick = parse_mini_ticker(raw).unwrap();
        assert_eq!(tick.change_percent, 0.0);
    }

    #[test]
    fn non_numeric_field_is_reported_by_name() {
        let raw = r#"{"s":"BTCUSDT","c":"abc","o":"1","h":"1","l":"1","v":"1"}"#;
        match parse_mini_ticker(raw) {
            Err(FeedError::InvalidNumber { field, value }) => {
                assert_eq!(field, "c");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_fields_are_malformed() {
        assert!(matches!(
            parse_mini_ticker(r#"{"result":null,"id":1}"#),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(parse_mini_ticker("not json"), Err(FeedError::Malformed(_))));
    }
}

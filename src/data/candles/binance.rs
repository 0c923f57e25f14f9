//! Spot klines via the official Binance SDK.

use std::convert::TryFrom;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::errors::ConnectorError;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use thiserror::Error;

use crate::config::{BINANCE, BinanceApiConfig};
use crate::domain::{Candle, MarketType};
use crate::utils::TimeUtils;

use super::{CandleRequest, CandleSource};

#[derive(Debug, Error)]
pub enum KlineError {
    #[error("kline row too short")]
    InvalidLength,
    #[error("kline field `{0}` has an unexpected type")]
    InvalidType(&'static str),
    #[error("kline field `{0}` is not a number")]
    InvalidNumber(&'static str),
    #[error("unsupported interval: {0}ms")]
    UnsupportedInterval(i64),
}

pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, KlineError> {
    match ms {
        TimeUtils::MS_IN_S => Ok(KlinesIntervalEnum::Interval1s),
        TimeUtils::MS_IN_MIN => Ok(KlinesIntervalEnum::Interval1m),
        TimeUtils::MS_IN_3_MIN => Ok(KlinesIntervalEnum::Interval3m),
        TimeUtils::MS_IN_5_MIN => Ok(KlinesIntervalEnum::Interval5m),
        TimeUtils::MS_IN_15_MIN => Ok(KlinesIntervalEnum::Interval15m),
        TimeUtils::MS_IN_30_MIN => Ok(KlinesIntervalEnum::Interval30m),
        TimeUtils::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        TimeUtils::MS_IN_2_H => Ok(KlinesIntervalEnum::Interval2h),
        TimeUtils::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        TimeUtils::MS_IN_6_H => Ok(KlinesIntervalEnum::Interval6h),
        TimeUtils::MS_IN_8_H => Ok(KlinesIntervalEnum::Interval8h),
        TimeUtils::MS_IN_12_H => Ok(KlinesIntervalEnum::Interval12h),
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        TimeUtils::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        TimeUtils::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        TimeUtils::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(KlineError::UnsupportedInterval(ms)),
    }
}

fn price_field(item: Option<KlinesItemInner>, field: &'static str) -> Result<f64, KlineError> {
    match item.ok_or(KlineError::InvalidLength)? {
        KlinesItemInner::String(s) => s.parse::<f64>().map_err(|_| KlineError::InvalidNumber(field)),
        _ => Err(KlineError::InvalidType(field)),
    }
}

/// Klines rows are `[open_time, open, high, low, close, volume, close_time, ...]`.
pub struct KlineRow(pub Vec<KlinesItemInner>);

impl TryFrom<KlineRow> for Candle {
    type Error = KlineError;

    fn try_from(row: KlineRow) -> Result<Self, Self::Error> {
        let mut items = row.0.into_iter();
        let open_time_ms = match items.next().ok_or(KlineError::InvalidLength)? {
            KlinesItemInner::Integer(t) => t,
            _ => return Err(KlineError::InvalidType("open_time")),
        };
        let open = price_field(items.next(), "open")?;
        let high = price_field(items.next(), "high")?;
        let low = price_field(items.next(), "low")?;
        let close = price_field(items.next(), "close")?;
        let volume = price_field(items.next(), "volume")?;
        Ok(Candle::new(open_time_ms, open, high, low, close, volume))
    }
}

pub fn convert_klines(rows: Vec<Vec<KlinesItemInner>>) -> Result<Vec<Candle>, KlineError> {
    rows.into_iter().map(|r| Candle::try_from(KlineRow(r))).collect()
}

fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    Ok(SpotRestApi::production(rest_conf))
}

fn describe_connector_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ConnectorError>() {
        Some(ConnectorError::TooManyRequestsError(msg)) => format!("rate limited: {}", msg),
        Some(ConnectorError::RateLimitBanError(msg)) => format!("IP banned: {}", msg),
        Some(ConnectorError::NetworkError(msg)) => format!("network error: {}", msg),
        Some(ConnectorError::BadRequestError(msg)) => format!("bad request: {}", msg),
        Some(ConnectorError::ServerError { msg, status_code }) => {
            format!("server error {:?}: {}", status_code, msg)
        }
        Some(other) => other.to_string(),
        None => format!("{:#}", e),
    }
}

/// Most recent `limit` klines for a Binance spot pair, oldest first.
pub async fn fetch_candles(symbol: &str, interval_ms: i64, limit: usize) -> Result<Vec<Candle>> {
    let interval = try_interval_from_ms(interval_ms)?;
    let limit = (limit as i32).clamp(1, BINANCE.limits.klines_limit_max);
    let rest_client = configure_binance_client()?;

    let params = KlinesParams::builder(symbol.to_string(), interval)
        .limit(limit)
        .build()?;

    let response = match rest_client.klines(params).await {
        Ok(r) => r,
        Err(e) => {
            let detail = describe_connector_error(&e);
            log::error!("{} klines call failed: {}", symbol, detail);
            bail!("Binance klines call failed for {}: {}", symbol, detail);
        }
    };
    let rows = response.data().await?;
    let mut candles =
        convert_klines(rows).with_context(|| format!("{} kline conversion failed", symbol))?;
    candles.sort_by_key(|c| c.open_time_ms);
    candles.dedup_by_key(|c| c.open_time_ms);
    Ok(candles)
}

pub struct BinanceCandles;

#[async_trait]
impl CandleSource for BinanceCandles {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>> {
        if request.market != MarketType::Crypto {
            bail!("{} is not listed on Binance", request.symbol);
        }
        fetch_candles(
            &request.symbol.exchange_name(),
            request.symbol.interval_ms,
            request.limit,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(t: i64, o: &str, h: &str, l: &str, c: &str) -> Vec<KlinesItemInner> {
        vec![
            KlinesItemInner::Integer(t),
            KlinesItemInner::String(o.into()),
            KlinesItemInner::String(h.into()),
            KlinesItemInner::String(l.into()),
            KlinesItemInner::String(c.into()),
            KlinesItemInner::String("12.5".into()),
            KlinesItemInner::Integer(t + 3_599_999),
        ]
    }

    #[test]
    fn converts_kline_rows() {
        let candles = convert_klines(vec![row(0, "1", "2", "0.5", "1.5")]).unwrap();
        assert_eq!(candles, vec![Candle::new(0, 1.0, 2.0, 0.5, 1.5, 12.5)]);
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(matches!(
            convert_klines(vec![row(0, "1", "2", "0.5", "x")]),
            Err(KlineError::InvalidNumber("close"))
        ));
        let mut bad = row(0, "1", "2", "0.5", "1");
        bad.truncate(3);
        assert!(matches!(convert_klines(vec![bad]), Err(KlineError::InvalidLength)));
    }

    #[test]
    fn hourly_interval_maps() {
        assert!(matches!(
            try_interval_from_ms(TimeUtils::MS_IN_H),
            Ok(KlinesIntervalEnum::Interval1h)
        ));
        assert!(try_interval_from_ms(12_345).is_err());
    }
}

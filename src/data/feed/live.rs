//! WebSocket reader for a single `<symbol>@miniTicker` stream.
//! One connection attempt per subscription: no reconnect, no backoff.

use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::normalize::parse_mini_ticker;
use super::sink::TickSink;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// `{base}/{lowercased-symbol}@{stream}`
pub fn build_stream_url(base_url: &str, symbol: &str, stream: &str) -> String {
    format!(
        "{}/{}@{}",
        base_url.trim_end_matches('/'),
        symbol.to_lowercase(),
        stream
    )
}

pub(crate) async fn run_live_stream(url: String, sink: TickSink) {
    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_feed_lifecycle {
        log::info!("Connecting to ticker WebSocket: {}", url);
    }

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            log::error!("Ticker stream connection failed for {}: {}", url, e);
            sink.mark_disconnected();
            return;
        }
    };

    if !sink.mark_connected() {
        // Torn down while the handshake was in flight
        return;
    }

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_feed_lifecycle {
        log::info!("✓ Connected to {}", url);
    }

    let (_write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => match parse_mini_ticker(&text) {
                Ok(tick) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_feed_ticks {
                        log::info!("[price-stream] {} -> {:.6}", tick.symbol, tick.price);
                    }
                    if !sink.emit(tick) {
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("⚠️ Skipping ticker frame: {}", e);
                }
            },
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // WebSocket keepalive - handled automatically
            }
            Ok(Message::Close(_)) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_feed_lifecycle {
                    log::info!("Ticker WebSocket closed by server: {}", url);
                }
                break;
            }
            Err(e) => {
                log::error!("WebSocket error on {}: {}", url, e);
                break;
            }
            _ => {}
        }
    }

    sink.mark_disconnected();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_lowercases_symbol() {
        assert_eq!(
            build_stream_url("wss://stream.binance.com:9443/ws", "BTCUSDT", "miniTicker"),
            "wss://stream.binance.com:9443/ws/btcusdt@miniTicker"
        );
    }

    #[test]
    fn stream_url_tolerates_trailing_slash() {
        assert_eq!(
            build_stream_url("ws://127.0.0.1:9000/ws/", "EthUsdt", "miniTicker"),
            "ws://127.0.0.1:9000/ws/ethusdt@miniTicker"
        );
    }
}

//! Binance-specific configuration constants and types.

/// Configuration for Binance REST API client
/// (This is the runtime struct used by the klines fetcher)
pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// Configuration for REST API limits
pub struct RestLimits {
    /// Hard ceiling Binance accepts for a single klines request
    pub klines_limit_max: i32,
}

/// Configuration for WebSocket Connections
pub struct WsConfig {
    /// WebSocket base URL for Binance single-stream API
    pub base_url: &'static str,
    /// Stream suffix appended to the lowercased symbol
    pub ticker_stream: &'static str,
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    // The public klines endpoint is a one-shot helper, so the SDK should not
    // hammer it when it fails. The synthetic fallback covers us instead.
    pub retries: u32,
    pub backoff_ms: u64,
}

/// The Master Configuration Struct
pub struct BinanceConfig {
    pub limits: RestLimits,
    pub ws: WsConfig,
    pub client: ClientDefaults,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        klines_limit_max: 1000,
    },
    ws: WsConfig {
        base_url: "wss://stream.binance.com:9443/ws",
        ticker_stream: "miniTicker",
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 0,
        backoff_ms: 1000,
    },
};

// Market data: live/simulated ticks and historical candles
pub mod candles;
pub mod feed;

// Re-export commonly used types
pub use candles::{CandleRequest, CandleSource, default_sources, get_candles_async};
pub use feed::{FeedConfig, FeedConnector, Subscription};

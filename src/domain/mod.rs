// Domain types and value objects
pub mod analysis_result;
pub mod candle;
pub mod connection;
pub mod encoded_image;
pub mod market_tick;
pub mod symbol;

// Re-export commonly used types
pub use analysis_result::{AgentAction, AgentDecision, AnalysisResult, DetectedState, Trend};
pub use candle::{Candle, CandleType};
pub use connection::ConnectionState;
pub use encoded_image::{EncodedImage, ImageInputError, supported_extensions};
pub use market_tick::{InstrumentClass, MarketTick, MarketType};
pub use symbol::SymbolInterval;

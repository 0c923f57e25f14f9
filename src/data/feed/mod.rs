// Live market feed: normalization, sources, and the subscription handle
pub mod connector;
pub mod live;
pub mod normalize;
pub mod simulated;
mod sink;

pub use connector::{FeedConfig, FeedConnector, Subscription};
pub use normalize::{FeedError, parse_mini_ticker};
pub use simulated::{SimulatedMarket, SimulatedParams};

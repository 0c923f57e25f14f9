pub mod app_time;
mod maths_utils;
pub mod raster;
mod time_utils;

pub use maths_utils::{price_extent, remap};
pub use time_utils::{TimeUtils, epoch_ms_to_utc, now_timestamp_ms};

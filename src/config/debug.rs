//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep the noisy ones `false` so debug
//! builds stay readable. Every flag is additionally gated by
//! `cfg(debug_assertions)` at the call site.

pub struct DebugFlags {
    /// Emit verbose logging for live feed connections and every tick.
    pub print_feed_ticks: bool,

    /// Emit subscribe / teardown lifecycle events.
    pub print_feed_lifecycle: bool,

    /// Emit request/response sizes for every analysis call.
    pub print_analysis_requests: bool,

    /// Emit the raw model reply text (can be long).
    pub print_analysis_raw_reply: bool,

    /// Emit stroke begin/end events from the annotation canvas.
    pub print_annotation_events: bool,

    /// Emit which candle source produced a synthesized chart.
    pub print_candle_sources: bool,

    /// Emit UI interaction logs (e.g., symbol switching, page changes).
    pub print_ui_interactions: bool,

    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_feed_ticks: false,
    print_feed_lifecycle: true,
    print_analysis_requests: true,
    print_analysis_raw_reply: false,
    print_annotation_events: false,
    print_candle_sources: true,
    print_ui_interactions: true,
    print_shutdown: false,
};

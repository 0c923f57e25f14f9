/// Every user-facing string in one place.
pub struct UiText {
    pub app_title: &'static str,
    pub page_analyzer: &'static str,
    pub page_agent: &'static str,

    // Live market widget
    pub market_heading: &'static str,
    pub market_live_toggle: &'static str,
    pub market_simulated_toggle: &'static str,
    pub market_waiting: &'static str,
    pub market_high: &'static str,
    pub market_low: &'static str,
    pub market_volume: &'static str,
    pub market_symbol_hint: &'static str,

    // Watchlist
    pub watchlist_heading: &'static str,
    pub watchlist_helper: &'static str,
    pub watchlist_loading: &'static str,

    // Input
    pub drop_heading: &'static str,
    pub drop_helper: &'static str,
    pub open_file_button: &'static str,
    pub open_file_filter: &'static str,

    // Annotator
    pub annotate_heading: &'static str,
    pub annotate_helper: &'static str,
    pub annotate_undo: &'static str,
    pub annotate_clear: &'static str,
    pub annotate_cancel: &'static str,
    pub annotate_confirm_analyzer: &'static str,
    pub annotate_confirm_agent: &'static str,

    // Results
    pub analyzing: &'static str,
    pub new_analysis: &'static str,
    pub result_confidence: &'static str,
    pub result_trend: &'static str,
    pub result_support: &'static str,
    pub result_resistance: &'static str,
    pub result_analysis: &'static str,
    pub result_advice: &'static str,
    pub result_source_image: &'static str,
    pub result_candles_through: &'static str,
    pub label_support_line: &'static str,
    pub label_resistance_line: &'static str,
    pub label_candles: &'static str,
    pub label_last_price: &'static str,

    // Agent
    pub agent_context_heading: &'static str,
    pub agent_context_hint: &'static str,
    pub agent_action: &'static str,
    pub agent_reward_risk: &'static str,
    pub agent_entry: &'static str,
    pub agent_stop: &'static str,
    pub agent_target: &'static str,
    pub agent_reasoning: &'static str,
    pub agent_state: &'static str,
    pub agent_volatility: &'static str,
    pub agent_key_levels: &'static str,

    pub error_no_api_key: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Pattern Pro",
    page_analyzer: "Analyzer",
    page_agent: "Agent",

    market_heading: "Live Market",
    market_live_toggle: "Crypto (live)",
    market_simulated_toggle: "Simulated",
    market_waiting: "Waiting for first tick...",
    market_high: "High",
    market_low: "Low",
    market_volume: "Volume",
    market_symbol_hint: "Symbol, e.g. BTCUSDT",

    watchlist_heading: "Watchlist",
    watchlist_helper: "Click an instrument to generate its chart",
    watchlist_loading: "Generating chart...",

    drop_heading: "Drop a chart image here",
    drop_helper: "PNG, JPEG, GIF, WebP or BMP",
    open_file_button: "Open image...",
    open_file_filter: "Images",

    annotate_heading: "Annotate Chart",
    annotate_helper: "Draw trendlines or support/resistance zones before analyzing",
    annotate_undo: "Undo",
    annotate_clear: "Clear",
    annotate_cancel: "Cancel",
    annotate_confirm_analyzer: "Analyze",
    annotate_confirm_agent: "Consult Agent",

    analyzing: "Analyzing chart...",
    new_analysis: "New analysis",
    result_confidence: "Confidence",
    result_trend: "Trend",
    result_support: "Support",
    result_resistance: "Resistance",
    result_analysis: "Analysis",
    result_advice: "Actionable advice",
    result_source_image: "Analyzed image",
    result_candles_through: "Last candle opened",
    label_support_line: "Support",
    label_resistance_line: "Resistance",
    label_candles: "Candles",
    label_last_price: "Last close",

    agent_context_heading: "Optional Context (Indicators/News)",
    agent_context_hint: "Standard market conditions",
    agent_action: "Action",
    agent_reward_risk: "Reward/Risk",
    agent_entry: "Entry",
    agent_stop: "Stop loss",
    agent_target: "Take profit",
    agent_reasoning: "Reasoning",
    agent_state: "Detected state",
    agent_volatility: "Volatility",
    agent_key_levels: "Key levels",

    error_no_api_key: "No API key found. Set GEMINI_API_KEY (or API_KEY) to enable analysis.",
};

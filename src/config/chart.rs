//! Synthesized chart rendering configuration.

pub struct ChartColors {
    pub background: [u8; 4],
    pub grid: [u8; 4],
    pub gutter: [u8; 4],
    pub bull: [u8; 4],
    pub bear: [u8; 4],
    pub axis_label: [u8; 4],
    pub title: [u8; 4],
    /// Text drawn on the last-close marker
    pub marker_label: [u8; 4],
    /// Low alpha: the base asset sits behind the candles
    pub watermark: [u8; 4],
}

/// Pixel sizes for the text baked into the chart.
pub struct ChartTextSizes {
    pub axis_label: f32,
    pub title: f32,
    pub watermark: f32,
}

pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// Space reserved below the plot (x axis)
    pub x_axis_height: u32,
    /// Space reserved to the right of the plot (price gutter)
    pub gutter_width: u32,
    /// Number of horizontal grid divisions
    pub grid_lines: u32,
    /// Fraction of the price range added above and below the extremes
    pub price_padding: f64,
    /// Fraction of each candle slot filled by the body
    pub body_fill: f64,
    /// Candle interval requested from the exchange
    pub interval_ms: i64,
    /// Candle count for both fetched and synthesized series
    pub candle_count: usize,
    /// Synthetic random-walk volatility as a fraction of the anchor price
    pub synthetic_volatility: f64,
    /// Inset of the title from the top-left corner
    pub title_inset: f32,
    /// Inset of price labels from the gutter edge
    pub label_inset: f32,
    pub text_sizes: ChartTextSizes,
    pub colors: ChartColors,
}

pub const CHART: ChartSettings = ChartSettings {
    width: 800,
    height: 600,
    x_axis_height: 40,
    gutter_width: 60,
    grid_lines: 5,
    price_padding: 0.1,
    body_fill: 0.6,
    interval_ms: 3_600_000,
    candle_count: 50,
    synthetic_volatility: 0.005,
    title_inset: 20.0,
    label_inset: 5.0,
    text_sizes: ChartTextSizes {
        axis_label: 11.0,
        title: 20.0,
        watermark: 80.0,
    },
    colors: ChartColors {
        background: [0x0e, 0x11, 0x17, 0xff],
        grid: [0x30, 0x36, 0x3d, 0xff],
        gutter: [0x16, 0x1b, 0x22, 0xff],
        bull: [0x00, 0xc8, 0x05, 0xff],
        bear: [0xff, 0x50, 0x00, 0xff],
        axis_label: [0x8b, 0x94, 0x9e, 0xff],
        title: [0xe6, 0xed, 0xf3, 0xff],
        marker_label: [0x00, 0x00, 0x00, 0xff],
        watermark: [0xff, 0xff, 0xff, 0x0d],
    },
};

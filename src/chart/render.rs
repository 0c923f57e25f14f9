use ab_glyph::FontRef;
use anyhow::{Context, Result, bail};
use image::{Rgba, RgbaImage};

use crate::config::CHART;
use crate::domain::{Candle, CandleType, EncodedImage};
use crate::utils::raster::{draw_segment, draw_text, fill_rect, text_width};
use crate::utils::{TimeUtils, price_extent, remap};

/// Pixel geometry of a rendered chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    /// Right edge of the candle area (gutter starts here)
    pub plot_width: f64,
    /// Bottom edge of the candle area (x axis starts here)
    pub plot_height: f64,
    pub plot_min: f64,
    pub plot_max: f64,
}

impl ChartLayout {
    pub fn for_candles(candles: &[Candle]) -> Option<Self> {
        let (low, high) = price_extent(candles)?;
        let mut padding = (high - low) * CHART.price_padding;
        if padding <= 0.0 {
            // Flat series: give it some room so it sits mid-chart
            padding = high.abs().max(1.0) * CHART.price_padding;
        }
        Some(Self {
            width: CHART.width,
            height: CHART.height,
            plot_width: (CHART.width - CHART.gutter_width) as f64,
            plot_height: (CHART.height - CHART.x_axis_height) as f64,
            plot_min: low - padding,
            plot_max: high + padding,
        })
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        remap(price, self.plot_min, self.plot_max, self.plot_height, 0.0)
    }

    pub fn grid_ys(&self) -> impl Iterator<Item = f64> + '_ {
        let step = self.plot_height / CHART.grid_lines as f64;
        (0..=CHART.grid_lines).map(move |i| step * i as f64)
    }

    /// Price at each grid line, top to bottom.
    pub fn grid_prices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let range = self.plot_max - self.plot_min;
        let lines = CHART.grid_lines as f64;
        self.grid_ys()
            .enumerate()
            .map(move |(i, y)| (y, self.plot_max - range * i as f64 / lines))
    }
}

/// Whole numbers above 1000, two decimals otherwise.
pub fn axis_price_label(price: f64) -> String {
    if price > 1000.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// "BTC/USDT · 1H · LIVE"
pub fn chart_title(symbol: &str) -> String {
    format!(
        "{} · {} · LIVE",
        symbol,
        TimeUtils::interval_to_string(CHART.interval_ms).to_uppercase()
    )
}

fn chart_font() -> Result<FontRef<'static>> {
    FontRef::try_from_slice(epaint_default_fonts::HACK_REGULAR).context("loading embedded chart font")
}

fn rgba(c: [u8; 4]) -> Rgba<u8> {
    Rgba(c)
}

fn candle_color(candle: &Candle) -> Rgba<u8> {
    match candle.get_type() {
        CandleType::Bullish => rgba(CHART.colors.bull),
        CandleType::Bearish => rgba(CHART.colors.bear),
    }
}

/// Dark-theme candlestick raster: grid, watermark, candles, price gutter
/// with labelled scale, last-close marker and title.
pub fn render_chart_rgba(symbol: &str, candles: &[Candle]) -> Result<RgbaImage> {
    let Some(layout) = ChartLayout::for_candles(candles) else {
        bail!("cannot render a chart without candles");
    };
    let font = chart_font()?;
    let colors = &CHART.colors;
    let sizes = &CHART.text_sizes;
    let mut img = RgbaImage::from_pixel(layout.width, layout.height, rgba(colors.background));

    for y in layout.grid_ys() {
        fill_rect(&mut img, 0.0, y, layout.plot_width, y + 1.0, rgba(colors.grid));
    }

    // Base asset, centred behind the candles
    let base = symbol.split('/').next().unwrap_or(symbol);
    let mark_width = text_width(&font, sizes.watermark, base);
    draw_text(
        &mut img,
        &font,
        (
            (layout.width as f32 - mark_width) / 2.0,
            (layout.height as f32 - sizes.watermark) / 2.0,
        ),
        sizes.watermark,
        rgba(colors.watermark),
        base,
    );

    let slot = layout.plot_width / candles.len() as f64;
    let body_width = slot * CHART.body_fill;
    for (i, candle) in candles.iter().enumerate() {
        let color = candle_color(candle);
        let x = i as f64 * slot + (slot - body_width) / 2.0;
        let centre = (x + body_width / 2.0) as f32;

        draw_segment(
            &mut img,
            (centre, layout.price_to_y(candle.high_price) as f32),
            (centre, layout.price_to_y(candle.low_price) as f32),
            1.5,
            color,
        );

        let y_open = layout.price_to_y(candle.open_price);
        let y_close = layout.price_to_y(candle.close_price);
        let top = y_open.min(y_close);
        let body_height = (y_open - y_close).abs().max(1.0);
        fill_rect(&mut img, x, top, x + body_width, top + body_height, color);
    }

    // Price gutter
    let (w, h) = (layout.width as f64, layout.height as f64);
    let label_x = layout.plot_width as f32 + CHART.label_inset;
    fill_rect(&mut img, layout.plot_width, 0.0, w, h, rgba(colors.gutter));
    for (y, price) in layout.grid_prices() {
        fill_rect(&mut img, layout.plot_width, y, layout.plot_width + 6.0, y + 1.0, rgba(colors.grid));
        // Centred on the line, kept inside the plot height
        let top = (y as f32 - sizes.axis_label / 2.0).clamp(1.0, layout.plot_height as f32 - sizes.axis_label);
        draw_text(
            &mut img,
            &font,
            (label_x, top),
            sizes.axis_label,
            rgba(colors.axis_label),
            &axis_price_label(price),
        );
    }

    if let Some(last) = candles.last() {
        let y = layout.price_to_y(last.close_price);
        fill_rect(&mut img, layout.plot_width, y - 10.0, w, y + 10.0, candle_color(last));
        draw_text(
            &mut img,
            &font,
            (label_x, y as f32 - sizes.axis_label / 2.0),
            sizes.axis_label,
            rgba(colors.marker_label),
            &axis_price_label(last.close_price),
        );
    }

    draw_text(
        &mut img,
        &font,
        (CHART.title_inset, CHART.title_inset),
        sizes.title,
        rgba(colors.title),
        &chart_title(symbol),
    );

    Ok(img)
}

pub fn render_chart(symbol: &str, candles: &[Candle]) -> Result<EncodedImage> {
    let img = render_chart_rgba(symbol, candles)?;
    Ok(EncodedImage::encode_png(&img)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<Candle> {
        vec![
            Candle::new(0, 100.0, 110.0, 95.0, 108.0, 1.0),
            Candle::new(1, 108.0, 112.0, 90.0, 92.0, 1.0),
            Candle::new(2, 92.0, 101.0, 91.0, 100.0, 1.0),
        ]
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(render_chart("BTC/USDT", &[]).is_err());
    }

    #[test]
    fn layout_pads_the_price_range() {
        let layout = ChartLayout::for_candles(&series()).unwrap();
        assert!((layout.plot_min - 87.8).abs() < 1e-9);
        assert!((layout.plot_max - 114.2).abs() < 1e-9);
        assert_eq!(layout.price_to_y(layout.plot_max), 0.0);
        assert_eq!(layout.price_to_y(layout.plot_min), layout.plot_height);
    }

    #[test]
    fn candles_and_marker_use_trend_colors() {
        let candles = series();
        let img = render_chart_rgba("BTC/USDT", &candles).unwrap();
        let layout = ChartLayout::for_candles(&candles).unwrap();
        let slot = layout.plot_width / 3.0;

        let mid_body = |i: usize, c: &Candle| {
            let y = layout.price_to_y((c.open_price + c.close_price) / 2.0);
            *img.get_pixel((slot * i as f64 + slot / 2.0) as u32, y as u32)
        };
        assert_eq!(mid_body(0, &candles[0]), Rgba(CHART.colors.bull));
        assert_eq!(mid_body(1, &candles[1]), Rgba(CHART.colors.bear));

        let marker_y = layout.price_to_y(100.0) as u32;
        assert_eq!(*img.get_pixel(CHART.width - 2, marker_y), Rgba(CHART.colors.bull));
        assert_eq!(*img.get_pixel(CHART.width - 2, CHART.height - 2), Rgba(CHART.colors.gutter));
    }

    #[test]
    fn flat_series_still_renders() {
        let flat = vec![Candle::new(0, 5.0, 5.0, 5.0, 5.0, 0.0); 4];
        let layout = ChartLayout::for_candles(&flat).unwrap();
        assert!(layout.plot_max > layout.plot_min);
        assert!(render_chart("EUR/USD", &flat).is_ok());
    }

    #[test]
    fn gutter_carries_price_labels() {
        let candles = series();
        let img = render_chart_rgba("BTC/USDT", &candles).unwrap();
        let layout = ChartLayout::for_candles(&candles).unwrap();
        let gutter = Rgba(CHART.colors.gutter);

        // Band around the second grid line, right of the tick marks
        let (line_y, _) = layout.grid_prices().nth(1).unwrap();
        let x0 = layout.plot_width as u32 + 8;
        let y0 = line_y as u32 - 8;
        let inked = (y0..y0 + 16)
            .flat_map(|y| (x0..CHART.width).map(move |x| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) != gutter)
            .count();
        assert!(inked > 10, "only {} label pixels", inked);
    }

    #[test]
    fn grid_prices_run_from_max_to_min() {
        let layout = ChartLayout::for_candles(&series()).unwrap();
        let prices: Vec<f64> = layout.grid_prices().map(|(_, p)| p).collect();
        assert_eq!(prices.len(), CHART.grid_lines as usize + 1);
        assert!((prices[0] - layout.plot_max).abs() < 1e-9);
        assert!((prices[prices.len() - 1] - layout.plot_min).abs() < 1e-9);
    }

    #[test]
    fn labels_drop_decimals_above_a_thousand() {
        assert_eq!(axis_price_label(96_412.7), "96413");
        assert_eq!(axis_price_label(1000.0), "1000.00");
        assert_eq!(axis_price_label(1.08542), "1.09");
    }

    #[test]
    fn title_names_symbol_and_interval() {
        assert_eq!(chart_title("ETH/USDT"), "ETH/USDT · 1H · LIVE");
    }

    #[test]
    fn symbol_text_changes_the_image() {
        let candles = series();
        let btc = render_chart_rgba("BTC/USDT", &candles).unwrap();
        let eth = render_chart_rgba("ETH/USDT", &candles).unwrap();
        assert_ne!(btc, eth);

        // Light text on the dark plot
        let title_box = (20..200).flat_map(|x| (20..44).map(move |y| (x, y)));
        let bright = title_box
            .filter(|&(x, y)| {
                let p = btc.get_pixel(x, y);
                p.0[0] > 0xc0 && p.0[2] > 0xc0
            })
            .count();
        assert!(bright > 0);
    }

    #[test]
    fn watermark_tints_the_plot_faintly() {
        let candles = series();
        let img = render_chart_rgba("BTC/USDT", &candles).unwrap();
        let layout = ChartLayout::for_candles(&candles).unwrap();
        let background = Rgba(CHART.colors.background);
        let opaque = [
            background,
            Rgba(CHART.colors.grid),
            Rgba(CHART.colors.bull),
            Rgba(CHART.colors.bear),
        ];

        let tinted: Vec<Rgba<u8>> = img
            .enumerate_pixels()
            .filter(|(x, y, _)| (*x as f64) < layout.plot_width && *y > 60 && (*y as f64) < layout.plot_height)
            .map(|(_, _, p)| *p)
            .filter(|p| !opaque.contains(p))
            .collect();
        assert!(
            tinted
                .iter()
                .any(|p| p.0[0] > background.0[0] && p.0[0] <= background.0[0] + 14)
        );
        // Nothing near full white: the mark is faint over grid lines too
        assert!(tinted.iter().all(|p| p.0[0] < CHART.colors.grid[0] + 14));
    }
}

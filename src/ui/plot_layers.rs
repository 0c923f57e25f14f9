use eframe::egui::{Color32, Stroke};
use egui_plot::{HLine, Line, LineStyle, PlotPoints, PlotUi, Polygon};

use crate::domain::{Candle, CandleType};
use crate::ui::config::{UI_CONFIG, UI_TEXT};

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub candles: &'a [Candle],
    pub support: &'a [f64],
    pub resistance: &'a [f64],
    pub last_price: Option<f64>,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. CANDLES (x = candle index)
// ============================================================================
pub struct CandlestickLayer;

const CANDLE_BODY_WIDTH: f64 = 0.6;
const CANDLE_WICK_WIDTH: f32 = 1.0;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for (i, candle) in ctx.candles.iter().enumerate() {
            let x = i as f64;
            let color = match candle.get_type() {
                CandleType::Bullish => UI_CONFIG.colors.bull,
                CandleType::Bearish => UI_CONFIG.colors.bear,
            };

            draw_wick_line(plot_ui, x, candle.high_price, candle.low_price, color);

            let (bottom, top) = candle.body_range();
            // Doji
            let top = if (top - bottom).abs() < f64::EPSILON {
                bottom * 1.0001
            } else {
                top
            };
            draw_body_rect(plot_ui, x, top, bottom, color);
        }
    }
}

#[inline]
fn draw_wick_line(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new(UI_TEXT.label_candles, PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(CANDLE_WICK_WIDTH),
    );
}

#[inline]
fn draw_body_rect(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    let half_w = CANDLE_BODY_WIDTH / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    ui.polygon(
        Polygon::new(UI_TEXT.label_candles, PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

// ============================================================================
// 2. SUPPORT / RESISTANCE LEVELS
// ============================================================================
pub struct LevelsLayer;

impl PlotLayer for LevelsLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for &price in ctx.support {
            plot_ui.hline(
                HLine::new(UI_TEXT.label_support_line, price)
                    .color(UI_CONFIG.colors.bull)
                    .width(2.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
        for &price in ctx.resistance {
            plot_ui.hline(
                HLine::new(UI_TEXT.label_resistance_line, price)
                    .color(UI_CONFIG.colors.bear)
                    .width(2.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// ============================================================================
// 3. PRICE LINE
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(price) = ctx.last_price {
            plot_ui.hline(
                HLine::new(UI_TEXT.label_last_price, price)
                    .color(UI_CONFIG.colors.accent)
                    .width(1.0),
            );
        }
    }
}

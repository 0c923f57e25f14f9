use eframe::egui;
use egui_plot::{Corner, Legend, Plot};

use crate::domain::{AnalysisResult, Candle};
use crate::ui::config::UI_CONFIG;
use crate::ui::plot_layers::{CandlestickLayer, LayerContext, LevelsLayer, PlotLayer, PriceLineLayer};
use crate::utils::price_extent;

/// Levels from an analysis reply drawn against the candles the chart was
/// synthesized from. Without candles only the level lines are shown.
pub struct LevelsPlotView;

impl LevelsPlotView {
    pub fn show(ui: &mut egui::Ui, result: &AnalysisResult, candles: Option<&[Candle]>) {
        let support = result.support_prices();
        let resistance = result.resistance_prices();
        let candles = candles.unwrap_or(&[]);

        if candles.is_empty() && support.is_empty() && resistance.is_empty() {
            return;
        }

        let last_price = candles.last().map(|c| c.close_price);
        let Some((y_min, y_max)) = plot_y_bounds(candles, &support, &resistance) else {
            return;
        };
        let x_max = candles.len().max(1) as f64;

        Plot::new("levels_plot")
            .height(UI_CONFIG.levels_plot_height)
            .legend(Legend::default().position(Corner::LeftTop))
            .show_x(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds_y(y_min..=y_max);
                plot_ui.set_plot_bounds_x(-1.0..=x_max);

                let ctx = LayerContext {
                    candles,
                    support: &support,
                    resistance: &resistance,
                    last_price,
                };

                // Back to front
                let layers: Vec<Box<dyn PlotLayer>> = vec![
                    Box::new(CandlestickLayer),
                    Box::new(LevelsLayer),
                    Box::new(PriceLineLayer),
                ];

                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }
}

/// Union of candle extent and every level, padded 5 % each side.
fn plot_y_bounds(candles: &[Candle], support: &[f64], resistance: &[f64]) -> Option<(f64, f64)> {
    let candle_extent = price_extent(candles);
    let levels = support.iter().chain(resistance.iter()).copied();

    let (lo, hi) = levels.fold(candle_extent.unwrap_or((f64::INFINITY, f64::NEG_INFINITY)), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }

    let pad = ((hi - lo) * 0.05).max(hi.abs() * 0.001);
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_levels_outside_candles() {
        let candles = vec![Candle::new(0, 100.0, 110.0, 95.0, 105.0, 0.0)];
        let (lo, hi) = plot_y_bounds(&candles, &[90.0], &[120.0]).unwrap();
        assert!(lo < 90.0);
        assert!(hi > 120.0);
    }

    #[test]
    fn bounds_from_levels_alone() {
        let (lo, hi) = plot_y_bounds(&[], &[1.08], &[1.09]).unwrap();
        assert!(lo < 1.08 && hi > 1.09);
        assert!(plot_y_bounds(&[], &[], &[]).is_none());
    }

    #[test]
    fn single_level_still_gets_a_band() {
        let (lo, hi) = plot_y_bounds(&[], &[50.0], &[]).unwrap();
        assert!(hi > lo);
    }
}

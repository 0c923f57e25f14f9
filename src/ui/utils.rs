use eframe::egui::{Color32, ColorImage, Context, RichText, Ui, Visuals};
use image::RgbaImage;

use crate::domain::{InstrumentClass, Trend};
use crate::ui::config::UI_CONFIG;

/// Creates a colored heading with uppercase text and monospace font
pub fn colored_heading(text: impl Into<String>) -> RichText {
    let uppercase_text = text.into().to_uppercase();
    RichText::new(uppercase_text)
        .color(UI_CONFIG.colors.heading)
        .monospace()
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.card;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.extreme_bg_color = UI_CONFIG.colors.central_panel;

    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.selection.bg_fill = UI_CONFIG.colors.accent;

    ctx.set_visuals(visuals);
}

/// Creates a section heading with standard spacing
pub fn section_heading(ui: &mut Ui, text: impl Into<String>) {
    ui.add_space(10.0);
    ui.heading(colored_heading(text));
    ui.add_space(5.0);
}

/// Creates a separator with standard spacing
pub fn spaced_separator(ui: &mut Ui) {
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Formats a price with "Trader Precision".
/// - Large (>1000): 2 decimals, grouped ($95,123.50)
/// - Medium (1-1000): 4 decimals ($12.4829)
/// - Small (<1): 5-8 decimals ($0.00000231)
///
/// Live (crypto) quotes are in the quote asset, so they carry no `$`.
pub fn format_price(price: f64, class: InstrumentClass) -> String {
    let currency = match class {
        InstrumentClass::Live => "",
        InstrumentClass::Simulated => "$",
    };
    if price == 0.0 {
        return format!("{}0.00", currency);
    }

    let abs_price = price.abs();
    let digits = if abs_price >= 1000.0 {
        format!("{:.2}", abs_price)
    } else if abs_price >= 1.0 {
        format!("{:.4}", abs_price)
    } else if abs_price >= 0.01 {
        format!("{:.5}", abs_price)
    } else {
        format!("{:.8}", abs_price)
    };
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, currency, group_thousands(&digits))
}

/// Comma every three digits of the integer part: "96400.00" -> "96,400.00"
fn group_thousands(digits: &str) -> String {
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let mut out = String::with_capacity(digits.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// "+1.23%" / "-0.40%"
pub fn format_percent(pct: f64) -> String {
    format!("{:+.2}%", pct)
}

/// 1234567 -> "1.23M"
pub fn format_volume(volume: f64) -> String {
    let abs = volume.abs();
    if abs >= 1e9 {
        format!("{:.2}B", volume / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", volume / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", volume / 1e3)
    } else {
        format!("{:.0}", volume)
    }
}

pub fn direction_color(is_up: bool) -> Color32 {
    if is_up {
        UI_CONFIG.colors.bull
    } else {
        UI_CONFIG.colors.bear
    }
}

pub fn trend_color(trend: Trend) -> Color32 {
    match trend {
        Trend::Bullish => UI_CONFIG.colors.bull,
        Trend::Bearish => UI_CONFIG.colors.bear,
        Trend::Neutral => UI_CONFIG.colors.neutral,
    }
}

pub fn color32_from_rgba(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Raster to egui texture data.
pub fn to_color_image(img: &RgbaImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_follows_magnitude() {
        let stock = InstrumentClass::Simulated;
        assert_eq!(format_price(96_400.0, stock), "$96,400.00");
        assert_eq!(format_price(12.48291, stock), "$12.4829");
        assert_eq!(format_price(0.5, stock), "$0.50000");
        assert_eq!(format_price(0.00000231, stock), "$0.00000231");
        assert_eq!(format_price(0.0, stock), "$0.00");
    }

    #[test]
    fn large_prices_are_grouped() {
        let stock = InstrumentClass::Simulated;
        assert_eq!(format_price(95_123.5, stock), "$95,123.50");
        assert_eq!(format_price(1_234_567.891, stock), "$1,234,567.89");
        assert_eq!(format_price(1000.0, stock), "$1,000.00");
        assert_eq!(format_price(999.5, stock), "$999.5000");
        assert_eq!(format_price(-2_500.0, stock), "-$2,500.00");
    }

    #[test]
    fn crypto_prices_carry_no_dollar_sign() {
        let crypto = InstrumentClass::Live;
        assert_eq!(format_price(96_412.07, crypto), "96,412.07");
        assert_eq!(format_price(0.0000231, crypto), "0.00002310");
        assert_eq!(format_price(0.0, crypto), "0.00");
    }

    #[test]
    fn percent_and_volume_formatting() {
        assert_eq!(format_percent(1.234), "+1.23%");
        assert_eq!(format_percent(-0.4), "-0.40%");
        assert_eq!(format_volume(1_234_567.0), "1.23M");
        assert_eq!(format_volume(950.0), "950");
    }
}

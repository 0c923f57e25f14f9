use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub card: Color32,
    pub bull: Color32,
    pub bear: Color32,
    pub neutral: Color32,
    pub accent: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    /// Tallest the annotator or result image is drawn, in points
    pub max_image_height: f32,
    pub levels_plot_height: f32,
    pub side_panel_width: f32,
    /// Repaint cadence while the feed is live
    pub live_repaint_ms: u64,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::from_rgb(230, 237, 243),
        subsection_heading: Color32::from_rgb(139, 148, 158),
        central_panel: Color32::from_rgb(14, 17, 23),
        side_panel: Color32::from_rgb(22, 27, 34),
        card: Color32::from_rgb(22, 27, 34),
        bull: Color32::from_rgb(0, 200, 5),
        bear: Color32::from_rgb(255, 80, 0),
        neutral: Color32::from_rgb(234, 179, 8),
        accent: Color32::from_rgb(59, 130, 246),
    },
    max_image_height: 600.0,
    levels_plot_height: 220.0,
    side_panel_width: 260.0,
    live_repaint_ms: 250,
};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eframe::{Frame, egui};
use poll_promise::Promise;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::annotate::{StrokeColor, Tool};
use crate::config::FEED;
use crate::domain::{Candle, EncodedImage, InstrumentClass, supported_extensions};
use crate::engine::AssistantEngine;
use crate::ui::app_async::ChartSynthesisResult;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::ui_annotator::AnnotatorView;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Page {
    #[default]
    Analyzer,
    Agent,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub page: Page,
    pub live_symbol: String,
    pub instrument_class: InstrumentClass,
    pub agent_context: String,
    pub tool: Tool,
    pub stroke_color: StrokeColor,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            page: Page::default(),
            live_symbol: FEED.default_live_symbol.to_string(),
            instrument_class: InstrumentClass::Live,
            agent_context: String::new(),
            tool: Tool::default(),
            stroke_color: StrokeColor::default(),
        }
    }
}

/// Startup overrides from the command line.
#[derive(Debug, Default)]
pub struct StartupOptions {
    pub subscription: Option<(String, InstrumentClass)>,
    pub image: Option<EncodedImage>,
}

pub struct PatternProApp {
    pub(super) settings: AppSettings,
    pub(super) engine: AssistantEngine,

    /// Text in the symbol search box
    pub(super) symbol_input: String,
    /// The loaded image, while it is being annotated
    pub(super) annotator: Option<AnnotatorView>,
    /// Candles behind the current image when it was synthesized
    pub(super) chart_candles: Option<Vec<Candle>>,
    pub(super) chart_promise: Option<Promise<ChartSynthesisResult>>,
    /// Input-side problems (bad file, synthesis failure), not analysis errors
    pub(super) last_error: Option<String>,
    /// Texture of the analyzed image, keyed by the Arc it was built from
    pub(super) result_texture: Option<(usize, egui::TextureHandle)>,
}

impl PatternProApp {
    pub fn new(cc: &eframe::CreationContext<'_>, engine: AssistantEngine, options: StartupOptions) -> Self {
        let mut settings: AppSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Starting with settings: {:?}", settings);
        }

        if let Some((symbol, class)) = options.subscription {
            settings.live_symbol = symbol;
            settings.instrument_class = class;
        }

        let mut app = Self {
            symbol_input: settings.live_symbol.clone(),
            settings,
            engine,
            annotator: None,
            chart_candles: None,
            chart_promise: None,
            last_error: None,
            result_texture: None,
        };

        app.subscribe(app.settings.live_symbol.clone(), app.settings.instrument_class);
        if let Some(image) = options.image {
            app.load_image(image, None);
        }
        app
    }

    pub(super) fn subscribe(&mut self, symbol: String, instrument_class: InstrumentClass) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Switching feed to {} ({})", symbol, instrument_class);
        }
        self.engine.subscribe(&symbol, instrument_class);
        self.symbol_input = symbol.clone();
        self.settings.live_symbol = symbol;
        self.settings.instrument_class = instrument_class;
    }

    /// Starts annotating `image`. Any previous result is discarded.
    pub(super) fn load_image(&mut self, image: EncodedImage, candles: Option<Vec<Candle>>) {
        match AnnotatorView::new(&image, self.settings.tool, self.settings.stroke_color) {
            Ok(view) => {
                self.engine.discard_analysis();
                if let Some(old) = self.annotator.replace(view) {
                    old.cancel();
                }
                self.chart_candles = candles;
                self.last_error = None;
                self.result_texture = None;
            }
            Err(e) => {
                log::warn!("Ignoring image: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Clears result and image, back to the drop zone.
    pub(super) fn start_over(&mut self) {
        self.engine.discard_analysis();
        if let Some(view) = self.annotator.take() {
            view.cancel();
        }
        self.chart_candles = None;
        self.result_texture = None;
        self.last_error = None;
    }

    pub(super) fn submit_annotated(&mut self, image: EncodedImage) {
        if let Some(view) = self.annotator.take() {
            self.settings.tool = view.tool();
            self.settings.stroke_color = view.color();
        }
        match self.settings.page {
            Page::Analyzer => {
                self.engine.submit_chart_analysis(image);
            }
            Page::Agent => {
                let context = self.settings.agent_context.clone();
                self.engine.submit_agent_consult(image, &context);
            }
        }
    }

    pub(super) fn set_page(&mut self, page: Page) {
        if self.settings.page == page {
            return;
        }
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Page: {}", page);
        }
        // Results belong to the page that asked for them
        self.engine.discard_analysis();
        self.result_texture = None;
        self.settings.page = page;
    }

    /// Files dropped on the window. Non-images are ignored.
    /// Native file picker, filtered to decodable images. Cancelling or
    /// choosing a non-image leaves the app as it was.
    pub(super) fn open_image_dialog(&mut self) {
        let extensions = supported_extensions();
        let Some(path) = rfd::FileDialog::new()
            .add_filter(UI_TEXT.open_file_filter, extensions.as_slice())
            .pick_file()
        else {
            return;
        };
        if let Some(image) = image_from_path(&path) {
            self.load_image(image, None);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let bytes = match (&file.bytes, &file.path) {
                (Some(bytes), _) => Some(bytes.to_vec()),
                (None, Some(path)) => read_file(path),
                (None, None) => None,
            };
            let Some(bytes) = bytes else { continue };

            match EncodedImage::from_file_bytes(bytes) {
                Ok(image) => {
                    self.load_image(image, None);
                    break;
                }
                Err(e) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_ui_interactions {
                        log::info!("Dropped file {:?} is not an image: {}", file.name, e);
                    }
                    #[cfg(not(debug_assertions))]
                    let _ = e;
                }
            }
        }
    }

    /// Texture for the image the current result was computed from.
    pub(super) fn result_texture_for(
        &mut self,
        ctx: &egui::Context,
        image: &Arc<EncodedImage>,
    ) -> Option<egui::TextureHandle> {
        let key = Arc::as_ptr(image) as usize;
        if let Some((cached, texture)) = &self.result_texture {
            if *cached == key {
                return Some(texture.clone());
            }
        }
        let rgba = match image.decode_rgba() {
            Ok(rgba) => rgba,
            Err(e) => {
                log::warn!("Cannot display analyzed image: {}", e);
                return None;
            }
        };
        let texture = ctx.load_texture(
            "analyzed_image",
            crate::ui::utils::to_color_image(&rgba),
            egui::TextureOptions::LINEAR,
        );
        self.result_texture = Some((key, texture.clone()));
        Some(texture)
    }
}

/// Reads `path` as an image. Unreadable files and non-images yield None.
fn image_from_path(path: &Path) -> Option<EncodedImage> {
    let bytes = read_file(path)?;
    match EncodedImage::from_file_bytes(bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Picked file {} is not an image: {}", path.display(), e);
            }
            #[cfg(not(debug_assertions))]
            let _ = e;
            None
        }
    }
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

impl eframe::App for PatternProApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.chart_promise = None;
        self.engine.unsubscribe();
        self.engine.discard_analysis();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(view) = &self.annotator {
            self.settings.tool = view.tool();
            self.settings.stroke_color = view.color();
        }
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        let busy = self.engine.update();
        self.poll_chart_synthesis();
        self.handle_dropped_files(ctx);

        self.render_top_panel(ctx);
        self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);

        if busy || self.chart_promise.is_some() {
            ctx.request_repaint_after(Duration::from_millis(UI_CONFIG.live_repaint_ms));
        }
    }
}

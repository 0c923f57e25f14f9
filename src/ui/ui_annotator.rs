use eframe::egui::{
    self, Color32, Context, Rect, RichText, Sense, Stroke, TextureHandle, TextureOptions, Ui, Vec2,
    pos2,
};
use strum::IntoEnumIterator;

use crate::annotate::{AnnotateError, AnnotationCanvas, StrokeColor, Tool};
use crate::domain::EncodedImage;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{color32_from_rgba, section_heading, to_color_image};

pub enum AnnotatorEvent {
    Confirm(EncodedImage),
    Cancel,
}

#[derive(Clone, Copy)]
enum ToolbarAction {
    Confirm,
    Cancel,
}

/// Toolbar plus drawing surface. The texture is re-uploaded only when the
/// canvas revision moves.
pub struct AnnotatorView {
    canvas: AnnotationCanvas,
    texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl AnnotatorView {
    pub fn new(image: &EncodedImage, tool: Tool, color: StrokeColor) -> Result<Self, AnnotateError> {
        let mut canvas = AnnotationCanvas::load(image)?;
        canvas.tool = tool;
        canvas.color = color;
        Ok(Self {
            canvas,
            texture: None,
            uploaded_revision: None,
        })
    }

    pub fn tool(&self) -> Tool {
        self.canvas.tool
    }

    pub fn color(&self) -> StrokeColor {
        self.canvas.color
    }

    pub fn show(&mut self, ui: &mut Ui, confirm_label: &str) -> Option<AnnotatorEvent> {
        section_heading(ui, UI_TEXT.annotate_heading);
        let action = self.render_toolbar(ui, confirm_label);
        ui.add_space(6.0);
        self.render_surface(ui);
        ui.label_subdued(UI_TEXT.annotate_helper);

        match action? {
            ToolbarAction::Cancel => Some(AnnotatorEvent::Cancel),
            ToolbarAction::Confirm => {
                // A half-drawn stroke is committed before export
                if self.canvas.is_drawing() {
                    self.canvas.end_stroke();
                }
                match self.canvas.export_png() {
                    Ok(image) => Some(AnnotatorEvent::Confirm(image)),
                    Err(e) => {
                        log::error!("Annotated image export failed: {:#}", e);
                        None
                    }
                }
            }
        }
    }

    fn render_toolbar(&mut self, ui: &mut Ui, confirm_label: &str) -> Option<ToolbarAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            for tool in Tool::iter() {
                if ui.selectable_label(self.canvas.tool == tool, tool.to_string()).clicked() {
                    self.canvas.tool = tool;
                }
            }
            ui.separator();

            for color in StrokeColor::iter() {
                let selected = self.canvas.color == color;
                let swatch = egui::Button::new(RichText::new("  "))
                    .fill(color32_from_rgba(color.rgba()))
                    .stroke(if selected {
                        Stroke::new(2.0, Color32::WHITE)
                    } else {
                        Stroke::NONE
                    });
                if ui.add(swatch).on_hover_text(color.to_string()).clicked() {
                    self.canvas.color = color;
                }
            }
            ui.separator();

            if ui
                .add_enabled(self.canvas.can_undo(), egui::Button::new(UI_TEXT.annotate_undo))
                .clicked()
            {
                self.canvas.undo();
            }
            if ui.button(UI_TEXT.annotate_clear).clicked() {
                self.canvas.clear();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let confirm = egui::Button::new(RichText::new(confirm_label).strong())
                    .fill(UI_CONFIG.colors.accent);
                if ui.add(confirm).clicked() {
                    action = Some(ToolbarAction::Confirm);
                }
                if ui.button(UI_TEXT.annotate_cancel).clicked() {
                    action = Some(ToolbarAction::Cancel);
                }
            });
        });
        action
    }

    fn render_surface(&mut self, ui: &mut Ui) {
        self.sync_texture(ui.ctx());
        let Some(texture) = &self.texture else {
            return;
        };

        let display = fit_size(
            self.canvas.dimensions(),
            ui.available_width(),
            UI_CONFIG.max_image_height,
        );
        let (rect, response) = ui.allocate_exact_size(display, Sense::drag());
        ui.painter().image(
            texture.id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        let to_native = |canvas: &AnnotationCanvas, p: egui::Pos2| {
            let local = p - rect.min;
            canvas.map_pointer((local.x, local.y), (rect.width(), rect.height()))
        };

        if let Some(pointer) = response.interact_pointer_pos() {
            if response.drag_started() {
                let pos = to_native(&self.canvas, pointer);
                self.canvas.begin_stroke(pos);
            } else if response.dragged() {
                let pos = to_native(&self.canvas, pointer);
                self.canvas.pointer_move(pos);
            }
        }
        if response.drag_stopped() {
            self.canvas.end_stroke();
        }

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    }

    fn sync_texture(&mut self, ctx: &Context) {
        let revision = self.canvas.revision();
        if self.uploaded_revision == Some(revision) && self.texture.is_some() {
            return;
        }
        let image = to_color_image(self.canvas.surface());
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("annotation_surface", image, TextureOptions::LINEAR));
            }
        }
        self.uploaded_revision = Some(revision);
    }

    /// Drops in-progress strokes and the texture.
    pub fn cancel(self) {
        self.canvas.cancel();
    }
}

/// Largest size with the image's aspect ratio that fits both limits.
/// Never upscales.
pub fn fit_size((w, h): (u32, u32), max_width: f32, max_height: f32) -> Vec2 {
    let (w, h) = (w as f32, h as f32);
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (max_width / w).min(max_height / h).min(1.0).max(0.0);
    Vec2::new(w * scale, h * scale)
}

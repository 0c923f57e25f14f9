use std::collections::VecDeque;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::config::ANNOTATION;
use crate::domain::{EncodedImage, ImageInputError};
use crate::utils::raster::draw_segment;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("could not load image: {0}")]
    Input(#[from] ImageInputError),
    #[error("could not encode annotated image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("image has no pixels")]
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Tool {
    #[default]
    Freehand,
    #[strum(to_string = "Straight line")]
    Line,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum StrokeColor {
    #[default]
    Green,
    Red,
    Blue,
    White,
}

impl StrokeColor {
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            StrokeColor::Green => [0x00, 0xc8, 0x05, 0xff],
            StrokeColor::Red => [0xff, 0x50, 0x00, 0xff],
            StrokeColor::Blue => [0x3b, 0x82, 0xf6, 0xff],
            StrokeColor::White => [0xff, 0xff, 0xff, 0xff],
        }
    }
}

struct ActiveStroke {
    tool: Tool,
    color: Rgba<u8>,
    start: (f32, f32),
    last: (f32, f32),
    /// Surface as it was when the pointer went down
    snapshot: RgbaImage,
    drew: bool,
}

/// A raster surface at the image's native resolution plus in-progress stroke
/// state. Pointer positions are always native-grid coordinates; use
/// `map_pointer` to convert from displayed pixels.
pub struct AnnotationCanvas {
    original: RgbaImage,
    surface: RgbaImage,
    undo_stack: VecDeque<RgbaImage>,
    active: Option<ActiveStroke>,
    pub tool: Tool,
    pub color: StrokeColor,
    pub stroke_width: f32,
    revision: u64,
}

impl AnnotationCanvas {
    pub fn load(image: &EncodedImage) -> Result<Self, AnnotateError> {
        Self::from_rgba(image.decode_rgba()?)
    }

    pub fn from_rgba(original: RgbaImage) -> Result<Self, AnnotateError> {
        if original.width() == 0 || original.height() == 0 {
            return Err(AnnotateError::Empty);
        }
        Ok(Self {
            surface: original.clone(),
            original,
            undo_stack: VecDeque::new(),
            active: None,
            tool: Tool::default(),
            color: StrokeColor::default(),
            stroke_width: ANNOTATION.stroke_width,
            revision: 0,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Bumped on every pixel change, so views know when to re-upload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Rescales a position inside a `displayed` (width, height) rectangle
    /// onto the native pixel grid, per axis.
    pub fn map_pointer(&self, displayed_pos: (f32, f32), displayed_size: (f32, f32)) -> (f32, f32) {
        let (w, h) = self.dimensions();
        let scale = |pos: f32, shown: f32, native: u32| {
            if shown > 0.0 {
                pos * native as f32 / shown
            } else {
                pos
            }
        };
        (
            scale(displayed_pos.0, displayed_size.0, w),
            scale(displayed_pos.1, displayed_size.1, h),
        )
    }

    pub fn begin_stroke(&mut self, pos: (f32, f32)) {
        if self.active.is_some() {
            self.end_stroke();
        }
        self.active = Some(ActiveStroke {
            tool: self.tool,
            color: Rgba(self.color.rgba()),
            start: pos,
            last: pos,
            snapshot: self.surface.clone(),
            drew: false,
        });

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_annotation_events {
            log::info!("[annotate] {} stroke begins at {:?}", self.tool, pos);
        }
    }

    /// Ignored unless a stroke is active.
    pub fn pointer_move(&mut self, pos: (f32, f32)) {
        let Some(stroke) = self.active.as_mut() else {
            return;
        };
        match stroke.tool {
            Tool::Freehand => {
                draw_segment(&mut self.surface, stroke.last, pos, self.stroke_width, stroke.color);
            }
            Tool::Line => {
                self.surface.copy_from_slice(&stroke.snapshot);
                draw_segment(&mut self.surface, stroke.start, pos, self.stroke_width, stroke.color);
            }
        }
        stroke.last = pos;
        stroke.drew = true;
        self.revision += 1;
    }

    pub fn end_stroke(&mut self) {
        let Some(stroke) = self.active.take() else {
            return;
        };
        if stroke.drew {
            if self.undo_stack.len() == ANNOTATION.max_undo_depth {
                self.undo_stack.pop_front();
            }
            self.undo_stack.push_back(stroke.snapshot);
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_annotation_events {
            log::info!("[annotate] stroke ends at {:?} (drew: {})", stroke.last, stroke.drew);
        }
    }

    /// Reverts the most recent stroke (or abandons the one in progress).
    pub fn undo(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.surface = stroke.snapshot;
        } else if let Some(previous) = self.undo_stack.pop_back() {
            self.surface = previous;
        } else {
            return;
        }
        self.revision += 1;
    }

    /// Back to the loaded image.
    pub fn clear(&mut self) {
        self.active = None;
        self.undo_stack.clear();
        self.surface.copy_from_slice(&self.original);
        self.revision += 1;
    }

    /// Flattens the surface into a PNG at native resolution.
    pub fn export_png(&self) -> Result<EncodedImage, AnnotateError> {
        Ok(EncodedImage::encode_png(&self.surface)?)
    }

    /// Discards the image and every stroke without exporting.
    pub fn cancel(self) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_annotation_events {
            log::info!("[annotate] cancelled ({} strokes discarded)", self.undo_stack.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba<u8> = Rgba([14, 17, 23, 255]);

    fn canvas(w: u32, h: u32) -> AnnotationCanvas {
        AnnotationCanvas::from_rgba(RgbaImage::from_pixel(w, h, BG)).unwrap()
    }

    fn expected_with(segments: &[((f32, f32), (f32, f32))], w: u32, h: u32, color: StrokeColor) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, BG);
        for (a, b) in segments {
            draw_segment(&mut img, *a, *b, ANNOTATION.stroke_width, Rgba(color.rgba()));
        }
        img
    }

    #[test]
    fn export_matches_native_dimensions() {
        let mut c = canvas(321, 123);
        c.begin_stroke((5.0, 5.0));
        c.pointer_move((300.0, 100.0));
        c.end_stroke();
        let png = c.export_png().unwrap();
        assert_eq!(png.dimensions().unwrap(), (321, 123));
    }

    #[test]
    fn line_tool_leaves_snapshot_plus_one_segment() {
        let mut c = canvas(100, 100);
        c.tool = Tool::Line;
        c.color = StrokeColor::Red;
        c.begin_stroke((10.0, 10.0));
        for p in [(50.0, 20.0), (30.0, 40.0), (90.0, 5.0), (70.0, 70.0)] {
            c.pointer_move(p);
        }
        c.end_stroke();
        let expected = expected_with(&[((10.0, 10.0), (70.0, 70.0))], 100, 100, StrokeColor::Red);
        assert_eq!(c.surface(), &expected);
    }

    #[test]
    fn freehand_draws_every_segment() {
        let mut c = canvas(60, 60);
        c.begin_stroke((10.0, 10.0));
        c.pointer_move((20.0, 10.0));
        c.pointer_move((20.0, 30.0));
        c.end_stroke();
        let expected = expected_with(
            &[((10.0, 10.0), (20.0, 10.0)), ((20.0, 10.0), (20.0, 30.0))],
            60,
            60,
            StrokeColor::Green,
        );
        assert_eq!(c.surface(), &expected);
    }

    #[test]
    fn moves_without_a_stroke_are_ignored() {
        let mut c = canvas(20, 20);
        c.pointer_move((5.0, 5.0));
        assert_eq!(c.revision(), 0);
        assert!(c.surface().pixels().all(|p| *p == BG));
    }

    #[test]
    fn pointer_mapping_is_per_axis() {
        let c = canvas(800, 600);
        assert_eq!(c.map_pointer((200.0, 150.0), (400.0, 600.0)), (400.0, 150.0));
        assert_eq!(c.map_pointer((10.0, 10.0), (0.0, 0.0)), (10.0, 10.0));
    }

    #[test]
    fn undo_and_clear_restore_earlier_surfaces() {
        let mut c = canvas(50, 50);
        c.begin_stroke((5.0, 5.0));
        c.pointer_move((40.0, 5.0));
        c.end_stroke();
        let after_first = c.surface().clone();

        c.color = StrokeColor::White;
        c.begin_stroke((5.0, 40.0));
        c.pointer_move((40.0, 40.0));
        c.end_stroke();
        assert_ne!(c.surface(), &after_first);

        c.undo();
        assert_eq!(c.surface(), &after_first);

        c.clear();
        assert!(c.surface().pixels().all(|p| *p == BG));
        assert!(!c.can_undo());
    }

    #[test]
    fn click_without_move_records_no_undo_step() {
        let mut c = canvas(10, 10);
        c.begin_stroke((1.0, 1.0));
        c.end_stroke();
        assert!(!c.can_undo());
    }

    #[test]
    fn unannotated_export_is_pixel_identical() {
        let mut img = RgbaImage::new(400, 300);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
        let source = EncodedImage::encode_png(&img).unwrap();
        let c = AnnotationCanvas::load(&source).unwrap();
        let exported = c.export_png().unwrap();
        assert_eq!(exported.decode_rgba().unwrap(), img);
    }

    #[test]
    fn rejects_non_images() {
        let bogus = EncodedImage::png(b"definitely not a png".to_vec());
        assert!(matches!(
            AnnotationCanvas::load(&bogus),
            Err(AnnotateError::Input(_))
        ));
    }
}

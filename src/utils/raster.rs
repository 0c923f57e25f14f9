//! Aliasing-free drawing primitives on `image::RgbaImage`.
//!
//! A pixel is covered when its centre falls inside the shape, so results are
//! exact and repeatable. Text is the exception: glyphs are blended by
//! coverage.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

/// Fills `[x0, x1) x [y0, y1)` (any corner order), clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
    let (w, h) = (img.width() as f64, img.height() as f64);
    let left = x0.min(x1).round().clamp(0.0, w) as u32;
    let right = x0.max(x1).round().clamp(0.0, w) as u32;
    let top = y0.min(y1).round().clamp(0.0, h) as u32;
    let bottom = y0.max(y1).round().clamp(0.0, h) as u32;
    for y in top..bottom {
        for x in left..right {
            img.put_pixel(x, y, color);
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Stroke of `width` with round caps. A zero-length segment draws a dot.
pub fn draw_segment(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let radius = (width / 2.0).max(0.5);
    let max_x = (img.width() - 1) as f32;
    let max_y = (img.height() - 1) as f32;
    let x_min = (a.0.min(b.0) - radius).floor().clamp(0.0, max_x) as u32;
    let x_max = (a.0.max(b.0) + radius).ceil().clamp(0.0, max_x) as u32;
    let y_min = (a.1.min(b.1) - radius).floor().clamp(0.0, max_y) as u32;
    let y_max = (a.1.max(b.1) + radius).ceil().clamp(0.0, max_y) as u32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let centre = (x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(centre, a, b) <= radius {
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, alpha: f32) {
    for c in 0..3 {
        let mixed = color.0[c] as f32 * alpha + dst.0[c] as f32 * (1.0 - alpha);
        dst.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

/// Horizontal advance of `text` at `size` px, kerning ignored.
pub fn text_width(font: &FontRef<'_>, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    text.chars().map(|c| scaled.h_advance(scaled.glyph_id(c))).sum()
}

/// Draws `text` with its top-left corner at `(x, y)`.
///
/// Glyph coverage multiplies the alpha of `color` and the result is blended
/// source-over, so a faint colour gives a faint watermark. Glyphs outside
/// the image are clipped.
pub fn draw_text(
    img: &mut RgbaImage,
    font: &FontRef<'_>,
    (x, y): (f32, f32),
    size: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let scaled = font.as_scaled(PxScale::from(size));
    let baseline = y + scaled.ascent();
    let opacity = color.0[3] as f32 / 255.0;
    let (w, h) = (img.width() as i64, img.height() as i64);
    let mut caret = x;

    for c in text.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        glyph.position = point(caret, baseline);
        caret += scaled.h_advance(glyph.id);

        // Whitespace has no outline
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + gx as i64;
            let py = bounds.min.y as i64 + gy as i64;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0) * opacity;
            if alpha > 0.0 {
                blend_pixel(img.get_pixel_mut(px as u32, py as u32), color, alpha);
            }
        });
    }
}

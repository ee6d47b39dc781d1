//! Overlay renderer — word boxes and labels drawn onto the page image.
//!
//! Pure pixel mutation: the caller hands in its copy of the page raster and
//! gets the same buffer back for chaining. Drawing follows page order, so
//! overlapping boxes simply overdraw earlier ones.

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::page::{BoundingBox, PageResult};

/// Outline and label color.
const OVERLAY_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Outline thickness in pixels.
const BOX_THICKNESS: i32 = 2;
/// Label size in pixels at text scale 1.0.
const BASE_LABEL_SIZE: f32 = 22.0;

/// Candidate font locations, tried in order.
const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a system font for label rendering.
pub fn load_system_font() -> Option<FontVec> {
    for path in FONT_PATHS {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                log::debug!("[OVERLAY] Loaded font from {}", path);
                return Some(font);
            }
        }
    }
    log::debug!("[OVERLAY] No system font found — labels skipped");
    None
}

/// Draw every word's box and text onto `img` and return the buffer.
///
/// Labels anchor at the box's left edge and vertical midpoint. Without a
/// usable system font the boxes are still drawn and the labels skipped.
pub fn render(mut img: RgbImage, page: &PageResult, text_scale: f32) -> RgbImage {
    let font = load_system_font();
    let bounds = (img.width() as i32, img.height() as i32);
    let label_size = BASE_LABEL_SIZE * text_scale;

    for line in page.lines() {
        for word in &line.words {
            draw_thick_rect(&mut img, &word.bbox, bounds);

            if let Some(ref font) = font {
                let x = word.bbox.x;
                let y = word.bbox.mid_y();
                if x >= 0 && y >= 0 && x < bounds.0 && y < bounds.1 {
                    draw_text_mut(&mut img, OVERLAY_COLOR, x, y, label_size, font, &word.text);
                }
            }
        }
    }
    img
}

fn draw_thick_rect(img: &mut RgbImage, bbox: &BoundingBox, bounds: (i32, i32)) {
    if bbox.width <= 0 || bbox.height <= 0 {
        return;
    }
    for t in 0..BOX_THICKNESS {
        let rect = Rect::at(bbox.x - t, bbox.y - t).of_size(
            bbox.width as u32 + (2 * t) as u32,
            bbox.height as u32 + (2 * t) as u32,
        );
        if rect_in_bounds(&rect, bounds.0, bounds.1) {
            draw_hollow_rect_mut(img, rect, OVERLAY_COLOR);
        }
    }
}

fn rect_in_bounds(rect: &Rect, width: i32, height: i32) -> bool {
    rect.left() >= 0 && rect.top() >= 0 && rect.right() < width && rect.bottom() < height
}

//! Font resolution with a guaranteed fallback.
//!
//! Fonts are probed in a fixed order: a system font name resolved against
//! the working directory, then a well-known Unix font path, and finally a
//! built-in 5x7 bitmap font. The chain always terminates in a usable
//! (possibly low-quality) font, so text rendering itself never fails.

use ab_glyph::{FontVec, PxScale};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Candidate font files probed in order before the built-in fallback.
const FONT_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Bitmap glyph grid dimensions, in cells.
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Horizontal advance in cells: glyph plus one cell of spacing.
const GLYPH_ADVANCE: u32 = 6;

/// A font resolved by [`load_font`], always usable for measuring and drawing.
pub enum LoadedFont {
    /// A TrueType font loaded from disk, rendered via `ab_glyph`.
    Truetype(FontVec),
    /// Built-in 5x7 bitmap glyphs covering digits, `-`, `:` and space.
    /// Unknown characters render as blanks.
    Bitmap,
}

/// Resolve a font by walking the candidate chain.
///
/// Candidates that are missing or fail to parse are skipped; the built-in
/// bitmap font is the terminal fallback, so this never fails.
#[must_use]
pub fn load_font() -> LoadedFont {
    for candidate in FONT_CANDIDATES {
        if let Ok(data) = std::fs::read(candidate) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                return LoadedFont::Truetype(font);
            }
        }
    }
    LoadedFont::Bitmap
}

impl LoadedFont {
    /// Pixel dimensions of `text` rendered at `size`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(&self, size: u32, text: &str) -> (u32, u32) {
        match self {
            Self::Truetype(font) => text_size(PxScale::from(size as f32), font, text),
            Self::Bitmap => bitmap_text_size(size, text),
        }
    }

    /// Draw `text` at `(x, y)` in `color`, alpha-blending onto the image.
    ///
    /// Coordinates may be negative; drawing is clipped to image bounds.
    #[allow(clippy::cast_precision_loss)]
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        x: i32,
        y: i32,
        size: u32,
        color: Rgba<u8>,
        text: &str,
    ) {
        match self {
            Self::Truetype(font) => {
                draw_text_mut(image, color, x, y, PxScale::from(size as f32), font, text);
            }
            Self::Bitmap => draw_bitmap_text(image, x, y, size, color, text),
        }
    }
}

/// Side length of one bitmap cell at the given font size.
fn cell_scale(size: u32) -> u32 {
    (size / GLYPH_HEIGHT).max(1)
}

fn bitmap_text_size(size: u32, text: &str) -> (u32, u32) {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if chars == 0 {
        return (0, 0);
    }
    let scale = cell_scale(size);
    // No trailing spacing after the last glyph.
    ((chars * GLYPH_ADVANCE - 1) * scale, GLYPH_HEIGHT * scale)
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn draw_bitmap_text(
    image: &mut RgbaImage,
    x: i32,
    y: i32,
    size: u32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = cell_scale(size) as i32;
    let advance = GLYPH_ADVANCE as i32;

    for (index, c) in text.chars().enumerate() {
        let rows = glyph_rows(c);
        let glyph_x = x + (index as i32) * advance * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                fill_cell(
                    image,
                    glyph_x + (col as i32) * scale,
                    y + (row as i32) * scale,
                    scale,
                    color,
                );
            }
        }
    }
}

/// Blend a `scale` x `scale` block at `(x, y)`, clipped to image bounds.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn fill_cell(image: &mut RgbaImage, x: i32, y: i32, scale: i32, color: Rgba<u8>) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + scale).min(width);
    let y1 = (y + scale).min(height);
    for py in y0..y1 {
        for px in x0..x1 {
            image.get_pixel_mut(px as u32, py as u32).blend(&color);
        }
    }
}

/// 5x7 glyph rows, most significant of the low five bits leftmost.
///
/// The stamped text is always a normalized date, so digits plus the two
/// separators are all the coverage the fallback needs.
fn glyph_rows(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => [0x00; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_font_always_resolves() {
        // Whatever the host filesystem looks like, the chain terminates.
        let font = load_font();
        let (w, h) = font.measure(14, "2023-07-15");
        assert!(w > 0);
        assert!(h > 0);
    }

    #[test]
    fn bitmap_measure_scales_with_size() {
        let (w7, h7) = bitmap_text_size(7, "2023-07-15");
        assert_eq!(h7, GLYPH_HEIGHT);
        assert_eq!(w7, 10 * GLYPH_ADVANCE - 1);

        let (w21, h21) = bitmap_text_size(21, "2023-07-15");
        assert_eq!(w21, w7 * 3);
        assert_eq!(h21, h7 * 3);
    }

    #[test]
    fn bitmap_measure_of_empty_text_is_zero() {
        assert_eq!(bitmap_text_size(14, ""), (0, 0));
    }

    #[test]
    fn tiny_sizes_never_collapse_to_zero_cells() {
        assert_eq!(cell_scale(0), 1);
        assert_eq!(cell_scale(6), 1);
        assert_eq!(cell_scale(14), 2);
    }

    #[test]
    fn bitmap_draw_touches_only_the_glyph_region() {
        let mut img = RgbaImage::from_pixel(64, 32, Rgba([0, 0, 0, 255]));
        draw_bitmap_text(&mut img, 2, 2, 7, Rgba([255, 255, 255, 255]), "1");
        // '1' has its stem around column 2 of the glyph grid.
        assert_eq!(*img.get_pixel(4, 2), Rgba([255, 255, 255, 255]));
        // Far corner stays untouched.
        assert_eq!(*img.get_pixel(63, 31), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn bitmap_draw_clips_negative_origin() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        draw_bitmap_text(&mut img, -30, -30, 7, Rgba([255, 255, 255, 255]), "2023");
        // Entirely off-canvas; nothing to draw, nothing to panic over.
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn unknown_glyphs_are_blank() {
        assert_eq!(glyph_rows('Z'), [0u8; 7]);
        assert_eq!(glyph_rows(' '), [0u8; 7]);
    }
}

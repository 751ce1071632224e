//! Watermark layout and drawing.
//!
//! Pure coordinate math plus the single mutating operation of the crate:
//! [`stamp`], which alpha-blends a translucent label box onto the image and
//! draws the date text over it.

use image::{Pixel, Rgba, RgbaImage};

use crate::font::LoadedFont;

/// Distance from the image edge for non-center placements, in pixels.
const MARGIN: i32 = 10;

/// How far the label box extends past the text bounds on each side.
const LABEL_EXPAND: i32 = 2;

/// Alpha of the label box drawn behind the text (50% translucency).
const LABEL_ALPHA: u8 = 128;

/// Watermark placement relative to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Position {
    /// Margin inset from the top-left corner.
    TopLeft,
    /// Margin inset from the top-right corner.
    TopRight,
    /// Margin inset from the bottom-left corner.
    BottomLeft,
    /// Margin inset from the bottom-right corner.
    #[default]
    BottomRight,
    /// Centered on both axes.
    Center,
}

impl Position {
    /// Look up a placement by its kebab-case name, e.g. `"top-left"`.
    ///
    /// Unrecognized names map to the default (`BottomRight`); the CLI layer
    /// rejects invalid values before they get here, so this lookup is for
    /// programmatic callers only.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "center" => Self::Center,
            _ => Self::BottomRight,
        }
    }
}

/// Cap a requested font size at a tenth of the smaller image dimension.
///
/// Keeps oversized requests from swallowing small images; `9999` on a
/// 100x100 photo comes out as `10`.
#[must_use]
pub fn clamped_font_size(requested: u32, width: u32, height: u32) -> u32 {
    requested.min(width.min(height) / 10)
}

/// Compute the draw origin for a text box of `(text_w, text_h)` pixels on
/// an `(width, height)` image.
///
/// Coordinates are signed: text wider than the image yields a negative
/// origin and is clipped at draw time rather than rejected.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn layout(position: Position, (width, height): (u32, u32), (text_w, text_h): (u32, u32)) -> (i32, i32) {
    let (w, h) = (width as i32, height as i32);
    let (tw, th) = (text_w as i32, text_h as i32);
    match position {
        Position::TopLeft => (MARGIN, MARGIN),
        Position::TopRight => (w - tw - MARGIN, MARGIN),
        Position::BottomLeft => (MARGIN, h - th - MARGIN),
        Position::BottomRight => (w - tw - MARGIN, h - th - MARGIN),
        Position::Center => ((w - tw) / 2, (h - th) / 2),
    }
}

/// Stamp `text` onto the image: translucent label box first, then the text
/// in the caller's exact color.
///
/// The label box reuses the text color's RGB channels at a fixed 50% alpha
/// regardless of the alpha requested for the text itself, and extends two
/// pixels past the text bounds on every side. The requested font size is
/// clamped per image before measuring.
pub fn stamp(
    image: &mut RgbaImage,
    text: &str,
    font: &LoadedFont,
    font_size: u32,
    color: Rgba<u8>,
    position: Position,
) {
    let size = clamped_font_size(font_size, image.width(), image.height());
    let (text_w, text_h) = font.measure(size, text);
    let (x, y) = layout(position, (image.width(), image.height()), (text_w, text_h));

    draw_label_box(image, x, y, text_w, text_h, color);
    font.draw(image, x, y, size, color, text);
}

/// Alpha-blend the background rectangle behind the text, clipped to bounds.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn draw_label_box(image: &mut RgbaImage, x: i32, y: i32, text_w: u32, text_h: u32, color: Rgba<u8>) {
    let overlay = Rgba([color[0], color[1], color[2], LABEL_ALPHA]);
    let x0 = (x - LABEL_EXPAND).max(0);
    let y0 = (y - LABEL_EXPAND).max(0);
    let x1 = (x + text_w as i32 + LABEL_EXPAND).min(image.width() as i32);
    let y1 = (y + text_h as i32 + LABEL_EXPAND).min(image.height() as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            image.get_pixel_mut(px as u32, py as u32).blend(&overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::load_font;

    #[test]
    fn font_size_is_clamped_to_tenth_of_min_dimension() {
        assert_eq!(clamped_font_size(9999, 100, 100), 10);
        assert_eq!(clamped_font_size(30, 400, 2000), 30);
        assert_eq!(clamped_font_size(30, 200, 90), 9);
    }

    #[test]
    fn corner_layouts_apply_the_margin() {
        let image = (200, 100);
        let text = (40, 20);
        assert_eq!(layout(Position::TopLeft, image, text), (10, 10));
        assert_eq!(layout(Position::TopRight, image, text), (150, 10));
        assert_eq!(layout(Position::BottomLeft, image, text), (10, 70));
        assert_eq!(layout(Position::BottomRight, image, text), (150, 70));
    }

    #[test]
    fn center_layout_halves_the_leftover_space() {
        assert_eq!(layout(Position::Center, (200, 100), (40, 20)), (80, 40));
        // Integer division on odd leftovers.
        assert_eq!(layout(Position::Center, (201, 101), (40, 20)), (80, 40));
    }

    #[test]
    fn oversized_text_yields_negative_origin() {
        let (x, y) = layout(Position::BottomRight, (50, 50), (200, 20));
        assert!(x < 0);
        assert_eq!(y, 20);
    }

    #[test]
    fn from_name_defaults_to_bottom_right() {
        assert_eq!(Position::from_name("top-left"), Position::TopLeft);
        assert_eq!(Position::from_name("CENTER"), Position::Center);
        assert_eq!(Position::from_name("nonsense"), Position::BottomRight);
        assert_eq!(Position::from_name(""), Position::BottomRight);
    }

    #[test]
    fn stamp_blends_the_label_box_into_the_image() {
        let mut image = RgbaImage::from_pixel(120, 80, Rgba([0, 0, 0, 255]));
        let font = load_font();
        stamp(
            &mut image,
            "2023-07-15",
            &font,
            14,
            Rgba([255, 255, 255, 255]),
            Position::BottomRight,
        );

        // Somewhere in the bottom-right quadrant a pixel was lightened by
        // the 50%-alpha box or the text.
        let mut touched = false;
        for y in 40..80 {
            for x in 60..120 {
                if image.get_pixel(x, y).0 != [0, 0, 0, 255] {
                    touched = true;
                }
            }
        }
        assert!(touched);
        // Opposite corner stays pristine.
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn stamp_survives_text_larger_than_the_image() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([10, 10, 10, 255]));
        let font = load_font();
        stamp(
            &mut image,
            "2023-07-15",
            &font,
            9999,
            Rgba([255, 0, 0, 255]),
            Position::Center,
        );
        assert_eq!(image.width(), 20);
        assert_eq!(image.height(), 20);
    }

    #[test]
    fn label_box_uses_half_alpha_of_the_text_color() {
        let mut image = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        draw_label_box(&mut image, 10, 10, 20, 10, Rgba([255, 255, 255, 255]));
        // Blending white at alpha 128 over black lands mid-gray.
        let px = image.get_pixel(15, 15);
        assert!(px[0] > 100 && px[0] < 160, "got {}", px[0]);
        // Expansion covers two pixels beyond the text origin.
        assert_ne!(*image.get_pixel(8, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(7, 7), Rgba([0, 0, 0, 255]));
    }
}

//! Color string parsing.
//!
//! Accepts named colors, `#RRGGBB` hex, `rgb(r,g,b)` calls, and plain
//! comma-separated channel lists. Parsing is total: anything unrecognized
//! falls back to opaque white with a warning on stderr, so a bad `--color`
//! argument never aborts a batch.

use image::Rgba;

/// Fixed named-color table, matched case-insensitively.
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
];

/// Parse a color specification into an RGBA value.
///
/// Formats are tried in order: named color, `#RRGGBB`, `rgb(r,g,b)`,
/// `R,G,B[,A]`. A failure inside one branch (non-numeric component, wrong
/// channel count, out-of-range value) falls through to the next branch
/// rather than straight to the default. Alpha defaults to 255 unless a
/// fourth channel is given.
///
/// Never fails: unrecognized input yields opaque white and a warning.
#[must_use]
pub fn parse_color(spec: &str) -> Rgba<u8> {
    let lower = spec.to_ascii_lowercase();

    if let Some((_, rgba)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Rgba(*rgba);
    }

    if let Some(rgba) = parse_hex(spec) {
        return rgba;
    }

    if let Some(rgba) = parse_rgb_call(&lower) {
        return rgba;
    }

    if let Some(rgba) = parse_channel_list(spec) {
        return rgba;
    }

    eprintln!("Invalid color format: {spec}. Using white instead.");
    Rgba([255, 255, 255, 255])
}

/// `#RRGGBB`: exactly six hex digits after the hash, opaque.
fn parse_hex(spec: &str) -> Option<Rgba<u8>> {
    let hex = spec.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}

/// `rgb(r,g,b)`: case-insensitive prefix, opaque. Extra components are ignored.
fn parse_rgb_call(lower: &str) -> Option<Rgba<u8>> {
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|v| v.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    Some(Rgba([r, g, b, 255]))
}

/// `R,G,B` or `R,G,B,A`: alpha defaults to 255 when only three are given.
fn parse_channel_list(spec: &str) -> Option<Rgba<u8>> {
    if !spec.contains(',') {
        return None;
    }
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() < 3 {
        return None;
    }
    let r = parts[0].trim().parse::<u8>().ok()?;
    let g = parts[1].trim().parse::<u8>().ok()?;
    let b = parts[2].trim().parse::<u8>().ok()?;
    let a = if parts.len() == 4 {
        parts[3].trim().parse::<u8>().ok()?
    } else {
        255
    };
    Some(Rgba([r, g, b, a]))
}

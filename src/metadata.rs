//! EXIF capture date extraction.
//!
//! Looks up the timestamp a photo was taken from its embedded EXIF block
//! and normalizes it to `YYYY-MM-DD`, the text that ends up stamped onto
//! the image. Absence of a date is a normal skip condition, never an error.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;

/// Canonical EXIF timestamp layout, e.g. `2023:07:15 10:30:00`.
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read the capture date of the image at `path` as a `YYYY-MM-DD` string.
///
/// `DateTimeOriginal` is preferred, with `DateTime` as a fallback. Returns
/// `None` when the file cannot be opened, carries no EXIF block, or has no
/// date field; read failures are logged to stderr and absorbed so a corrupt
/// file never aborts a batch.
#[must_use]
pub fn extract_capture_date(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading EXIF from {}: {e}", path.display());
            return None;
        }
    };
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        // Plain images without an EXIF block are common; only genuine read
        // failures are worth a diagnostic.
        Err(exif::Error::NotFound(_)) => return None,
        Err(e) => {
            eprintln!("Error reading EXIF from {}: {e}", path.display());
            return None;
        }
    };

    let field = exif
        .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
        .or_else(|| exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY))?;

    let raw = field.display_value().to_string();
    normalize_exif_datetime(raw.trim_matches('"').trim())
}

/// Normalize a raw EXIF timestamp value to `YYYY-MM-DD`.
///
/// Values in the canonical `YYYY:MM:DD HH:MM:SS` layout are parsed and
/// reformatted. Anything else that is at least ten characters long keeps
/// its first ten characters with `:` separators replaced by `-`, which
/// preserves the date shape for slightly malformed metadata. Shorter
/// values yield `None`.
#[must_use]
pub fn normalize_exif_datetime(value: &str) -> Option<String> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, EXIF_DATETIME_FORMAT) {
        return Some(datetime.format("%Y-%m-%d").to_string());
    }
    if value.chars().count() >= 10 {
        let head: String = value.chars().take(10).collect();
        return Some(head.replace(':', "-"));
    }
    None
}

//! Stamping pipeline and filesystem dispatch.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::font::{self, LoadedFont};
use crate::metadata;
use crate::render::{self, Position};

/// Extensions considered for stamping in directory mode, lowercase.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff"];

/// Options controlling watermark appearance and output verbosity.
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Requested font size in pixels, before per-image clamping.
    pub font_size: u32,
    /// Text color. The label box reuses its RGB channels at fixed 50% alpha.
    pub color: Rgba<u8>,
    /// Watermark placement.
    pub position: Position,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            font_size: 30,
            color: Rgba([255, 255, 255, 255]),
            position: Position::default(),
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (no capture date found).
    pub skipped: bool,
    /// The normalized capture date stamped onto the image, if any.
    pub date: Option<String>,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failure(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            skipped: false,
            date: None,
            message,
        }
    }
}

/// The stamping engine holding the resolved font.
///
/// Create once with [`StampEngine::new()`] and reuse for any number of
/// images; the font fallback chain is walked a single time.
pub struct StampEngine {
    font: LoadedFont,
}

impl StampEngine {
    /// Create a new engine, resolving the font fallback chain.
    ///
    /// Never fails: the chain terminates in the built-in bitmap font.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font: font::load_font(),
        }
    }

    /// Process a file or directory, writing stamped copies to sibling paths.
    ///
    /// A regular file is stamped to `<stem>_watermark.<ext>` next to it. A
    /// directory gets a sibling `<name>_watermark` directory holding one
    /// output per eligible image, same filename. Any other input produces a
    /// single failed result and no side effects.
    #[must_use]
    pub fn process_path(&self, input: &Path, opts: &StampOptions) -> Vec<ProcessResult> {
        if input.is_file() {
            vec![self.process_file(input, &default_output_path(input), opts)]
        } else if input.is_dir() {
            self.process_directory(input, &default_output_dir(input), opts)
        } else {
            vec![ProcessResult::failure(
                input,
                "Input path does not exist".to_string(),
            )]
        }
    }

    /// Process a single image file: extract date, stamp, save.
    ///
    /// Returns a [`ProcessResult`] indicating success, skip, or failure.
    /// An image without a usable EXIF date is a skip, not an error, and no
    /// output is written for it.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &StampOptions) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            skipped: false,
            date: None,
            message: String::new(),
        };

        let Some(date) = metadata::extract_capture_date(input) else {
            result.skipped = true;
            result.success = true;
            result.message = "No capture date in EXIF metadata".to_string();
            return result;
        };

        let dyn_img = match image::open(input) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };
        let mut rgba_img = dyn_img.to_rgba8();

        render::stamp(
            &mut rgba_img,
            &date,
            &self.font,
            opts.font_size,
            opts.color,
            opts.position,
        );
        result.date = Some(date);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&rgba_img, output) {
            Ok(()) => {
                result.success = true;
                result.message = format!("Watermark added to {}", output.display());
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all eligible images directly inside a directory.
    ///
    /// Non-recursive; only regular files with a supported extension are
    /// considered. The output directory is created if absent (idempotent),
    /// and each output keeps its original filename. Files are processed
    /// strictly one after another; a failure on one never aborts the rest.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &StampOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<_> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .filter(|e| is_supported_image(e.path().as_path()))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failure(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failure(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        entries
            .iter()
            .map(|entry| {
                let input_path = entry.path();
                let output_path = output_dir.join(entry.file_name());
                self.process_file(&input_path, &output_path, opts)
            })
            .collect()
    }
}

impl Default for StampEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Save a stamped RGBA image with format-specific handling.
///
/// JPEG output is flattened to RGB and encoded at maximum quality; the
/// other supported formats keep the alpha channel and go through the
/// format inferred from the output extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            encoder.encode_image(&DynamicImage::ImageRgb8(rgb))?;
        }
        ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Gif | ImageFormat::Tiff => {
            DynamicImage::ImageRgba8(img.clone()).save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path for single-file mode.
///
/// Example: `"photo.jpg"` becomes `"photo_watermark.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    if ext.is_empty() {
        parent.join(format!("{stem}_watermark"))
    } else {
        parent.join(format!("{stem}_watermark.{ext}"))
    }
}

/// Generate the sibling output directory for directory mode.
///
/// Example: `"photos"` becomes `"photos_watermark"` next to it.
#[must_use]
pub fn default_output_dir(input_dir: &Path) -> PathBuf {
    let name = input_dir.file_name().unwrap_or_default().to_string_lossy();
    input_dir.with_file_name(format!("{name}_watermark"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_inserts_watermark_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_watermark.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_watermark.png"
        );

        let p = default_output_path(Path::new("noext"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "noext_watermark");
    }

    #[test]
    fn default_output_dir_is_a_sibling() {
        assert_eq!(
            default_output_dir(Path::new("/data/photos")),
            PathBuf::from("/data/photos_watermark")
        );
        assert_eq!(
            default_output_dir(Path::new("photos")),
            PathBuf::from("photos_watermark")
        );
    }

    #[test]
    fn is_supported_image_accepts_the_fixed_list() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.bmp")));
        assert!(is_supported_image(Path::new("photo.gif")));
        assert!(is_supported_image(Path::new("photo.TIFF")));
    }

    #[test]
    fn is_supported_image_rejects_everything_else() {
        assert!(!is_supported_image(Path::new("photo.webp")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn save_image_rejects_unknown_extensions() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let err = save_image(&img, Path::new("/tmp/out.xyz")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn default_options_match_the_cli_defaults() {
        let opts = StampOptions::default();
        assert_eq!(opts.font_size, 30);
        assert_eq!(opts.color, Rgba([255, 255, 255, 255]));
        assert_eq!(opts.position, Position::BottomRight);
        assert!(!opts.verbose);
        assert!(!opts.quiet);
    }
}

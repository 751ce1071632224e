//! Stamp photos with their EXIF capture date.
//!
//! Reads the capture timestamp embedded in an image's EXIF block,
//! normalizes it to `YYYY-MM-DD`, and draws it onto a copy of the image
//! over a translucent label box. Works on single files or whole
//! directories, always writing to sibling paths — originals are never
//! touched.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use datemark::{StampEngine, StampOptions};
//!
//! let engine = StampEngine::new();
//! let opts = StampOptions::default();
//! for result in engine.process_path(Path::new("photos"), &opts) {
//!     println!("{}: {}", result.path.display(), result.message);
//! }
//! ```
//!
//! # Skips and failures
//!
//! An image without a usable EXIF date is skipped, not failed: it simply
//! gets no output file. Decode and save errors are absorbed per file into
//! the returned [`ProcessResult`], so one bad image never aborts a batch.

#![deny(missing_docs)]

pub mod color;
mod engine;
pub mod error;
pub mod font;
pub mod metadata;
pub mod render;

pub use color::parse_color;
pub use engine::{
    default_output_dir, default_output_path, is_supported_image, save_image, ProcessResult,
    StampEngine, StampOptions,
};
pub use error::{Error, Result};
pub use font::{load_font, LoadedFont};
pub use metadata::{extract_capture_date, normalize_exif_datetime};
pub use render::{clamped_font_size, stamp, Position};

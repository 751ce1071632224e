//! Stamp a single image with its EXIF capture date.
//!
//! Usage:
//! ```sh
//! cargo run --example stamp_one -- input.jpg [output.jpg]
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use datemark::{default_output_path, StampEngine, StampOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input> [output]", args[0]);
        process::exit(1);
    }

    let input = Path::new(&args[1]);
    let output = args
        .get(2)
        .map_or_else(|| default_output_path(input), PathBuf::from);

    let engine = StampEngine::new();
    let result = engine.process_file(input, &output, &StampOptions::default());

    if result.skipped {
        println!("Skipped: {}", result.message);
    } else if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}

use std::path::Path;

use clap::Parser;

use datemark::{parse_color, Position, ProcessResult, StampEngine, StampOptions};

#[derive(Parser)]
#[command(
    name = "datemark",
    about = "Stamp photos with their EXIF capture date",
    version,
    after_help = "Simple usage: datemark <image>  (writes <image>_watermark next to it)\n\n\
                  Images without an EXIF capture date are skipped, and the\n\
                  originals are never modified."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Font size of the watermark text (clamped per image)
    #[arg(long, default_value_t = 30)]
    font_size: u32,

    /// Text color: name, #RRGGBB, rgb(r,g,b) or R,G,B[,A]
    #[arg(long, default_value = "white")]
    color: String,

    /// Position of the watermark
    #[arg(long, value_enum, default_value = "bottom-right")]
    position: Position,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = StampOptions {
        font_size: cli.font_size,
        color: parse_color(&cli.color),
        position: cli.position,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let engine = StampEngine::new();
    let results = engine.process_path(Path::new(&cli.input), &opts);

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Stamped: {success_count}");
        if skip_count > 0 {
            eprint!(", Skipped: {skip_count}");
        }
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    // Per-file failures are diagnostics, not a process failure; the batch
    // always completes.
}

fn print_result(result: &ProcessResult, opts: &StampOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        if !opts.quiet {
            eprintln!("[SKIP] {filename}: {}", result.message);
        }
    } else if result.success {
        if !opts.quiet {
            match &result.date {
                Some(date) => eprintln!("[OK] {filename} ({date})"),
                None => eprintln!("[OK] {filename}"),
            }
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{
    error::Error,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::Parser;
use shadequant::{fit_rgbimage, Mosaic, MosaicPipeline, PaletteIndex, ShadePalette};
use tracing_subscriber::EnvFilter;

/// Prints an image to the terminal as a mosaic of colored shade glyphs.
#[derive(Parser)]
pub struct Options {
    /// The maximum number of terminal rows to use.
    #[arg(short, long, default_value_t = 48)]
    rows: u32,

    /// The number of threads to use (0 uses all available cores).
    #[arg(short, long, default_value_t = 0)]
    threads: u8,

    /// Also write the blended colors of the mosaic to this image file.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Log the time taken by each step.
    #[arg(long)]
    verbose: bool,

    input: PathBuf,
}

/// The ANSI color number of each web palette entry, in palette order.
const ANSI_COLORS: [u8; 16] = [0, 4, 2, 6, 1, 5, 3, 7, 8, 12, 10, 14, 9, 13, 11, 15];

/// The SGR parameter that sets the foreground to the given palette color.
fn sgr_foreground(index: PaletteIndex) -> u8 {
    match ANSI_COLORS[usize::from(index)] {
        n @ 0..=7 => 30 + n,
        n => 90 + (n - 8),
    }
}

/// The SGR parameter that sets the background to the given palette color.
fn sgr_background(index: PaletteIndex) -> u8 {
    sgr_foreground(index) + 10
}

fn write_mosaic(out: &mut impl Write, mosaic: &Mosaic) -> io::Result<()> {
    for row in mosaic.rows() {
        for cell in row {
            write!(
                out,
                "\x1b[{};{}m{}",
                sgr_foreground(cell.foreground),
                sgr_background(cell.background),
                cell.glyph()
            )?;
        }
        writeln!(out, "\x1b[0m")?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    let Options { rows, threads, preview, verbose, input } = Options::parse();

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    macro_rules! timed {
        ($name: literal, $val: expr) => {{
            let time = std::time::Instant::now();
            let value = $val;
            tracing::info!("{} took {}ms", $name, time.elapsed().as_millis());
            value
        }};
    }

    let image = timed!("read image", image::open(&input)?.into_rgb8());
    let image = timed!("fit image", fit_rgbimage(&image, rows));
    tracing::debug!(width = image.width(), height = image.height(), "fitted image");

    let pipeline = MosaicPipeline::try_from(&image)?;
    let mosaic = timed!(
        "quantization",
        match threads {
            0 => pipeline.mosaic_par(),
            1 => pipeline.mosaic(),
            t => rayon::ThreadPoolBuilder::new()
                .num_threads(t.into())
                .build()?
                .install(|| pipeline.mosaic_par()),
        }
    );

    timed!("write mosaic", write_mosaic(&mut BufWriter::new(io::stdout().lock()), &mosaic)?);

    if let Some(path) = preview {
        timed!("write preview", mosaic.to_rgbimage(&ShadePalette::WEB).save(path)?);
    }

    Ok(())
}

//! A library that renders true-color pixels as shade-glyph mosaics for 16-color text terminals.
//!
//! Each pixel becomes one terminal cell: a shade glyph (`░`, `▒`, `▓`, or `█`)
//! drawn in a foreground palette color on top of a background palette color.
//! `shadequant` picks the combination whose blended appearance is closest to the pixel,
//! and remembers the answer for each distinct color so repeated colors are free.
//!
//! # Features
//! To reduce dependencies and compile times, `shadequant` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the [`MosaicPipeline`] builder and the [`Mosaic`] grid as the high-level API.
//! - `threads`: exposes parallel versions of most functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # Low-Level API
//! A [`ShadeQuantizer`] maps one pixel at a time to a [`ShadeMatch`]:
//! ```
//! # use shadequant::{ShadeQuantizer, GlyphLevel};
//! # use palette::Srgb;
//! let mut quantizer = ShadeQuantizer::new();
//! let cell = quantizer.quantize(Srgb::new(64, 64, 64));
//! assert_eq!(cell.foreground.into_inner(), 0);
//! assert_eq!(cell.background.into_inner(), 8);
//! assert_eq!(cell.level, GlyphLevel::Medium);
//! ```
//!
//! # High-Level API
//! To quantize a whole image, see [`MosaicPipeline`]:
//! ```no_run
//! # use shadequant::{MosaicPipeline, fit_rgbimage};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//! let img = fit_rgbimage(&img, 48);
//!
//! let mosaic = MosaicPipeline::try_from(&img)?.mosaic_par();
//! for row in mosaic.rows() {
//!     let line = row.iter().map(|cell| cell.glyph()).collect::<String>();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod quantizer;
mod shade_palette;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub use quantizer::*;
pub use shade_palette::ShadePalette;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The number of colors in every [`ShadePalette`].
pub const NUM_COLORS: u8 = 16;

/// The number of shade glyphs, one per [`GlyphLevel`].
pub const NUM_LEVELS: u8 = 4;

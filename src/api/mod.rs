//! Contains the types and functions for the high level mosaic API.

mod fit;
mod mosaic;
mod mosaic_pipeline;

pub use fit::fit_to_rows;
#[cfg(feature = "image")]
pub use fit::fit_rgbimage;
pub use mosaic::Mosaic;
pub use mosaic_pipeline::MosaicPipeline;

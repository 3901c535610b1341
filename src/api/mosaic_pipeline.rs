//! Contains the [`MosaicPipeline`] builder struct for the high level API.

use crate::{ColorSlice, Mosaic, ShadeMatch, ShadePalette, ShadeQuantizer};
use palette::Srgb;
#[cfg(feature = "image")]
use {crate::AboveMaxLen, image::RgbImage};

/// A builder struct to specify options to turn an image into a [`Mosaic`].
///
/// Each pixel of the input becomes exactly one terminal cell,
/// so resize the image first (e.g., with [`fit_rgbimage`](crate::fit_rgbimage)).
///
/// # Examples
/// To start, create a [`MosaicPipeline`] from a [`RgbImage`] (note that the `image` feature is needed):
/// ```no_run
/// # use shadequant::MosaicPipeline;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let mut pipeline = MosaicPipeline::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
///
/// Or from a raw slice of pixels:
/// ```
/// # use shadequant::{MosaicPipeline, ShadePalette, AboveMaxLen, GlyphLevel};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// let pixels = vec![Srgb::new(0, 0, 0), Srgb::new(64, 64, 64)];
/// let mut pipeline = MosaicPipeline::new(pixels.as_slice().try_into()?, 2, 1).unwrap();
/// pipeline.palette(ShadePalette::WEB);
///
/// let mosaic = pipeline.mosaic();
/// assert_eq!(mosaic.cells()[1].level, GlyphLevel::Medium);
/// # Ok(())
/// # }
/// ```
///
/// To reuse the cache of previously seen colors across several images,
/// pass the same quantizer to [`MosaicPipeline::mosaic_with`]:
/// ```
/// # use shadequant::{MosaicPipeline, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// # let pixels = vec![Srgb::new(0, 0, 0)];
/// # let pipeline = MosaicPipeline::new(pixels.as_slice().try_into()?, 1, 1).unwrap();
/// let mut quantizer = pipeline.quantizer();
/// let first = pipeline.mosaic_with(&mut quantizer);
/// let second = pipeline.mosaic_with(&mut quantizer);
/// assert_eq!(first, second);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct MosaicPipeline<'a> {
    /// The input image as a flat slice of pixels.
    pub(crate) colors: ColorSlice<'a, Srgb<u8>>,
    /// The dimensions of the image.
    pub(crate) dimensions: (u32, u32),
    /// The reference colors to quantize to.
    pub(crate) palette: ShadePalette,
}

impl<'a> MosaicPipeline<'a> {
    /// Creates a new [`MosaicPipeline`] with default options
    /// and does not validate the size of the input image/slice.
    fn new_unchecked(colors: ColorSlice<'a, Srgb<u8>>, width: u32, height: u32) -> Self {
        Self {
            colors,
            dimensions: (width, height),
            palette: ShadePalette::default(),
        }
    }

    /// Creates a new [`MosaicPipeline`] with default options.
    /// Returns `None` if the length of `colors` is not equal to `width * height`.
    #[must_use]
    pub fn new(colors: ColorSlice<'a, Srgb<u8>>, width: u32, height: u32) -> Option<Self> {
        if colors.len() == width as usize * height as usize {
            Some(Self::new_unchecked(colors, width, height))
        } else {
            None
        }
    }

    /// Sets the palette to quantize to.
    ///
    /// This only affects [`MosaicPipeline::mosaic`], [`MosaicPipeline::mosaic_par`],
    /// and [`MosaicPipeline::quantizer`]; the `_with` variants use the palette of the given quantizer.
    ///
    /// The default palette is [`ShadePalette::WEB`].
    pub fn palette(&mut self, palette: ShadePalette) -> &mut Self {
        self.palette = palette;
        self
    }

    /// Creates an empty [`ShadeQuantizer`] for the configured palette.
    #[must_use]
    pub fn quantizer(&self) -> ShadeQuantizer {
        ShadeQuantizer::with_palette(self.palette)
    }

    /// Wraps the quantized cells into a [`Mosaic`].
    fn wrap_cells(&self, cells: Vec<ShadeMatch>) -> Mosaic {
        let (width, height) = self.dimensions;
        tracing::debug!(width, height, "built mosaic");

        #[allow(clippy::expect_used)]
        {
            // one cell per pixel, and new ensured colors.len() == width * height
            Mosaic::new(cells, width, height).expect("one cell per pixel")
        }
    }

    /// Runs the pipeline with a fresh quantizer and returns the mosaic.
    #[must_use]
    pub fn mosaic(&self) -> Mosaic {
        self.mosaic_with(&mut self.quantizer())
    }

    /// Runs the pipeline using (and filling) the cache of the given quantizer.
    #[must_use]
    pub fn mosaic_with(&self, quantizer: &mut ShadeQuantizer) -> Mosaic {
        self.wrap_cells(quantizer.quantize_pixels(self.colors))
    }
}

#[cfg(feature = "threads")]
impl<'a> MosaicPipeline<'a> {
    /// Runs the pipeline in parallel with a fresh quantizer and returns the mosaic.
    #[must_use]
    pub fn mosaic_par(&self) -> Mosaic {
        self.mosaic_par_with(&mut self.quantizer())
    }

    /// Runs the pipeline in parallel using (and filling) the cache of the given quantizer.
    #[must_use]
    pub fn mosaic_par_with(&self, quantizer: &mut ShadeQuantizer) -> Mosaic {
        self.wrap_cells(quantizer.quantize_pixels_par(self.colors))
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for MosaicPipeline<'a> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Ok(Self::new_unchecked(
            image.try_into()?,
            image.width(),
            image.height(),
        ))
    }
}

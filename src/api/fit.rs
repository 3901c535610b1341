//! Sizing images to fit a terminal.

#[cfg(feature = "image")]
use image::{imageops, RgbImage};

/// Terminal cells are roughly twice as tall as they are wide,
/// so each scaled image row is stretched over this many cells horizontally.
const CELL_ASPECT: u32 = 2;

/// Returns the mosaic dimensions, in terminal cells, for an image of the given size
/// that should span at most `max_rows` rows.
///
/// The image is scaled uniformly (up or down) so that its larger side becomes `max_rows`,
/// truncating fractional sizes, and then its width is doubled to account for the shape of a
/// terminal cell. This means the returned width can be up to `2 * max_rows`.
///
/// Both dimensions are `0` if the image is empty or `max_rows` is `0`.
///
/// The scaling is computed exactly as `side * max_rows / max(width, height)` in integers and then truncated,
/// so no rounding error can shave off a cell (e.g., a 3×6 image fit to 2 rows is 1 column wide, not 0).
///
/// # Examples
/// ```
/// # use shadequant::fit_to_rows;
/// assert_eq!(fit_to_rows(640, 480, 48), (96, 36));
/// assert_eq!(fit_to_rows(10, 20, 48), (48, 48));
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fit_to_rows(width: u32, height: u32, max_rows: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_rows == 0 {
        return (0, 0);
    }

    let longest = u64::from(width.max(height));
    let scale = |side: u32| (u64::from(side) * u64::from(max_rows) / longest) as u32;

    (scale(width) * CELL_ASPECT, scale(height))
}

/// Resizes an image to the dimensions given by [`fit_to_rows`],
/// so that each pixel of the result becomes exactly one terminal cell.
///
/// A triangle (bilinear) filter is used for the resampling.
#[cfg(feature = "image")]
#[must_use]
pub fn fit_rgbimage(image: &RgbImage, max_rows: u32) -> RgbImage {
    let (width, height) = fit_to_rows(image.width(), image.height(), max_rows);
    if width == 0 || height == 0 {
        RgbImage::new(width, height)
    } else {
        imageops::resize(image, width, height, imageops::FilterType::Triangle)
    }
}

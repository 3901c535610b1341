//! Contains the [`Mosaic`] output grid.

use crate::ShadeMatch;
use std::slice::ChunksExact;
#[cfg(feature = "image")]
use {
    crate::ShadePalette,
    image::RgbImage,
    palette::{cast::IntoComponents, Srgb},
};

/// A row-major grid of terminal cells produced by a [`MosaicPipeline`](crate::MosaicPipeline).
///
/// A renderer should write the cells of each row left to right, ending each row with a newline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mosaic {
    /// The number of cells in each row.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The cells, row by row.
    cells: Vec<ShadeMatch>,
}

impl Mosaic {
    /// Creates a new [`Mosaic`] from its cells.
    /// Returns `None` if the number of cells is not equal to `width * height`.
    #[must_use]
    pub fn new(cells: Vec<ShadeMatch>, width: u32, height: u32) -> Option<Self> {
        if cells.len() == width as usize * height as usize {
            Some(Self { width, height, cells })
        } else {
            None
        }
    }

    /// The number of cells in each row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[ShadeMatch] {
        &self.cells
    }

    /// Consumes the mosaic, returning its cells in row-major order.
    #[must_use]
    pub fn into_cells(self) -> Vec<ShadeMatch> {
        self.cells
    }

    /// Returns the cell at column `x` of row `y`, if it is in bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&ShadeMatch> {
        if x < self.width && y < self.height {
            self.cells.get(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Returns an iterator over the rows of the mosaic, from top to bottom.
    pub fn rows(&self) -> ChunksExact<'_, ShadeMatch> {
        self.cells.chunks_exact(self.width.max(1) as usize)
    }
}

#[cfg(feature = "image")]
impl Mosaic {
    /// Renders each cell as its blended color, giving a preview of how the mosaic
    /// should look in a terminal using `palette`.
    #[must_use]
    pub fn to_rgbimage(&self, palette: &ShadePalette) -> RgbImage {
        let buf = self
            .cells
            .iter()
            .map(|cell| cell.blended(palette))
            .collect::<Vec<Srgb<u8>>>()
            .into_components();

        #[allow(clippy::expect_used)]
        {
            // cells.len() is equal to width * height by construction
            RgbImage::from_vec(self.width, self.height, buf).expect("large enough buffer")
        }
    }
}

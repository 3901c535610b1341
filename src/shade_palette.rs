//! Contains the fixed reference colors and glyphs that mosaics are built from.

use crate::{GlyphLevel, PaletteIndex, NUM_COLORS, NUM_LEVELS};
use palette::Srgb;

/// The number of palette colors as a `usize` for array lengths.
const K: usize = NUM_COLORS as usize;

/// Creates an [`Srgb`] color from a `0xRRGGBB` hex triplet.
#[allow(clippy::cast_possible_truncation)]
const fn hex(rgb: u32) -> Srgb<u8> {
    Srgb::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// An immutable set of 16 reference colors alongside the 4 shade glyphs.
///
/// A [`ShadePalette`] is plain data: it is `Copy` and can be freely shared
/// between threads and quantizers.
///
/// # Examples
/// ```
/// # use shadequant::{ShadePalette, GlyphLevel, PaletteIndex};
/// # use palette::Srgb;
/// let palette = ShadePalette::WEB;
/// assert_eq!(palette.colors()[15], Srgb::new(255, 255, 255));
/// assert_eq!(palette.glyphs(), ['░', '▒', '▓', '█']);
///
/// let navy = PaletteIndex::try_from(1).unwrap();
/// let black = PaletteIndex::try_from(0).unwrap();
/// assert_eq!(palette.blend(navy, black, GlyphLevel::Medium), Srgb::new(0, 0, 64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadePalette {
    /// The reference colors, indexed by [`PaletteIndex`].
    colors: [Srgb<u8>; K],
}

impl ShadePalette {
    /// The classic "16 named web colors", ordered to match console color numbering.
    pub const WEB: Self = Self {
        colors: [
            hex(0x000000), // black
            hex(0x000080), // navy
            hex(0x008000), // green
            hex(0x008080), // teal
            hex(0x800000), // maroon
            hex(0x800080), // purple
            hex(0x808000), // olive
            hex(0xC0C0C0), // silver
            hex(0x808080), // grey
            hex(0x0000FF), // blue
            hex(0x00FF00), // lime
            hex(0x00FFFF), // aqua
            hex(0xFF0000), // red
            hex(0xFF00FF), // fuchsia
            hex(0xFFFF00), // yellow
            hex(0xFFFFFF), // white
        ],
    };

    /// Creates a new [`ShadePalette`] with the given colors.
    #[must_use]
    pub const fn new(colors: [Srgb<u8>; K]) -> Self {
        Self { colors }
    }

    /// Returns the reference colors in palette index order.
    #[must_use]
    pub const fn colors(&self) -> &[Srgb<u8>; K] {
        &self.colors
    }

    /// Returns the color for the given palette index.
    #[must_use]
    pub fn color(&self, index: PaletteIndex) -> Srgb<u8> {
        self.colors[usize::from(index)]
    }

    /// Returns the glyph levels in ascending order of coverage.
    #[must_use]
    pub const fn glyph_levels(&self) -> [GlyphLevel; NUM_LEVELS as usize] {
        GlyphLevel::ALL
    }

    /// Returns the shade glyphs in ascending order of coverage.
    #[must_use]
    pub fn glyphs(&self) -> [char; NUM_LEVELS as usize] {
        self.glyph_levels().map(GlyphLevel::glyph)
    }

    /// Returns the color a terminal cell appears as when `level` of it is painted
    /// in `foreground` and the rest in `background`.
    ///
    /// Each channel is the coverage weighted mean, truncated towards zero.
    #[must_use]
    pub fn blend(
        &self,
        foreground: PaletteIndex,
        background: PaletteIndex,
        level: GlyphLevel,
    ) -> Srgb<u8> {
        blend_colors(self.color(foreground), self.color(background), level)
    }
}

impl Default for ShadePalette {
    fn default() -> Self {
        Self::WEB
    }
}

impl From<[Srgb<u8>; K]> for ShadePalette {
    fn from(colors: [Srgb<u8>; K]) -> Self {
        Self::new(colors)
    }
}

/// Blends two colors channel by channel at the coverage of `level`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn blend_colors(fg: Srgb<u8>, bg: Srgb<u8>, level: GlyphLevel) -> Srgb<u8> {
    let k = u16::from(level.coverage());
    let n = u16::from(NUM_LEVELS);
    let mix = |f: u8, b: u8| ((u16::from(f) * k + u16::from(b) * (n - k)) / n) as u8;
    Srgb::new(mix(fg.red, bg.red), mix(fg.green, bg.green), mix(fg.blue, bg.blue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_palette_order() {
        let colors = ShadePalette::WEB.colors();
        assert_eq!(colors[0], Srgb::new(0, 0, 0));
        assert_eq!(colors[1], Srgb::new(0, 0, 128));
        assert_eq!(colors[7], Srgb::new(192, 192, 192));
        assert_eq!(colors[8], Srgb::new(128, 128, 128));
        assert_eq!(colors[12], Srgb::new(255, 0, 0));
        assert_eq!(colors[15], Srgb::new(255, 255, 255));
        assert_eq!(ShadePalette::default(), ShadePalette::WEB);
    }

    #[test]
    fn blend_truncates() {
        let white = Srgb::new(255, 255, 255);
        let black = Srgb::new(0, 0, 0);
        assert_eq!(blend_colors(white, black, GlyphLevel::Full), white);
        assert_eq!(blend_colors(white, black, GlyphLevel::Dark), Srgb::new(191, 191, 191));
        assert_eq!(blend_colors(white, black, GlyphLevel::Medium), Srgb::new(127, 127, 127));
        assert_eq!(blend_colors(white, black, GlyphLevel::Light), Srgb::new(63, 63, 63));
        assert_eq!(blend_colors(black, white, GlyphLevel::Light), Srgb::new(191, 191, 191));
    }

    #[test]
    fn blend_per_channel() {
        let red = Srgb::new(255, 0, 0);
        let teal = Srgb::new(0, 128, 128);
        assert_eq!(blend_colors(red, teal, GlyphLevel::Dark), Srgb::new(191, 32, 32));
    }
}

//! Contains various types needed across the crate.

use crate::{MAX_PIXELS, NUM_COLORS, NUM_LEVELS};
use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
};
#[cfg(feature = "image")]
use {
    image::RgbImage,
    palette::{cast::ComponentsAs, Srgb},
};

/// An error type for when the length of an input (e.g., `Vec` or slice)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// An error type for when a `u8` is not a valid palette color ID.
///
/// The inner value is the rejected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvalidPaletteIndex(pub u8);

impl Display for InvalidPaletteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "palette index {} is not below the palette length of {NUM_COLORS}",
            self.0
        )
    }
}

impl Error for InvalidPaletteIndex {}

/// An error type for when a `u8` is not a valid glyph coverage level.
///
/// The inner value is the rejected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvalidGlyphLevel(pub u8);

impl Display for InvalidGlyphLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "glyph level {} is not in the range 1..={NUM_LEVELS}",
            self.0
        )
    }
}

impl Error for InvalidGlyphLevel {}

/// A simple new type wrapper around `&'a [Color]` with the invariant that the length of the
/// inner slice must not be greater than [`MAX_PIXELS`].
///
/// # Examples
/// Use `try_into` or [`ColorSlice::from_truncated`] to create [`ColorSlice`]s.
///
/// From a raw color slice:
/// ```
/// # use shadequant::{ColorSlice, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// let srgb = vec![Srgb::new(0, 0, 0)];
/// let colors: ColorSlice<_> = srgb.as_slice().try_into()?;
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use shadequant::ColorSlice;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let colors = ColorSlice::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorSlice<'a, Color>(&'a [Color]);

impl<'a, Color> Clone for ColorSlice<'a, Color> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, Color> Copy for ColorSlice<'a, Color> {}

impl<'a, Color> ColorSlice<'a, Color> {
    /// Creates a new [`ColorSlice`] by truncating the input slice to a max length of [`MAX_PIXELS`].
    pub fn from_truncated(colors: &'a [Color]) -> Self {
        Self(&colors[..colors.len().min(MAX_PIXELS as usize)])
    }

    /// Returns the length of the slice as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_colors(&self) -> u32 {
        self.0.len() as u32
    }
}

impl<'a, Color> AsRef<[Color]> for ColorSlice<'a, Color> {
    fn as_ref(&self) -> &[Color] {
        self
    }
}

impl<'a, Color> Deref for ColorSlice<'a, Color> {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a, Color> From<ColorSlice<'a, Color>> for &'a [Color] {
    fn from(val: ColorSlice<'a, Color>) -> Self {
        val.0
    }
}

impl<'a, Color> TryFrom<&'a [Color]> for ColorSlice<'a, Color> {
    type Error = AboveMaxLen<u32>;

    fn try_from(slice: &'a [Color]) -> Result<Self, Self::Error> {
        if slice.len() <= MAX_PIXELS as usize {
            Ok(Self(slice))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ColorSlice<'a, Srgb<u8>> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        if pixels <= MAX_PIXELS as usize {
            let buf = &image.as_raw()[..(pixels * 3)];
            Ok(Self(buf.components_as()))
        } else {
            Err(AboveMaxLen(MAX_PIXELS))
        }
    }
}

/// A palette color ID: an index into a [`ShadePalette`](crate::ShadePalette).
///
/// This is a simple new type wrapper around `u8` with the invariant that it must be
/// less than [`NUM_COLORS`].
///
/// With the default web palette, the ID also matches the classic 16-color
/// console numbering (0 is black, 7 is silver/gray, 15 is white, and so on).
///
/// # Examples
/// ```
/// # use shadequant::{PaletteIndex, InvalidPaletteIndex};
/// # fn main() -> Result<(), InvalidPaletteIndex> {
/// let white = PaletteIndex::try_from(15)?;
/// assert_eq!(white.into_inner(), 15);
/// assert!(PaletteIndex::try_from(16).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    /// The largest valid palette index.
    pub const MAX: Self = Self(NUM_COLORS - 1);

    /// Gets the inner `u8` value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }

    /// Creates a [`PaletteIndex`] directly from the given `u8`
    /// without ensuring that it is less than [`NUM_COLORS`].
    pub(crate) const fn new_unchecked(value: u8) -> Self {
        Self(value)
    }

    /// Returns an iterator over every palette index in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator + Clone {
        (0..NUM_COLORS).map(Self)
    }
}

impl From<PaletteIndex> for u8 {
    fn from(val: PaletteIndex) -> Self {
        val.into_inner()
    }
}

impl From<PaletteIndex> for usize {
    fn from(val: PaletteIndex) -> Self {
        val.into_inner().into()
    }
}

impl TryFrom<u8> for PaletteIndex {
    type Error = InvalidPaletteIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < NUM_COLORS {
            Ok(Self(value))
        } else {
            Err(InvalidPaletteIndex(value))
        }
    }
}

impl Display for PaletteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// The fraction of a terminal cell that a shade glyph paints in the foreground color.
///
/// Level `k` covers `k / 4` of the cell in the foreground color and the rest in the background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GlyphLevel {
    /// `░`, a quarter foreground.
    Light = 1,
    /// `▒`, half foreground.
    Medium = 2,
    /// `▓`, three quarters foreground.
    Dark = 3,
    /// `█`, a solid foreground block.
    Full = 4,
}

impl GlyphLevel {
    /// Every level in ascending order of coverage.
    pub const ALL: [Self; NUM_LEVELS as usize] = [Self::Light, Self::Medium, Self::Dark, Self::Full];

    /// The number of quarters of the cell painted in the foreground color (`1..=4`).
    #[must_use]
    pub const fn coverage(self) -> u8 {
        self as u8
    }

    /// The shade glyph drawn for this level.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            GlyphLevel::Light => '\u{2591}',
            GlyphLevel::Medium => '\u{2592}',
            GlyphLevel::Dark => '\u{2593}',
            GlyphLevel::Full => '\u{2588}',
        }
    }

    /// Whether this level lies strictly between the lightest and the solid glyph.
    #[must_use]
    pub const fn is_partial(self) -> bool {
        matches!(self, GlyphLevel::Medium | GlyphLevel::Dark)
    }
}

impl From<GlyphLevel> for u8 {
    fn from(level: GlyphLevel) -> Self {
        level.coverage()
    }
}

impl TryFrom<u8> for GlyphLevel {
    type Error = InvalidGlyphLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GlyphLevel::Light),
            2 => Ok(GlyphLevel::Medium),
            3 => Ok(GlyphLevel::Dark),
            4 => Ok(GlyphLevel::Full),
            _ => Err(InvalidGlyphLevel(value)),
        }
    }
}

impl Display for GlyphLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// The rendering instructions chosen for a single pixel.
///
/// Draw [`ShadeMatch::glyph`] with the `foreground` palette color on top of the
/// `background` palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadeMatch {
    /// The palette color used to draw the glyph.
    pub foreground: PaletteIndex,
    /// The palette color behind the glyph.
    pub background: PaletteIndex,
    /// How much of the cell the glyph covers.
    pub level: GlyphLevel,
}

impl ShadeMatch {
    /// The glyph to write for this match.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.level.glyph()
    }
}

impl Default for ShadeMatch {
    fn default() -> Self {
        Self {
            foreground: PaletteIndex::default(),
            background: PaletteIndex::default(),
            level: GlyphLevel::Full,
        }
    }
}

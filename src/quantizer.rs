//! Contains the memoized shade quantizer.
//!
//! For each pixel, the quantizer searches every combination of
//! foreground palette color, background palette color, and glyph level
//! (16 × 16 × 4 = 1024 candidates) for the blend that is closest to the pixel
//! under squared euclidean distance in sRGB.
//!
//! The two partial glyph levels ([`GlyphLevel::Medium`] and [`GlyphLevel::Dark`]) look noisy
//! unless they are already close to the pixel, so candidates at those levels are only
//! considered if their distance is at most [`PRUNE_THRESHOLD`].
//! The solid and lightest levels are always considered.
//!
//! Ties are broken by iteration order, where the first candidate seen wins:
//! glyph level from most to least coverage, then foreground index ascending,
//! then background index ascending.

use crate::{
    shade_palette::blend_colors, ColorSlice, GlyphLevel, PaletteIndex, ShadeMatch, ShadePalette,
};
use palette::Srgb;
#[cfg(feature = "threads")]
use rayon::prelude::*;
use std::collections::HashMap;

/// Candidates at partial glyph levels with a distance above this value are skipped.
pub const PRUNE_THRESHOLD: u32 = 50_000;

/// Squared euclidean distance between two colors.
#[inline]
#[must_use]
pub fn shade_distance(x: Srgb<u8>, y: Srgb<u8>) -> u32 {
    let d = |a: u8, b: u8| {
        let d = u32::from(a.abs_diff(b));
        d * d
    };
    d(x.red, y.red) + d(x.green, y.green) + d(x.blue, y.blue)
}

/// Packs a color into the key used by the cache.
///
/// The key is the exact channel triple, so two distinct colors never share a cache entry.
#[inline]
fn cache_key(color: Srgb<u8>) -> u32 {
    (u32::from(color.red) << 16) | (u32::from(color.green) << 8) | u32::from(color.blue)
}

/// Runs the full candidate search for a single pixel, returning the best match and its distance.
#[allow(clippy::cast_possible_truncation)]
fn search(palette: &ShadePalette, pixel: Srgb<u8>) -> (ShadeMatch, u32) {
    let colors = palette.colors();

    let mut best = ShadeMatch::default();
    let mut best_distance = u32::MAX;

    for level in GlyphLevel::ALL.into_iter().rev() {
        for (f, &fg) in colors.iter().enumerate() {
            for (b, &bg) in colors.iter().enumerate() {
                let distance = shade_distance(pixel, blend_colors(fg, bg, level));

                if level.is_partial() && distance > PRUNE_THRESHOLD {
                    continue;
                }

                if distance < best_distance {
                    best_distance = distance;
                    best = ShadeMatch {
                        foreground: PaletteIndex::new_unchecked(f as u8),
                        background: PaletteIndex::new_unchecked(b as u8),
                        level,
                    };
                }
            }
        }
    }

    (best, best_distance)
}

/// A shade quantizer that remembers the match for every color it has seen.
///
/// The quantizer owns its cache; create one per rendering session and
/// pass the same instance around to reuse previous results.
/// The cache is never evicted, so it holds at most one entry per distinct color
/// in the processed pixels (bounded by 2²⁴ entries for a photographic gradient).
/// Since the search is a pure function of the pixel and the palette,
/// the cache only changes the cost of [`ShadeQuantizer::quantize`], never its result.
///
/// # Examples
/// ```
/// # use shadequant::{ShadeQuantizer, GlyphLevel};
/// # use palette::Srgb;
/// let mut quantizer = ShadeQuantizer::new();
///
/// let white = quantizer.quantize(Srgb::new(255, 255, 255));
/// assert_eq!(white.foreground.into_inner(), 15);
/// assert_eq!(white.level, GlyphLevel::Full);
///
/// let gray = quantizer.quantize(Srgb::new(64, 64, 64));
/// assert_eq!(gray.glyph(), '▒');
/// assert_eq!(quantizer.cached_colors(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShadeQuantizer {
    /// The reference colors to search over.
    palette: ShadePalette,
    /// Previously computed matches keyed by packed color.
    cache: HashMap<u32, ShadeMatch>,
}

impl ShadeQuantizer {
    /// Creates a new [`ShadeQuantizer`] for the [`ShadePalette::WEB`] palette with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`ShadeQuantizer`] for the given palette with an empty cache.
    #[must_use]
    pub fn with_palette(palette: ShadePalette) -> Self {
        Self { palette, cache: HashMap::new() }
    }

    /// Returns the palette this quantizer searches over.
    #[must_use]
    pub const fn palette(&self) -> &ShadePalette {
        &self.palette
    }

    /// Returns the number of distinct colors currently held in the cache.
    #[must_use]
    pub fn cached_colors(&self) -> usize {
        self.cache.len()
    }

    /// Returns the best match for the given pixel, consulting and then filling the cache.
    pub fn quantize(&mut self, pixel: Srgb<u8>) -> ShadeMatch {
        let palette = &self.palette;
        *self.cache.entry(cache_key(pixel)).or_insert_with(|| {
            tracing::trace!(?pixel, "cache miss");
            search(palette, pixel).0
        })
    }

    /// Returns the best match for the given pixel without reading or writing the cache.
    #[must_use]
    pub fn quantize_uncached(&self, pixel: Srgb<u8>) -> ShadeMatch {
        search(&self.palette, pixel).0
    }

    /// Returns the best match for the given pixel along with its squared distance
    /// to the blended color, without touching the cache.
    #[must_use]
    pub fn quantize_with_distance(&self, pixel: Srgb<u8>) -> (ShadeMatch, u32) {
        search(&self.palette, pixel)
    }

    /// Quantizes each pixel in order.
    pub fn quantize_pixels(&mut self, pixels: ColorSlice<Srgb<u8>>) -> Vec<ShadeMatch> {
        let before = self.cache.len();
        let matches = pixels.iter().map(|&pixel| self.quantize(pixel)).collect();
        tracing::debug!(
            pixels = pixels.len(),
            new_colors = self.cache.len() - before,
            cached_colors = self.cache.len(),
            "quantized pixels"
        );
        matches
    }
}

#[cfg(feature = "threads")]
impl ShadeQuantizer {
    /// Quantizes each pixel in parallel, returning the same matches as
    /// [`ShadeQuantizer::quantize_pixels`].
    ///
    /// The colors missing from the cache are first deduplicated and searched in parallel.
    /// The results are then added to the cache before every pixel is looked up in parallel.
    pub fn quantize_pixels_par(&mut self, pixels: ColorSlice<Srgb<u8>>) -> Vec<ShadeMatch> {
        let before = self.cache.len();

        let mut missing = pixels
            .par_iter()
            .map(|&pixel| cache_key(pixel))
            .filter(|key| !self.cache.contains_key(key))
            .collect::<Vec<_>>();

        missing.par_sort_unstable();
        missing.dedup();

        let palette = &self.palette;
        let found = missing
            .par_iter()
            .map(|&key| (key, search(palette, unpack_key(key)).0))
            .collect::<Vec<_>>();

        self.cache.extend(found);

        let cache = &self.cache;
        #[allow(clippy::expect_used)]
        let matches = pixels
            .par_iter()
            .map(|&pixel| {
                // every color missing from the cache was inserted above
                *cache.get(&cache_key(pixel)).expect("cached color")
            })
            .collect();

        tracing::debug!(
            pixels = pixels.len(),
            new_colors = self.cache.len() - before,
            cached_colors = self.cache.len(),
            "quantized pixels in parallel"
        );

        matches
    }
}

/// Unpacks a cache key back into its color.
#[cfg(feature = "threads")]
#[allow(clippy::cast_possible_truncation)]
fn unpack_key(key: u32) -> Srgb<u8> {
    Srgb::new((key >> 16) as u8, (key >> 8) as u8, key as u8)
}

impl ShadeMatch {
    /// Returns the color this match appears as when drawn with the given palette.
    #[must_use]
    pub fn blended(&self, palette: &ShadePalette) -> Srgb<u8> {
        palette.blend(self.foreground, self.background, self.level)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    fn idx(i: u8) -> PaletteIndex {
        PaletteIndex::try_from(i).unwrap()
    }

    fn shade(foreground: u8, background: u8, level: GlyphLevel) -> ShadeMatch {
        ShadeMatch {
            foreground: idx(foreground),
            background: idx(background),
            level,
        }
    }

    #[test]
    fn palette_colors_are_solid() {
        let quantizer = ShadeQuantizer::new();

        let black = quantizer.quantize_with_distance(Srgb::new(0, 0, 0));
        assert_eq!(black, (shade(0, 0, GlyphLevel::Full), 0));

        let white = quantizer.quantize_with_distance(Srgb::new(255, 255, 255));
        assert_eq!(white, (shade(15, 0, GlyphLevel::Full), 0));

        for (i, &color) in ShadePalette::WEB.colors().iter().enumerate() {
            let (solid, distance) = quantizer.quantize_with_distance(color);
            assert_eq!(distance, 0);
            assert_eq!(solid.level, GlyphLevel::Full);
            assert_eq!(usize::from(solid.foreground), i);
            assert_eq!(solid.background, idx(0));
        }
    }

    #[test]
    fn mid_gray_is_a_solid_grey() {
        let mut quantizer = ShadeQuantizer::new();
        let gray = quantizer.quantize(Srgb::new(128, 128, 128));
        assert_eq!(gray, shade(8, 0, GlyphLevel::Full));
        assert_eq!(gray.glyph(), '█');
    }

    #[test]
    fn half_blend_of_black_and_grey() {
        let quantizer = ShadeQuantizer::new();
        let (shade_match, distance) = quantizer.quantize_with_distance(Srgb::new(64, 64, 64));
        assert_eq!(shade_match, shade(0, 8, GlyphLevel::Medium));
        assert_eq!(distance, 0);
    }

    #[test]
    fn reference_matches() {
        let quantizer = ShadeQuantizer::new();
        let cases = [
            ((255, 128, 0), shade(12, 14, GlyphLevel::Medium), 1),
            ((100, 149, 237), shade(9, 15, GlyphLevel::Medium), 1537),
            ((200, 30, 30), shade(12, 3, GlyphLevel::Dark), 89),
        ];
        for ((r, g, b), expected, distance) in cases {
            assert_eq!(
                quantizer.quantize_with_distance(Srgb::new(r, g, b)),
                (expected, distance)
            );
        }
    }

    #[test]
    fn partial_levels_above_threshold_are_skipped() {
        let mut colors = [Srgb::new(0, 0, 0); 16];
        colors[15] = Srgb::new(0, 0, 255);
        let palette = ShadePalette::new(colors);
        let quantizer = ShadeQuantizer::with_palette(palette);
        let pixel = Srgb::new(255, 255, 127);

        // the half blend of black and blue is the closest candidate, but it is too far away
        let medium = palette.blend(idx(0), idx(15), GlyphLevel::Medium);
        assert_eq!(shade_distance(pixel, medium), 130_050);
        assert!(shade_distance(pixel, medium) > PRUNE_THRESHOLD);

        let (shade_match, distance) = quantizer.quantize_with_distance(pixel);
        assert_eq!(shade_match, shade(0, 15, GlyphLevel::Light));
        assert_eq!(distance, 134_146);
    }

    #[test]
    fn partial_levels_below_threshold_are_kept() {
        let mut colors = [Srgb::new(0, 0, 0); 16];
        colors[15] = Srgb::new(255, 255, 255);
        let quantizer = ShadeQuantizer::with_palette(ShadePalette::new(colors));

        let (shade_match, distance) = quantizer.quantize_with_distance(Srgb::new(127, 127, 127));
        assert_eq!(shade_match, shade(0, 15, GlyphLevel::Medium));
        assert_eq!(distance, 0);
    }

    #[test]
    fn identical_palette_prefers_first_candidate() {
        let palette = ShadePalette::new([Srgb::new(100, 100, 100); 16]);
        let quantizer = ShadeQuantizer::with_palette(palette);
        for pixel in [Srgb::new(100, 100, 100), Srgb::new(0, 255, 30)] {
            assert_eq!(quantizer.quantize_uncached(pixel), shade(0, 0, GlyphLevel::Full));
        }
    }

    #[test]
    fn ties_prefer_higher_levels_then_lower_indices() {
        let quantizer = ShadeQuantizer::new();

        // exact at (8, 0, Dark), (0, 7, Medium), (7, 0, Medium), and (0, 8, Light)
        assert_eq!(
            quantizer.quantize_with_distance(Srgb::new(96, 96, 96)),
            (shade(8, 0, GlyphLevel::Dark), 0)
        );

        // exact at (0, 8, Dark) and (8, 0, Light)
        assert_eq!(
            quantizer.quantize_with_distance(Srgb::new(32, 32, 32)),
            (shade(0, 8, GlyphLevel::Dark), 0)
        );

        // exact at (7, 8, Medium) and (8, 7, Medium)
        assert_eq!(
            quantizer.quantize_with_distance(Srgb::new(160, 160, 160)),
            (shade(7, 8, GlyphLevel::Medium), 0)
        );
    }

    #[test]
    fn result_is_optimal() {
        let quantizer = ShadeQuantizer::new();
        let palette = quantizer.palette();
        for &pixel in &test_data_256() {
            let (best, best_distance) = quantizer.quantize_with_distance(pixel);
            assert_eq!(shade_distance(pixel, best.blended(palette)), best_distance);
            for level in GlyphLevel::ALL {
                for fg in PaletteIndex::all() {
                    for bg in PaletteIndex::all() {
                        let distance = shade_distance(pixel, palette.blend(fg, bg, level));
                        if !(level.is_partial() && distance > PRUNE_THRESHOLD) {
                            assert!(best_distance <= distance);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn cache_does_not_change_results() {
        let mut warm = ShadeQuantizer::new();
        for &pixel in &test_data_1024() {
            let first = warm.quantize(pixel);
            let second = warm.quantize(pixel);
            let cold = ShadeQuantizer::new().quantize(pixel);
            assert_eq!(first, second);
            assert_eq!(first, cold);
            assert_eq!(first, warm.quantize_uncached(pixel));
        }
    }

    #[test]
    fn cache_grows_once_per_color() {
        let mut quantizer = ShadeQuantizer::new();
        assert_eq!(quantizer.cached_colors(), 0);

        quantizer.quantize(Srgb::new(1, 2, 3));
        quantizer.quantize(Srgb::new(1, 2, 3));
        quantizer.quantize(Srgb::new(3, 2, 1));
        assert_eq!(quantizer.cached_colors(), 2);

        let _ = quantizer.quantize_uncached(Srgb::new(9, 9, 9));
        assert_eq!(quantizer.cached_colors(), 2);
    }

    #[test]
    fn cache_keys_are_distinct() {
        let mut keys = test_data_1024()
            .iter()
            .map(|&c| (cache_key(c), c.into_components()))
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys.dedup();
        for pair in keys.windows(2) {
            assert!(pair[0].0 != pair[1].0 || pair[0].1 == pair[1].1);
        }
    }

    #[test]
    fn quantize_pixels_in_order() {
        let colors = test_data_256();
        let pixels = ColorSlice::try_from(colors.as_slice()).unwrap();
        let mut quantizer = ShadeQuantizer::new();
        let matches = quantizer.quantize_pixels(pixels);
        assert_eq!(matches.len(), colors.len());
        for (&pixel, &shade_match) in colors.iter().zip(&matches) {
            assert_eq!(quantizer.quantize_uncached(pixel), shade_match);
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn parallel_matches_sequential() {
        let mut colors = test_data_1024();
        colors.extend_from_within(..512);
        let pixels = ColorSlice::try_from(colors.as_slice()).unwrap();

        let sequential = ShadeQuantizer::new().quantize_pixels(pixels);

        let mut quantizer = ShadeQuantizer::new();
        quantizer.quantize(colors[0]);
        let parallel = quantizer.quantize_pixels_par(pixels);

        assert_eq!(sequential, parallel);
        assert_eq!(quantizer.quantize_pixels_par(pixels), sequential);
    }

    #[test]
    #[cfg(feature = "threads")]
    fn parallel_caches_every_distinct_color() {
        let mut colors = test_data_256();
        colors.extend_from_within(..128);
        let pixels = ColorSlice::try_from(colors.as_slice()).unwrap();

        let mut quantizer = ShadeQuantizer::new();
        let matches = quantizer.quantize_pixels_par(pixels);
        assert_eq!(matches.len(), colors.len());

        let mut keys = colors.iter().map(|&c| cache_key(c)).collect::<Vec<_>>();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(quantizer.cached_colors(), keys.len());

        for (&pixel, &cell) in colors.iter().zip(&matches) {
            assert_eq!(quantizer.quantize(pixel), cell);
        }
        assert_eq!(quantizer.cached_colors(), keys.len());
    }

    #[test]
    #[cfg(feature = "threads")]
    fn unpack_key_inverts_cache_key() {
        for &color in &test_data_256() {
            assert_eq!(unpack_key(cache_key(color)), color);
        }
    }

    #[test]
    fn distance() {
        assert_eq!(shade_distance(Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)), 195_075);
        assert_eq!(shade_distance(Srgb::new(10, 20, 30), Srgb::new(13, 16, 30)), 25);
        assert_eq!(shade_distance(Srgb::new(7, 7, 7), Srgb::new(7, 7, 7)), 0);
    }
}

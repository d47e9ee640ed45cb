//! A library to extract a small palette of representative colors from an image.
//!
//! Pixels are sampled into a fixed 64×64 working buffer, quantized into
//! coarse color buckets, ranked by frequency and greedily filtered so every
//! selected color stays visually distinct from the others. The contract is
//! total: extraction never fails from the caller's point of view, every
//! failure class resolves to a fixed dark [`FALLBACK_PALETTE`].
//!
//! ```no_run
//! use huepick::{DecodedSource, PaletteExtractor};
//!
//! let img = image::open("cover.jpg").unwrap().to_rgba8();
//! let palette = PaletteExtractor::from_source(DecodedSource::new("cover.jpg", img))
//!     .max_colors(4)
//!     .extract();
//!
//! assert_eq!(palette.len(), 4);
//! ```

mod error;
mod quantizer;
mod source;
mod swatch;

/// Number of colors extracted when the caller does not ask for a specific
/// count.
pub const DEFAULT_MAX_COLORS: usize = 4;

/// Side length of the square working buffer every image is sampled into.
/// Palette extraction does not need source resolution, only the statistical
/// color distribution, so processing cost stays bounded regardless of the
/// original image size.
pub const SAMPLE_DIM: u32 = 64;

/// The fixed dark palette returned whenever extraction cannot proceed. When
/// the requested color count differs from its length it is truncated, or
/// padded with [`PAD_COLOR`], to match.
pub const FALLBACK_PALETTE: [&str; 4] = ["#1a1a2e", "#16213e", "#0f3460", "#533483"];

/// Dark gray used to pad a palette that has fewer distinct colors than
/// requested.
pub const PAD_COLOR: (u16, u16, u16) = (20, 20, 20);

pub use crate::{
    error::SampleFault,
    source::{DecodedSource, DeferredSource, ImageSource, LoadHandle, LoadState},
    swatch::Swatch,
};
pub use image;

use crate::{error::ExtractError, quantizer::BucketQuantizer};

/// Builder-style entry point for palette extraction.
pub struct PaletteExtractor<S> {
    source: S,
    max_colors: usize,
}

impl<S> PaletteExtractor<S>
where
    S: ImageSource,
{
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            max_colors: DEFAULT_MAX_COLORS,
        }
    }

    /// Number of colors to extract. A count of zero yields an empty palette,
    /// keeping the result length equal to the requested count in every case.
    pub fn max_colors(self, max_colors: usize) -> Self {
        Self { max_colors, ..self }
    }

    /// Extract the palette, blocking on the source's one-shot load signal if
    /// it is still pending.
    ///
    /// Always returns exactly `max_colors` strings matching `#rrggbb`. A
    /// missing locator, a failed load, a sampling fault or any other
    /// processing failure resolves to the [`FALLBACK_PALETTE`] sized to
    /// `max_colors`; callers never need failure handling of their own.
    pub fn extract(self) -> Vec<String> {
        let max_colors = self.max_colors;

        match try_extract(&self.source, max_colors) {
            Ok(palette) => palette,
            Err(err) => {
                match &err {
                    // a source with nothing to load from is an expected input,
                    // not a diagnostic event
                    ExtractError::MissingSource => {}
                    ExtractError::LoadFailed | ExtractError::Sample(_) => {
                        log::warn!("palette extraction failed ({err}), using fallback palette");
                    }
                }

                fallback_palette(max_colors)
            }
        }
    }

    /// Run extraction on a background thread and deliver the palette through
    /// a one-shot channel. The receiver yields exactly one palette and never
    /// an error, same contract as [`PaletteExtractor::extract`].
    pub fn extract_deferred(self) -> flume::Receiver<Vec<String>>
    where
        S: Send + 'static,
    {
        let (tx, rx) = flume::bounded(1);

        std::thread::spawn(move || {
            let _ = tx.send(self.extract());
        });

        rx
    }
}

/// The [`FALLBACK_PALETTE`] truncated, or padded with [`PAD_COLOR`], to
/// exactly `max_colors` entries.
pub fn fallback_palette(max_colors: usize) -> Vec<String> {
    let mut palette = FALLBACK_PALETTE
        .iter()
        .take(max_colors)
        .map(|color| (*color).to_string())
        .collect::<Vec<_>>();

    while palette.len() < max_colors {
        palette.push(Swatch::new(PAD_COLOR, 0).to_hex());
    }

    palette
}

fn try_extract<S>(source: &S, max_colors: usize) -> Result<Vec<String>, ExtractError>
where
    S: ImageSource,
{
    if source.locator().map_or(true, str::is_empty) {
        return Err(ExtractError::MissingSource);
    }

    let state = match source.load_state() {
        LoadState::Pending => source.wait_loaded(),
        state => state,
    };

    if state != LoadState::Loaded {
        return Err(ExtractError::LoadFailed);
    }

    let sampled = source.sample(SAMPLE_DIM, SAMPLE_DIM)?;
    let pixels = sampled.pixels().map(|pixel| pixel.0).collect();

    let swatches = BucketQuantizer::new(pixels, max_colors).get_palette_colors();
    Ok(swatches.into_iter().map(Swatch::to_hex).collect())
}

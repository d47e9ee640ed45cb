use crate::swatch::Swatch;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Each channel is rounded to the nearest multiple of this step to form a
/// bucket key.
const QUANTIZE_STEP: u16 = 24;

/// Minimum Manhattan RGB distance between any two selected palette colors.
const DISTINCTNESS_MIN: u16 = 60;

/// Pixels with alpha below this are treated as non-contributing background.
const ALPHA_MIN: u8 = 128;

/// Quantizes sampled pixels into coarse color buckets, ranks the buckets by
/// frequency and greedily picks mutually distinct colors, padding with
/// [`crate::PAD_COLOR`] when the image does not yield enough of them.
pub(crate) struct BucketQuantizer {
    pixels: Vec<[u8; 4]>,
    max_colors: usize,
}

impl BucketQuantizer {
    pub fn new(pixels: Vec<[u8; 4]>, max_colors: usize) -> Self {
        Self { pixels, max_colors }
    }

    /// Always returns exactly `max_colors` swatches.
    pub fn get_palette_colors(self) -> Vec<Swatch> {
        // histogram of quantized opaque-enough pixels
        let mut hist = HashMap::new();
        for [r, g, b, a] in self.pixels.iter().copied() {
            if a < ALPHA_MIN {
                continue;
            }

            let key = (quantize(r), quantize(g), quantize(b));
            *hist.entry(key).or_insert(0u32) += 1;
        }

        // most frequent bucket first; equally-frequent buckets are ordered by
        // their packed channel key so the result is deterministic
        let mut candidates = hist
            .into_iter()
            .map(|(rgb, count)| Swatch::new(rgb, count))
            .collect::<Vec<_>>();
        candidates.sort_by_key(|swatch| (Reverse(swatch.population()), swatch.packed_key()));

        let mut selected: Vec<Swatch> = Vec::with_capacity(self.max_colors);
        for candidate in candidates {
            if selected.len() >= self.max_colors {
                break;
            }

            if selected
                .iter()
                .all(|swatch| swatch.distance(candidate) >= DISTINCTNESS_MIN)
            {
                selected.push(candidate);
            }
        }

        while selected.len() < self.max_colors {
            selected.push(Swatch::new(crate::PAD_COLOR, 0));
        }

        selected
    }
}

fn quantize(channel: u8) -> u16 {
    ((f32::from(channel) / f32::from(QUANTIZE_STEP)).round() as u16) * QUANTIZE_STEP
}

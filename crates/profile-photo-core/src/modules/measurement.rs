//! Pixel-level measurements.
//!
//! Resolution, sharpness (edge-response variance), lighting, color balance and
//! noise (difference from a median-filtered copy). Every function here is a
//! pure function of the pixels.

use std::sync::Arc;

use image::GrayImage;
use tracing::warn;

use crate::domain::{
    ChannelAccumulator, ImageDimensions, PixelStatistics, QualityMetrics, RawImage, Score,
};
use crate::error::MeasurementError;
use crate::ports::{ConvolutionFilter, EdgeMap, ImageprocFilter};

/// Color balance assigned to images without three color channels.
pub const SINGLE_CHANNEL_COLOR_BALANCE: f64 = 70.0;

/// Configuration for the pixel metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementConfig {
    /// Short side (pixels) that earns a full resolution score.
    pub reference_short_side: u32,
    /// Edge-response variance that earns a full sharpness score.
    pub sharpness_full_scale: f64,
    /// Ideal mean brightness (0-255).
    pub brightness_target: f64,
    /// Points deducted per brightness level away from the target.
    pub brightness_penalty: f64,
    /// Luminance standard deviation that earns a full contrast score.
    pub min_contrast: f64,
    /// Points deducted per level of mean pairwise channel difference.
    pub color_imbalance_penalty: f64,
    /// Mean median-filter difference at or below which an image is clean.
    pub noise_clean_level: f64,
    /// Mean median-filter difference at or above which noise scores 0.
    pub noise_max_level: f64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            reference_short_side: 1080,
            sharpness_full_scale: 1000.0,
            brightness_target: 125.0,
            brightness_penalty: 0.8,
            min_contrast: 50.0,
            color_imbalance_penalty: 1.0,
            noise_clean_level: 2.0,
            noise_max_level: 10.0,
        }
    }
}

/// Everything the extractor derives from one image.
#[derive(Debug, Clone)]
pub struct Measurements {
    /// Channel and luminance statistics.
    pub stats: PixelStatistics,
    /// Greyscale copy used by the geometry metrics.
    pub luma: GrayImage,
    /// Edge response, if the filter succeeded.
    pub edges: Option<EdgeMap>,
    /// The five quality metrics.
    pub quality: QualityMetrics,
    /// Filters that failed; their metrics hold neutral fallbacks.
    pub errors: Vec<MeasurementError>,
}

/// Extracts pixel statistics and quality metrics.
#[derive(Clone)]
pub struct ImageMeasurementExtractor {
    config: MeasurementConfig,
    filter: Arc<dyn ConvolutionFilter>,
}

impl std::fmt::Debug for ImageMeasurementExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageMeasurementExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ImageMeasurementExtractor {
    fn default() -> Self {
        Self::new(MeasurementConfig::default(), Arc::new(ImageprocFilter))
    }
}

impl ImageMeasurementExtractor {
    /// Creates an extractor with the given configuration and filter backend.
    #[must_use]
    pub fn new(config: MeasurementConfig, filter: Arc<dyn ConvolutionFilter>) -> Self {
        Self { config, filter }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    /// Runs every measurement on a decoded image.
    ///
    /// A failing filter only affects its own metric, which falls back to the
    /// neutral score.
    #[must_use]
    pub fn extract(&self, image: &RawImage) -> Measurements {
        let stats = measure(image);
        let luma = image.to_luma8();
        let mut errors = Vec::new();

        let edges = match self.filter.edge_response(&luma) {
            Ok(edges) => Some(edges),
            Err(e) => {
                warn!("{e}; using neutral sharpness");
                errors.push(e);
                None
            }
        };

        let sharpness_score = edges
            .as_ref()
            .map_or_else(Score::neutral, |e| sharpness(e, &self.config));

        let noise_score = match self.filter.median(&luma, 1) {
            Ok(filtered) => noise(&luma, &filtered, &self.config),
            Err(e) => {
                warn!("{e}; using neutral noise score");
                errors.push(e);
                Score::neutral()
            }
        };

        let quality = QualityMetrics {
            resolution_score: resolution(image.dimensions(), &self.config),
            sharpness_score,
            lighting_score: lighting(&stats, &self.config),
            color_balance_score: color_balance(&stats, &self.config),
            noise_score,
        };

        Measurements {
            stats,
            luma,
            edges,
            quality,
            errors,
        }
    }
}

/// Computes per-channel and luminance statistics.
#[must_use]
pub fn measure(image: &RawImage) -> PixelStatistics {
    let luma = luma_stats(&image.to_luma8());

    let channels = if image.channels() >= 3 {
        let rgb = image.image().to_rgb8();
        let mut acc = [ChannelAccumulator::default(); 3];
        for pixel in rgb.pixels() {
            for (slot, &value) in acc.iter_mut().zip(pixel.0.iter()) {
                slot.push(value);
            }
        }
        acc.into_iter().map(ChannelAccumulator::finish).collect()
    } else {
        vec![luma]
    };

    PixelStatistics {
        channels,
        brightness: luma.mean,
        contrast: luma.std_dev,
        aspect_ratio: image.dimensions().aspect_ratio(),
    }
}

fn luma_stats(luma: &GrayImage) -> crate::domain::ChannelStats {
    let mut acc = ChannelAccumulator::default();
    for pixel in luma.pixels() {
        acc.push(pixel.0[0]);
    }
    acc.finish()
}

/// Scores the short side against the reference resolution.
#[must_use]
pub fn resolution(dims: ImageDimensions, config: &MeasurementConfig) -> Score {
    let short_side = f64::from(dims.width.min(dims.height));
    let reference = f64::from(config.reference_short_side.max(1));
    Score::measured(short_side / reference * 100.0)
}

/// Maps edge-response variance linearly onto `0..=100`.
#[must_use]
pub fn sharpness(edges: &EdgeMap, config: &MeasurementConfig) -> Score {
    let n = edges.pixels().len();
    if n == 0 {
        return Score::neutral();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;

    let (sum, sum_sq) = edges.pixels().fold((0.0, 0.0), |(s, sq), p| {
        let v = f64::from(p.0[0]);
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);

    Score::measured(variance / config.sharpness_full_scale * 100.0)
}

/// Averages brightness closeness to the target and contrast sufficiency.
#[must_use]
pub fn lighting(stats: &PixelStatistics, config: &MeasurementConfig) -> Score {
    let deviation = (stats.brightness - config.brightness_target).abs();
    let brightness_score = (100.0 - deviation * config.brightness_penalty).clamp(0.0, 100.0);

    let contrast_score = if config.min_contrast > 0.0 {
        (stats.contrast / config.min_contrast * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    Score::measured((brightness_score + contrast_score) / 2.0)
}

/// Penalizes disagreement between the R, G and B channel means.
///
/// Images without three color channels get a fixed fallback of 70.
#[must_use]
pub fn color_balance(stats: &PixelStatistics, config: &MeasurementConfig) -> Score {
    let Some([r, g, b]) = stats.rgb_means() else {
        return Score::fallback(SINGLE_CHANNEL_COLOR_BALANCE);
    };

    let mean_diff = ((r - g).abs() + (g - b).abs() + (r - b).abs()) / 3.0;
    Score::measured(100.0 - mean_diff * config.color_imbalance_penalty)
}

/// Maps the mean absolute difference from a median-filtered copy onto a score.
#[must_use]
pub fn noise(original: &GrayImage, filtered: &GrayImage, config: &MeasurementConfig) -> Score {
    let n = original.pixels().len();
    if n == 0 || original.dimensions() != filtered.dimensions() {
        return Score::neutral();
    }

    let total: f64 = original
        .pixels()
        .zip(filtered.pixels())
        .map(|(a, b)| (f64::from(a.0[0]) - f64::from(b.0[0])).abs())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean_diff = total / n as f64;

    let clean = config.noise_clean_level;
    let max = config.noise_max_level.max(clean + f64::EPSILON);
    let score = if mean_diff <= clean {
        100.0
    } else if mean_diff >= max {
        0.0
    } else {
        100.0 * (1.0 - (mean_diff - clean) / (max - clean))
    };
    Score::measured(score)
}

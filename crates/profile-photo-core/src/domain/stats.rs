//! Pixel statistics.

use serde::{Deserialize, Serialize};

/// Statistics for one color channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Mean value (0-255).
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: u8,
    /// Largest value.
    pub max: u8,
}

/// Pixel-level statistics of a decoded image.
///
/// A pure function of the image pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelStatistics {
    /// Per-channel statistics: one entry for greyscale, three (R, G, B) for color.
    pub channels: Vec<ChannelStats>,
    /// Mean greyscale luminance (0-255).
    pub brightness: f64,
    /// Standard deviation of greyscale luminance.
    pub contrast: f64,
    /// Width divided by height.
    pub aspect_ratio: f64,
}

impl PixelStatistics {
    /// Returns true when the statistics carry separate R, G and B channels.
    #[must_use]
    pub fn is_color(&self) -> bool {
        self.channels.len() >= 3
    }

    /// Mean of each color channel, if the image is color.
    #[must_use]
    pub fn rgb_means(&self) -> Option<[f64; 3]> {
        match self.channels.as_slice() {
            [r, g, b, ..] => Some([r.mean, g.mean, b.mean]),
            _ => None,
        }
    }
}

/// Accumulates mean, standard deviation and range over `u8` samples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChannelAccumulator {
    count: u64,
    sum: f64,
    sum_sq: f64,
    min: u8,
    max: u8,
}

impl Default for ChannelAccumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: u8::MAX,
            max: u8::MIN,
        }
    }
}

impl ChannelAccumulator {
    pub(crate) fn push(&mut self, value: u8) {
        let v = f64::from(value);
        self.count += 1;
        self.sum += v;
        self.sum_sq += v * v;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn finish(self) -> ChannelStats {
        if self.count == 0 {
            return ChannelStats {
                mean: 0.0,
                std_dev: 0.0,
                min: 0,
                max: 0,
            };
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        ChannelStats {
            mean,
            std_dev: variance.sqrt(),
            min: self.min,
            max: self.max,
        }
    }
}

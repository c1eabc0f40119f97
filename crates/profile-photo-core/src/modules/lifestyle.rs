//! Best-effort context tags. Never scored.

use crate::domain::{DetectedFace, ImageDimensions, LifestyleTag, PixelStatistics};

use super::geometry::primary_face;

/// Thresholds for lifestyle tagging.
#[derive(Debug, Clone, PartialEq)]
pub struct LifestyleConfig {
    /// Aspect ratios within `1 ± square_tolerance` count as square.
    pub square_tolerance: f64,
    /// Mean brightness below which a scene is low light.
    pub low_light_below: f64,
    /// Mean brightness above which a scene is bright daylight.
    pub daylight_above: f64,
    /// Red-minus-blue mean difference that marks a tonal cast.
    pub tone_shift: f64,
    /// Primary face size ratio above which a photo is a close-up.
    pub close_up_ratio: f64,
}

impl Default for LifestyleConfig {
    fn default() -> Self {
        Self {
            square_tolerance: 0.1,
            low_light_below: 70.0,
            daylight_above: 170.0,
            tone_shift: 15.0,
            close_up_ratio: 0.30,
        }
    }
}

/// Tags photos with cheap metadata derived from statistics and faces.
#[derive(Debug, Clone, Default)]
pub struct LifestyleContextClassifier {
    config: LifestyleConfig,
}

impl LifestyleContextClassifier {
    /// Creates a classifier with the given thresholds.
    #[must_use]
    pub const fn new(config: LifestyleConfig) -> Self {
        Self { config }
    }

    /// Returns the tags that apply, sorted and without duplicates.
    #[must_use]
    pub fn classify(
        &self,
        stats: &PixelStatistics,
        dims: ImageDimensions,
        faces: &[DetectedFace],
    ) -> Vec<LifestyleTag> {
        let c = &self.config;
        let mut tags = Vec::new();

        let aspect = dims.aspect_ratio();
        if (aspect - 1.0).abs() <= c.square_tolerance {
            tags.push(LifestyleTag::Square);
        } else if aspect > 1.0 {
            tags.push(LifestyleTag::Landscape);
        } else {
            tags.push(LifestyleTag::Portrait);
        }

        if stats.brightness < c.low_light_below {
            tags.push(LifestyleTag::LowLight);
        } else if stats.brightness > c.daylight_above {
            tags.push(LifestyleTag::BrightDaylight);
        }

        if let Some([r, _, b]) = stats.rgb_means() {
            if r - b > c.tone_shift {
                tags.push(LifestyleTag::WarmTones);
            } else if b - r > c.tone_shift {
                tags.push(LifestyleTag::CoolTones);
            }
        }

        match faces.len() {
            0 => {}
            1 => tags.push(LifestyleTag::SoloPortrait),
            _ => tags.push(LifestyleTag::GroupPhoto),
        }

        if primary_face(faces).is_some_and(|f| f.size_ratio(dims) > c.close_up_ratio) {
            tags.push(LifestyleTag::CloseUp);
        }

        tags.sort_unstable();
        tags.dedup();
        tags
    }
}

//! Configuration file support for profile-photo.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/profile-photo/config.toml` (lowest priority)
//! - Project-local: `.profile-photo.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use profile_photo_core::modules::{AttractivenessWeights, ScoringConfig};
use profile_photo_core::ConfigError;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
const PROJECT_CONFIG_NAME: &str = ".profile-photo.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Face sidecar settings.
    pub faces: FacesConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
    /// Attractiveness weight overrides.
    pub weights: WeightsConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Face sidecar configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FacesConfig {
    /// Suffix appended to a photo path to find its detections.
    pub sidecar_suffix: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

/// Attractiveness weight overrides. Unset weights keep their default.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    /// Weight of landmark symmetry.
    pub face_symmetry: Option<f64>,
    /// Weight of face confidence and size.
    pub facial_features: Option<f64>,
    /// Weight of lighting.
    pub lighting_quality: Option<f64>,
    /// Weight of the mean composition score.
    pub composition: Option<f64>,
    /// Weight of the background proxy.
    pub background_quality: Option<f64>,
    /// Weight of sharpness.
    pub image_sharpness: Option<f64>,
    /// Weight of color balance.
    pub color_balance: Option<f64>,
}

impl WeightsConfig {
    /// Applies the overrides on top of the default table.
    #[must_use]
    pub fn resolve(&self) -> AttractivenessWeights {
        let d = AttractivenessWeights::default();
        AttractivenessWeights {
            face_symmetry: self.face_symmetry.unwrap_or(d.face_symmetry),
            facial_features: self.facial_features.unwrap_or(d.facial_features),
            lighting_quality: self.lighting_quality.unwrap_or(d.lighting_quality),
            composition: self.composition.unwrap_or(d.composition),
            background_quality: self.background_quality.unwrap_or(d.background_quality),
            image_sharpness: self.image_sharpness.unwrap_or(d.image_sharpness),
            color_balance: self.color_balance.unwrap_or(d.color_balance),
        }
    }

    const fn is_empty(&self) -> bool {
        self.face_symmetry.is_none()
            && self.facial_features.is_none()
            && self.lighting_quality.is_none()
            && self.composition.is_none()
            && self.background_quality.is_none()
            && self.image_sharpness.is_none()
            && self.color_balance.is_none()
    }

    fn merge(&mut self, other: Self) {
        self.face_symmetry = other.face_symmetry.or(self.face_symmetry);
        self.facial_features = other.facial_features.or(self.facial_features);
        self.lighting_quality = other.lighting_quality.or(self.lighting_quality);
        self.composition = other.composition.or(self.composition);
        self.background_quality = other.background_quality.or(self.background_quality);
        self.image_sharpness = other.image_sharpness.or(self.image_sharpness);
        self.color_balance = other.color_balance.or(self.color_balance);
    }
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/profile-photo/config.toml`
    /// 2. Project-local: `.profile-photo.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            warn!("{e}");
        }

        config
    }

    /// Builds the scoring configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the merged weight table is invalid.
    pub fn scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        let config = ScoringConfig {
            attractiveness: self.weights.resolve(),
            ..ScoringConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Scoring configuration, or the defaults with a warning when the
    /// configured weights are invalid.
    pub fn scoring_config_or_default(&self) -> ScoringConfig {
        if self.weights.is_empty() {
            return ScoringConfig::default();
        }
        self.scoring_config().unwrap_or_else(|e| {
            warn!("Ignoring [weights]: {e}; using default weights");
            ScoringConfig::default()
        })
    }

    /// Validate values that can be checked without building the engine.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        if let Some(ref s) = self.faces.sidecar_suffix {
            if s.is_empty() {
                return Err("faces.sidecar_suffix must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.faces.sidecar_suffix = other
            .faces
            .sidecar_suffix
            .or_else(|| self.faces.sidecar_suffix.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);

        self.weights.merge(other.weights);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("profile-photo").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.profile-photo.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.general.recursive.is_none());
        assert!(config.weights.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[general]
recursive = true

[faces]
sidecar_suffix = '.detections.json'

[output]
format = 'json'
pretty = true
progress = false

[weights]
face_symmetry = 0.30
color_balance = 0.0
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(
            config.faces.sidecar_suffix.as_deref(),
            Some(".detections.json")
        );
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.pretty, Some(true));
        assert_eq!(config.output.progress, Some(false));
        assert_eq!(config.weights.face_symmetry, Some(0.30));
        assert!(config.weights.lighting_quality.is_none());
    }

    #[test]
    fn test_merge_preserves_base_when_override_is_none() {
        let mut base: AppConfig = toml::from_str(
            r"
[output]
format = 'json'
pretty = true

[weights]
face_symmetry = 0.2
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[output]
format = 'jsonl'

[weights]
facial_features = 0.25
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.output.format, Some("jsonl".to_string()));
        assert_eq!(base.output.pretty, Some(true));
        assert_eq!(base.weights.face_symmetry, Some(0.2));
        assert_eq!(base.weights.facial_features, Some(0.25));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[faces]
sidecar_suffix = '.json'
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.faces.sidecar_suffix.as_deref(), Some(".json"));
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[weights]
face_symmetry = "heavy"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_default_weights_resolve_to_default_table() {
        let config = AppConfig::default();
        assert_eq!(config.weights.resolve(), AttractivenessWeights::default());
        assert_eq!(config.scoring_config_or_default(), ScoringConfig::default());
    }

    #[test]
    fn test_balanced_override_is_accepted() {
        let config: AppConfig = toml::from_str(
            r"
[weights]
face_symmetry = 0.20
facial_features = 0.25
",
        )
        .expect("parse weights");

        let scoring = config.scoring_config().expect("weights still sum to one");
        assert!((scoring.attractiveness.face_symmetry - 0.20).abs() < f64::EPSILON);
        assert!((scoring.attractiveness.facial_features - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unbalanced_override_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r"
[weights]
face_symmetry = 0.9
",
        )
        .expect("parse weights");

        assert!(matches!(
            config.scoring_config(),
            Err(ConfigError::WeightSum { .. })
        ));
        assert_eq!(config.scoring_config_or_default(), ScoringConfig::default());
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());

        let result = config.validate();
        assert!(result.unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_validate_empty_suffix() {
        let mut config = AppConfig::default();
        config.faces.sidecar_suffix = Some(String::new());
        assert!(config.validate().unwrap_err().contains("sidecar_suffix"));
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_NAME), "").unwrap();

        let found = find_config_in_parents(&nested).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_CONFIG_NAME));
    }
}

//! JSON sidecar files holding face detections.
//!
//! The external face provider writes `<photo>.faces.json` next to each photo:
//! a JSON array of detections with `confidence`, `bbox`, and optional
//! `landmarks`, `expressions`, `age` and `gender`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use profile_photo_core::domain::DetectedFace;
use tracing::debug;

/// Default suffix appended to the photo file name.
pub const DEFAULT_SIDECAR_SUFFIX: &str = ".faces.json";

/// Reads face detections from sidecar files.
#[derive(Debug, Clone)]
pub struct SidecarFaceLoader {
    suffix: String,
}

impl Default for SidecarFaceLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SIDECAR_SUFFIX)
    }
}

impl SidecarFaceLoader {
    /// Creates a loader for the given file-name suffix.
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Path of the sidecar belonging to `photo`.
    #[must_use]
    pub fn sidecar_path(&self, photo: &Path) -> PathBuf {
        let mut name = photo.as_os_str().to_owned();
        name.push(&self.suffix);
        PathBuf::from(name)
    }

    /// Loads the detections for `photo`.
    ///
    /// Returns `Ok(None)` when no sidecar exists. An empty array means the
    /// provider ran and found no faces.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but cannot be read or parsed.
    pub fn load(&self, photo: &Path) -> Result<Option<Vec<DetectedFace>>> {
        let path = self.sidecar_path(photo);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read face sidecar: {}", path.display()))?;
        let faces: Vec<DetectedFace> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse face sidecar: {}", path.display()))?;

        debug!("Loaded {} face(s) from {}", faces.len(), path.display());
        Ok(Some(faces))
    }
}

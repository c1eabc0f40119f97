//! Filesystem adapter for reading photos.
//!
//! Files are read as raw bytes and never decoded here, so a corrupt file
//! reaches the analyzer and becomes a failed batch entry.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use profile_photo_core::domain::{PhotoMetadata, PhotoUpload};
use profile_photo_core::ports::PhotoSource;
use tracing::{debug, warn};

use crate::sidecar::SidecarFaceLoader;

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Filesystem photo source adapter.
pub struct FsPhotoSource {
    paths: Vec<PathBuf>,
    recursive: bool,
    sidecars: Option<SidecarFaceLoader>,
}

impl FsPhotoSource {
    /// Creates a new filesystem photo source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            paths,
            recursive,
            sidecars: None,
        }
    }

    /// Attaches face detections from sidecar files to each photo.
    #[must_use]
    pub fn with_sidecars(mut self, loader: SidecarFaceLoader) -> Self {
        self.sidecars = Some(loader);
        self
    }

    /// Collects all image files from the configured paths, sorted per directory.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }

    fn load_photo(&self, path: &Path) -> Result<PhotoUpload> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read photo: {}", path.display()))?;

        let faces = self.sidecars.as_ref().and_then(|loader| {
            loader.load(path).unwrap_or_else(|e| {
                warn!("{e:#}; falling back to face detector");
                None
            })
        });

        Ok(PhotoUpload::new(path.to_string_lossy(), bytes).with_metadata(PhotoMetadata { faces }))
    }
}

impl PhotoSource for FsPhotoSource {
    fn photos(&self) -> Box<dyn Iterator<Item = Result<PhotoUpload>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} image files", files.len());

        Box::new(files.into_iter().map(|path| self.load_photo(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

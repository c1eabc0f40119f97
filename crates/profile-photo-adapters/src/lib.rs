//! Profile Photo Adapters - External adapters for profile-photo.
//!
//! This crate provides adapters for:
//! - Filesystem photo source
//! - Face detections from JSON sidecar files

pub mod fs;
pub mod sidecar;

pub use fs::FsPhotoSource;
pub use sidecar::{SidecarFaceLoader, DEFAULT_SIDECAR_SUFFIX};

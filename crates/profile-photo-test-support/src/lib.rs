//! Test support utilities for profile-photo.
//!
//! Provides mocks, synthetic image builders, and landmark/face fixtures for
//! testing the scoring pipeline without binary fixtures on disk.
//!
//! # Example
//!
//! ```
//! use profile_photo_core::domain::PhotoUpload;
//! use profile_photo_test_support::{MockPhotoSource, SyntheticImageBuilder};
//!
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128);
//! let upload = PhotoUpload::new("sharp", SyntheticImageBuilder::png(&sharp));
//!
//! let source = MockPhotoSource::new(vec![upload]);
//! ```

mod builders;
mod mocks;

pub use builders::{FaceBuilder, LandmarkBuilder, SyntheticImageBuilder};
pub use mocks::{
    FailingFilter, MockFaceDetector, MockPhotoSource, MockProgressSink, MockResultOutput,
};

//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the scoring core and its
//! external collaborators. Default implementations live next to each trait.

mod convolution;
mod face_detector;
mod image_decoder;
mod photo_source;
mod progress;
mod result_output;

pub use convolution::{ConvolutionFilter, EdgeMap, ImageprocFilter};
pub use face_detector::{FaceDetector, UnavailableFaceDetector};
pub use image_decoder::{ImageCrateDecoder, ImageDecoder};
pub use photo_source::PhotoSource;
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;

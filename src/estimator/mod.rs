pub mod blazepose;

use anyhow::Result;
use image::DynamicImage;

pub use blazepose::BlazePose;

/// A single landmark as produced by the pose model, with x/y expressed as
/// fractions of image width/height. Values can stray slightly outside [0, 1]
/// when a joint sits at the image border; consumers clamp before scaling.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }
}

/// Seam for the external pose-estimation collaborator.
///
/// `estimate` returns `Ok(None)` when no person is detected in the frame.
/// On detection the landmark list follows the MediaPipe pose topology and
/// contains at least the 15 upper-body entries.
pub trait PoseEstimator {
    fn estimate(&mut self, image: &DynamicImage) -> Result<Option<Vec<NormalizedLandmark>>>;
}

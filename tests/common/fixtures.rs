use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Rgb};
use posemark::estimator::{NormalizedLandmark, PoseEstimator};

/// Creates a flat grey test frame at `dir/name` and returns its path.
pub fn write_test_frame(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([40u8, 40u8, 40u8]));
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("failed to save test frame");
    path
}

/// A full 33-landmark skeleton with points spread along the diagonal,
/// all inside the frame.
pub fn full_skeleton() -> Vec<NormalizedLandmark> {
    (0..33)
        .map(|i| NormalizedLandmark::new(i as f32 / 40.0, i as f32 / 40.0))
        .collect()
}

/// Pose estimator stand-in for tests. Replays scripted responses in order;
/// once the script is exhausted every frame gets a full skeleton.
pub struct StubPose {
    scripted: VecDeque<Option<Vec<NormalizedLandmark>>>,
}

impl StubPose {
    /// Reports a detection with a full skeleton for every frame
    pub fn detecting() -> Self {
        Self {
            scripted: VecDeque::new(),
        }
    }

    /// Replays `responses` for the first frames, in call order
    pub fn scripted(responses: Vec<Option<Vec<NormalizedLandmark>>>) -> Self {
        Self {
            scripted: responses.into(),
        }
    }
}

impl PoseEstimator for StubPose {
    fn estimate(
        &mut self,
        _image: &DynamicImage,
    ) -> anyhow::Result<Option<Vec<NormalizedLandmark>>> {
        Ok(match self.scripted.pop_front() {
            Some(response) => response,
            None => Some(full_skeleton()),
        })
    }
}

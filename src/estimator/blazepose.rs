use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;

use super::{NormalizedLandmark, PoseEstimator};

/// Side length of the square model input
const INPUT_SIZE: u32 = 256;

/// Values per landmark row in the model output: x, y, z, visibility, presence
const ROW_LEN: usize = 5;

/// Mean landmark presence below which we treat the frame as "no person"
const PRESENCE_THRESHOLD: f32 = 0.5;

/// Single-person pose landmark model backed by rten.
///
/// The model takes a letterboxed 256x256 RGB float input and produces one row
/// of (x, y, z, visibility, presence) per landmark, with x/y in input pixels.
pub struct BlazePose {
    model: Model,
}

impl BlazePose {
    /// Load the landmark model from the standard cache location
    /// (`~/.cache/posemark/pose-landmark.rten`).
    pub fn from_cache_dir() -> Result<Self> {
        let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        let model_path = Path::new(&home_dir)
            .join(".cache/posemark")
            .join("pose-landmark.rten");

        if !model_path.exists() {
            anyhow::bail!(
                "Pose landmark model not found. Convert a BlazePose ONNX export with \
                 rten-convert and place it at:\n  - {}",
                model_path.display()
            );
        }

        Self::from_file(&model_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let model = Model::load_file(path)
            .with_context(|| format!("failed to load pose model from {}", path.display()))?;
        Ok(Self { model })
    }

    /// Letterbox the image into a square float tensor in NCHW layout with
    /// values in [0, 1]. Returns the tensor plus the scale and padding needed
    /// to map model coordinates back to the source image.
    fn prepare_input(&self, image: &DynamicImage) -> (NdTensor<f32, 4>, f32, f32, f32) {
        let (width, height) = (image.width(), image.height());
        let scale = INPUT_SIZE as f32 / width.max(height) as f32;
        let scaled_w = ((width as f32 * scale) as u32).clamp(1, INPUT_SIZE);
        let scaled_h = ((height as f32 * scale) as u32).clamp(1, INPUT_SIZE);
        let pad_x = (INPUT_SIZE - scaled_w) as f32 / 2.0;
        let pad_y = (INPUT_SIZE - scaled_h) as f32 / 2.0;

        let resized = image::imageops::resize(
            &image.to_rgb8(),
            scaled_w,
            scaled_h,
            image::imageops::FilterType::Triangle,
        );

        let mut input = NdTensor::zeros([1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize]);
        for (x, y, pixel) in resized.enumerate_pixels() {
            let tx = x as usize + pad_x as usize;
            let ty = y as usize + pad_y as usize;
            for c in 0..3 {
                input[[0, c, ty, tx]] = pixel[c] as f32 / 255.0;
            }
        }

        (input, scale, pad_x, pad_y)
    }
}

impl PoseEstimator for BlazePose {
    fn estimate(&mut self, image: &DynamicImage) -> Result<Option<Vec<NormalizedLandmark>>> {
        let (width, height) = (image.width(), image.height());
        let (input, scale, pad_x, pad_y) = self.prepare_input(image);

        let output = self
            .model
            .run_one(input.view().into(), None)
            .context("pose model inference failed")?;
        let output: NdTensor<f32, 2> = output
            .try_into()
            .context("unexpected pose model output type")?;

        let values = output.data().context("non-contiguous model output")?;
        let rows: Vec<&[f32]> = values.chunks_exact(ROW_LEN).collect();
        if rows.is_empty() {
            anyhow::bail!("pose model produced no landmark rows");
        }

        let mean_presence =
            rows.iter().map(|row| sigmoid(row[4])).sum::<f32>() / rows.len() as f32;
        if mean_presence < PRESENCE_THRESHOLD {
            return Ok(None);
        }

        let landmarks = rows
            .iter()
            .map(|row| NormalizedLandmark {
                x: (row[0] - pad_x) / (width as f32 * scale),
                y: (row[1] - pad_y) / (height as f32 * scale),
                z: row[2] / (width.max(height) as f32 * scale),
                visibility: sigmoid(row[3]),
            })
            .collect();

        Ok(Some(landmarks))
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

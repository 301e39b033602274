use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use indexmap::IndexMap;
use log::warn;

use crate::estimator::{NormalizedLandmark, PoseEstimator};
use crate::models::{FrameId, FrameLabel, PixelPoint, UPPER_BODY_CONNECTIONS, UPPER_BODY_LANDMARKS};

/// Counts reported by a batch extraction pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub bad_name: usize,
    pub unreadable: usize,
    pub no_pose: usize,
}

/// Convert the first 15 normalized landmarks to named integer pixel
/// coordinates. Normalized values are clamped to [0, 1] first, so every
/// stored pixel lies inside the image.
pub fn upper_body_keypoints(
    landmarks: &[NormalizedLandmark],
    width: u32,
    height: u32,
) -> Result<IndexMap<String, PixelPoint>> {
    if landmarks.len() < UPPER_BODY_LANDMARKS.len() {
        anyhow::bail!(
            "pose model returned {} landmarks, expected at least {}",
            landmarks.len(),
            UPPER_BODY_LANDMARKS.len()
        );
    }

    let mut key_points = IndexMap::with_capacity(UPPER_BODY_LANDMARKS.len());
    for (name, lm) in UPPER_BODY_LANDMARKS.iter().zip(landmarks) {
        let x = ((lm.x.clamp(0.0, 1.0) * width as f32) as u32).min(width.saturating_sub(1));
        let y = ((lm.y.clamp(0.0, 1.0) * height as f32) as u32).min(height.saturating_sub(1));
        key_points.insert(name.to_string(), PixelPoint { x, y });
    }
    Ok(key_points)
}

/// Run the estimator on one frame and build its label record.
///
/// Returns `Ok(None)` when no person is detected.
pub fn label_image(
    estimator: &mut dyn PoseEstimator,
    image: &DynamicImage,
    frame_id: &FrameId,
) -> Result<Option<FrameLabel>> {
    let Some(landmarks) = estimator.estimate(image)? else {
        return Ok(None);
    };

    let key_points = upper_body_keypoints(&landmarks, image.width(), image.height())?;
    Ok(Some(FrameLabel {
        trainee: frame_id.trainee.clone(),
        id: frame_id.id.clone(),
        frame: frame_id.frame.clone(),
        key_points,
        emotion: String::new(),
    }))
}

/// Draw the upper-body keypoints and their skeleton connections onto a copy
/// of the frame, for manual spot checks.
pub fn draw_overlay(image: &DynamicImage, key_points: &IndexMap<String, PixelPoint>) -> RgbImage {
    const JOINT: Rgb<u8> = Rgb([0, 255, 0]);
    const BONE: Rgb<u8> = Rgb([255, 0, 0]);

    let mut canvas = image.to_rgb8();
    let points: Vec<&PixelPoint> = key_points.values().collect();

    for &(a, b) in &UPPER_BODY_CONNECTIONS {
        let (from, to) = (points[a], points[b]);
        draw_line_segment_mut(
            &mut canvas,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            BONE,
        );
    }
    for point in points {
        draw_filled_circle_mut(&mut canvas, (point.x as i32, point.y as i32), 3, JOINT);
    }

    canvas
}

/// Extract keypoints for every `.png` frame in `input_dir`, writing one JSON
/// record per frame into `output_dir` (created if absent).
///
/// Frames with malformed names, unreadable image data, or no detectable pose
/// are reported and skipped; the batch always continues. When `overlay_dir`
/// is given, an annotated copy of each labelled frame is saved there.
pub fn label_directory(
    estimator: &mut dyn PoseEstimator,
    input_dir: &Path,
    output_dir: &Path,
    overlay_dir: Option<&Path>,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    if let Some(dir) = overlay_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut names: Vec<String> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read directory {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.to_lowercase().ends_with(".png"))
        .collect();
    names.sort();

    let mut summary = BatchSummary::default();
    for name in names {
        let Some(frame_id) = FrameId::from_filename(&name) else {
            warn!("skipped (unexpected name format): {name}");
            summary.bad_name += 1;
            continue;
        };

        let path = input_dir.join(&name);
        let image = match image::open(&path) {
            Ok(image) => image,
            Err(err) => {
                warn!("cannot load image {name}: {err}");
                summary.unreadable += 1;
                continue;
            }
        };

        match label_image(estimator, &image, &frame_id) {
            Ok(Some(label)) => {
                let json = serde_json::to_string_pretty(&label)?;
                let out_path = output_dir.join(frame_id.json_filename());
                std::fs::write(&out_path, json)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;

                if let Some(dir) = overlay_dir {
                    let overlay = draw_overlay(&image, &label.key_points);
                    overlay
                        .save(dir.join(&name))
                        .with_context(|| format!("failed to save overlay for {name}"))?;
                }
                summary.written += 1;
            }
            Ok(None) => {
                warn!("no keypoints detected in {name}");
                summary.no_pose += 1;
            }
            Err(err) => {
                warn!("failed to label {name}: {err:#}");
                summary.no_pose += 1;
            }
        }
    }

    Ok(summary)
}

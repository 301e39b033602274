//! Integration tests for keypoint extraction.
//!
//! Tests cover:
//! - Record shape: exactly the 15 fixed landmark names, pixel coords in bounds
//! - Clamping of out-of-range normalized coordinates
//! - Batch resilience: malformed names, unreadable files, and no-pose frames
//!   are skipped without halting the pass
//! - Overlay images saved only for labelled frames

mod common;

use posemark::estimator::NormalizedLandmark;
use posemark::extract::{label_directory, label_image};
use posemark::models::{FrameId, FrameLabel, UPPER_BODY_LANDMARKS};

use common::*;

#[test]
fn test_record_has_fixed_landmark_names_in_bounds() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let frames = dir.path().join("frames");
    let labels = dir.path().join("labels");
    std::fs::create_dir(&frames)?;
    write_test_frame(&frames, "01_05_processed_07.png", 64, 48);

    let mut estimator = StubPose::detecting();
    let summary = label_directory(&mut estimator, &frames, &labels, None)?;
    assert_eq!(summary.written, 1);

    let text = std::fs::read_to_string(labels.join("01_05_frame_07.json"))?;
    let label: FrameLabel = serde_json::from_str(&text)?;

    assert_eq!(label.trainee, "01");
    assert_eq!(label.id, "05");
    assert_eq!(label.frame, "07");
    assert_eq!(label.emotion, "", "emotion placeholder must start empty");

    let names: Vec<&str> = label.key_points.keys().map(String::as_str).collect();
    assert_eq!(names, UPPER_BODY_LANDMARKS, "names and order must be fixed");
    for point in label.key_points.values() {
        assert!(point.x < 64, "x {} out of bounds", point.x);
        assert!(point.y < 48, "y {} out of bounds", point.y);
    }
    Ok(())
}

#[test]
fn test_out_of_range_landmarks_are_clamped() -> anyhow::Result<()> {
    let image = image::DynamicImage::new_rgb8(100, 80);
    let frame_id = FrameId::from_filename("01_01_processed_01.png").unwrap();

    // One landmark past the right edge, one above the top
    let mut landmarks = full_skeleton();
    landmarks[0] = NormalizedLandmark::new(1.5, -0.2);

    let mut estimator = StubPose::scripted(vec![Some(landmarks)]);
    let label = label_image(&mut estimator, &image, &frame_id)?.expect("pose was detected");

    let nose = &label.key_points["nose"];
    assert_eq!(nose.x, 99);
    assert_eq!(nose.y, 0);
    Ok(())
}

#[test]
fn test_batch_continues_past_bad_frames() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let frames = dir.path().join("frames");
    let labels = dir.path().join("labels");
    std::fs::create_dir(&frames)?;

    // Visited in lexicographic order: detected, no pose, corrupt, bad name
    write_test_frame(&frames, "01_01_processed_01.png", 32, 32);
    write_test_frame(&frames, "01_01_processed_02.png", 32, 32);
    std::fs::write(frames.join("01_01_processed_03.png"), b"not a png")?;
    write_test_frame(&frames, "selfie.png", 32, 32);

    let mut estimator = StubPose::scripted(vec![Some(full_skeleton()), None]);
    let summary = label_directory(&mut estimator, &frames, &labels, None)?;

    assert_eq!(summary.written, 1);
    assert_eq!(summary.no_pose, 1);
    assert_eq!(summary.unreadable, 1);
    assert_eq!(summary.bad_name, 1);

    let written: Vec<_> = std::fs::read_dir(&labels)?.collect();
    assert_eq!(written.len(), 1, "only the detected frame produces a record");
    assert!(labels.join("01_01_frame_01.json").exists());
    Ok(())
}

#[test]
fn test_overlay_saved_for_labelled_frames_only() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let frames = dir.path().join("frames");
    let labels = dir.path().join("labels");
    let overlays = dir.path().join("overlays");
    std::fs::create_dir(&frames)?;
    write_test_frame(&frames, "01_01_processed_01.png", 32, 32);
    write_test_frame(&frames, "01_01_processed_02.png", 32, 32);

    let mut estimator = StubPose::scripted(vec![Some(full_skeleton()), None]);
    label_directory(&mut estimator, &frames, &labels, Some(&overlays))?;

    assert!(overlays.join("01_01_processed_01.png").exists());
    assert!(!overlays.join("01_01_processed_02.png").exists());
    Ok(())
}

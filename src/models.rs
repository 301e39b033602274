use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The 15 upper-body landmarks we keep, in MediaPipe pose topology order
/// (indices 0..=14 of the full 33-point skeleton).
pub const UPPER_BODY_LANDMARKS: [&str; 15] = [
    "nose",
    "left_eye_inner",
    "left_eye",
    "left_eye_outer",
    "right_eye_inner",
    "right_eye",
    "right_eye_outer",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
];

/// Connections between upper-body landmarks, used for overlay drawing
pub const UPPER_BODY_CONNECTIONS: [(usize, usize); 13] = [
    (0, 2),   // nose -> left_eye
    (0, 5),   // nose -> right_eye
    (1, 2),   // left_eye_inner -> left_eye
    (2, 3),   // left_eye -> left_eye_outer
    (4, 5),   // right_eye_inner -> right_eye
    (5, 6),   // right_eye -> right_eye_outer
    (3, 7),   // left_eye_outer -> left_ear
    (6, 8),   // right_eye_outer -> right_ear
    (9, 10),  // left_shoulder -> right_shoulder
    (9, 11),  // left_shoulder -> left_elbow
    (11, 13), // left_elbow -> left_wrist
    (10, 12), // right_shoulder -> right_elbow
    (12, 14), // right_elbow -> right_wrist
];

/// Integer pixel coordinate in the source frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// One label record per frame. `emotion` starts empty and is filled in by the
/// downstream annotation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameLabel {
    pub trainee: String,
    pub id: String,
    pub frame: String,
    pub key_points: IndexMap<String, PixelPoint>,
    pub emotion: String,
}

/// Identifiers parsed from a canonical frame filename
/// (`{trainee}_{id}_processed_{frame}.png`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameId {
    pub trainee: String,
    pub id: String,
    pub frame: String,
}

impl FrameId {
    /// Parse identifiers from a filename. The stem must split on `_` into
    /// exactly four tokens: trainee, session id, a tag we ignore, and the
    /// frame index. Anything else is malformed.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let stem = Path::new(filename).file_stem()?.to_str()?;
        let mut tokens = stem.split('_');
        let trainee = tokens.next()?;
        let id = tokens.next()?;
        let _tag = tokens.next()?;
        let frame = tokens.next()?;
        if tokens.next().is_some() || trainee.is_empty() || id.is_empty() || frame.is_empty() {
            return None;
        }
        Some(Self {
            trainee: trainee.to_string(),
            id: id.to_string(),
            frame: frame.to_string(),
        })
    }

    /// Filename for this frame's JSON label record
    pub fn json_filename(&self) -> String {
        format!("{}_{}_frame_{}.json", self.trainee, self.id, self.frame)
    }
}

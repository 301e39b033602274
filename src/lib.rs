pub mod estimator;
pub mod extract;
pub mod merge;
pub mod models;
pub mod rename;

pub use estimator::{BlazePose, NormalizedLandmark, PoseEstimator};
pub use extract::{BatchSummary, label_directory, label_image};
pub use merge::{MergeSummary, merge_to_file};
pub use models::{FrameId, FrameLabel, PixelPoint, UPPER_BODY_LANDMARKS};
pub use rename::{RenameOutcome, normalize_directory};

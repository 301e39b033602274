use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use regex::Regex;

/// What happened to one file during a normalization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// File was renamed to the canonical form
    Renamed { from: String, to: String },
    /// Name was already canonical, nothing to do
    Unchanged(String),
    /// Canonical target already exists; original left in place
    Collision { from: String, to: String },
    /// Filename did not match the expected pattern
    NoMatch(String),
}

/// Frame filename pattern: trainee and session id separated by `_` or `-`,
/// anything in between, then `_processed_` and the frame index.
const FRAME_PATTERN: &str = r"(?i)(\d+)[_\-](\d+).*?_processed_(\d+)\.png";

/// Left-pad a numeric field with zeros to a minimum width of 2. Fields that
/// are already wider pass through unchanged, never truncated.
fn pad_field(field: &str) -> String {
    format!("{:0>2}", field)
}

/// Canonical filename for the three captured numeric fields
fn canonical_name(trainee: &str, id: &str, frame: &str) -> String {
    format!(
        "{}_{}_processed_{}.png",
        pad_field(trainee),
        pad_field(id),
        pad_field(frame)
    )
}

/// Normalize every matching `.png` filename in `dir` to the canonical
/// `TT_SS_processed_FF.png` form.
///
/// Non-matching names are left untouched, and a rename whose target already
/// exists is skipped so no file is ever overwritten. The pass is not
/// transactional: an I/O error partway through leaves earlier renames in
/// place.
pub fn normalize_directory(dir: &Path) -> Result<Vec<RenameOutcome>> {
    let pattern = Regex::new(FRAME_PATTERN)?;
    let mut outcomes = Vec::new();

    let mut names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    for name in names {
        if !name.to_lowercase().ends_with(".png") {
            continue;
        }

        let Some(caps) = pattern.captures(&name) else {
            warn!("skipped (no match): {name}");
            outcomes.push(RenameOutcome::NoMatch(name));
            continue;
        };

        let target = canonical_name(&caps[1], &caps[2], &caps[3]);
        if name == target {
            outcomes.push(RenameOutcome::Unchanged(name));
            continue;
        }

        let dst = dir.join(&target);
        if dst.exists() {
            warn!("skipped (target exists): {target}");
            outcomes.push(RenameOutcome::Collision {
                from: name,
                to: target,
            });
            continue;
        }

        std::fs::rename(dir.join(&name), &dst)
            .with_context(|| format!("failed to rename {name} to {target}"))?;
        info!("renamed: {name} -> {target}");
        outcomes.push(RenameOutcome::Renamed {
            from: name,
            to: target,
        });
    }

    Ok(outcomes)
}

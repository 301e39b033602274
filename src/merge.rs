use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde_json::Value;

/// Counts reported by a merge pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Input files whose records made it into the output
    pub merged_files: usize,
    /// Malformed inputs that were skipped
    pub skipped: usize,
    /// Total records in the output array
    pub records: usize,
}

/// Concatenate every `*.json` record in `input_dir` into a single array.
///
/// Files are read in lexicographic name order. A file whose root is itself an
/// array contributes its elements directly instead of nesting; any other root
/// becomes one element. Duplicates are preserved. Malformed JSON is skipped
/// with a warning rather than aborting the merge.
pub fn merge_records(input_dir: &Path) -> Result<(Vec<Value>, MergeSummary)> {
    let mut names: Vec<String> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read directory {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();

    let mut all_records = Vec::new();
    let mut summary = MergeSummary::default();

    for name in names {
        let path = input_dir.join(&name);
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(elements)) => {
                all_records.extend(elements);
                summary.merged_files += 1;
            }
            Ok(value) => {
                all_records.push(value);
                summary.merged_files += 1;
            }
            Err(err) => {
                warn!("skipped malformed JSON {name}: {err}");
                summary.skipped += 1;
            }
        }
    }

    summary.records = all_records.len();
    Ok((all_records, summary))
}

/// Merge all records in `input_dir` and write them as a pretty-printed JSON
/// array to `output_file`.
pub fn merge_to_file(input_dir: &Path, output_file: &Path) -> Result<MergeSummary> {
    let (records, summary) = merge_records(input_dir)?;
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output_file, json)
        .with_context(|| format!("failed to write {}", output_file.display()))?;
    Ok(summary)
}

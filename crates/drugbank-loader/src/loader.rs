//! Dataset file discovery and loading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{DatasetFile, DrugLoadError, DrugResult};

/// Marker in dataset file names, as in `20191031_FDASMDrugs_2546.txt`.
const DATASET_MARKER: &str = "FDASMDrugs";

/// Locates a drug dataset.
///
/// A file path is used as-is. A directory is searched for files named like
/// `<YYYYMMDD>_FDASMDrugs_<count>.txt`; the newest release date wins.
pub fn locate_dataset<P: AsRef<Path>>(path: P) -> DrugResult<DatasetFile> {
    let path = path.as_ref();

    if path.is_file() {
        return describe_dataset(path.to_path_buf());
    }

    if !path.exists() {
        return Err(DrugLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut best: Option<(String, PathBuf)> = None;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let filename = entry.file_name();
        let filename_str = filename.to_string_lossy();
        if !filename_str.ends_with(".txt") || !filename_str.contains(DATASET_MARKER) {
            continue;
        }

        let candidate = (
            extract_release_date(&filename_str).unwrap_or_default(),
            entry.path(),
        );
        if best.as_ref().map_or(true, |current| candidate > *current) {
            best = Some(candidate);
        }
    }

    match best {
        Some((_, file)) => describe_dataset(file),
        None => Err(DrugLoadError::DatasetMissing {
            directory: path.display().to_string(),
        }),
    }
}

fn describe_dataset(path: PathBuf) -> DrugResult<DatasetFile> {
    let size_bytes = fs::metadata(&path)?.len();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(DatasetFile {
        release_date: extract_release_date(&filename),
        declared_count: extract_declared_count(&filename),
        size_bytes,
        path,
    })
}

/// Extracts the release date from a dataset file name.
///
/// Dataset files have names like `20191031_FDASMDrugs_2546.txt`.
fn extract_release_date(filename: &str) -> Option<String> {
    let first = filename.split('_').next()?;
    if first.len() == 8 && first.chars().all(|c| c.is_ascii_digit()) {
        Some(first.to_string())
    } else {
        None
    }
}

/// Extracts the drug count that closes a dataset file name.
fn extract_declared_count(filename: &str) -> Option<usize> {
    let without_ext = filename.trim_end_matches(".txt");
    let (_, last) = without_ext.rsplit_once('_')?;
    if !without_ext.contains(DATASET_MARKER) {
        return None;
    }
    last.parse().ok()
}

/// Formats a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::*;

use crate::{consts::*, error::*};

/// Outcome of checking one `.json` candidate for the state keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub name: String,
    pub matched: bool,
    pub detail: String,
}

/// The state file chosen for a folder and how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateLookup {
    pub path: PathBuf,
    pub inspected: Vec<Inspection>,
}

/// Absolute folders are used as-is, relative ones live under `base_dir`.
pub fn resolve_folder(base_dir: &Path, folder: &Path) -> PathBuf {
    if folder.is_absolute() {
        folder.to_path_buf()
    } else {
        base_dir.join(folder)
    }
}

/// Sorted names of the folder's entries, empty when it cannot be read.
pub fn list_files(folder: &Path) -> Vec<String> {
    let mut names = match std::fs::read_dir(folder) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>(),
        Err(err) => {
            warn!("can not list {}: {err}", folder.display());
            Vec::new()
        }
    };
    names.sort();
    names
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// First image of the folder by extension priority, names sorted within one extension.
pub fn find_image(folder: &Path) -> Result<PathBuf, OcrviewError> {
    let mut files = std::fs::read_dir(folder)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    files.sort();

    IMAGE_EXTENSIONS
        .iter()
        .find_map(|extension| files.iter().find(|path| has_extension(path, extension)))
        .cloned()
        .ok_or_else(|| {
            ImageNotFoundSnafu {
                folder: folder.to_string_lossy(),
                patterns: IMAGE_EXTENSIONS
                    .iter()
                    .map(|ext| format!("*.{ext}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .build()
        })
}

/// Every `.json` file below `folder`, in sorted path order.
fn json_files(folder: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![folder.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            // file_type does not follow symlinks, so linked directories are not walked
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                pending.push(path);
            } else if has_extension(&path, "json") {
                found.push(path);
            }
        }
    }

    found.sort();
    found
}

fn inspect(path: &Path) -> Inspection {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = std::fs::read(path)
        .map_err(|err| err.to_string())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|err| err.to_string()));

    match parsed {
        Ok(value) => {
            let usable = |key: &str| value.get(key).is_some_and(|v| v.is_object() || v.is_array());
            let has_parsed = usable("parsed_json");
            let has_ocr = usable("parsed_json_ocr");
            Inspection {
                name,
                matched: has_parsed && has_ocr,
                detail: format!("parsed_json:{has_parsed}, parsed_json_ocr:{has_ocr}"),
            }
        }
        Err(err) => Inspection {
            name,
            matched: false,
            detail: format!("load_error: {err}"),
        },
    }
}

/// Picks the state file of a folder.
///
/// A manual override naming an existing `.json` file in the folder wins. Otherwise
/// the first file whose name carries [`STATE_FILE_MARKER`], then the first whose
/// content has both state keys, then the first `.json` file at all.
pub fn find_state_file(
    folder: &Path,
    manual_override: Option<&str>,
) -> Result<StateLookup, OcrviewError> {
    if let Some(name) = manual_override.filter(|name| has_extension(Path::new(name), "json")) {
        let candidate = folder.join(name);
        if candidate.exists() {
            info!("using manually chosen state file {}", candidate.display());
            return Ok(StateLookup {
                path: candidate,
                inspected: Vec::new(),
            });
        }
        warn!("manual state file {} does not exist, ignoring", candidate.display());
    }

    let candidates = json_files(folder);

    let by_name = candidates.iter().find(|path| {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().contains(STATE_FILE_MARKER))
    });
    if let Some(path) = by_name {
        return Ok(StateLookup {
            path: path.clone(),
            inspected: Vec::new(),
        });
    }

    let mut inspected = Vec::with_capacity(candidates.len());
    let mut found = None;
    for path in &candidates {
        let inspection = inspect(path);
        debug!("inspected {}: {}", inspection.name, inspection.detail);
        if inspection.matched && found.is_none() {
            found = Some(path.clone());
        }
        inspected.push(inspection);
    }

    let path = found
        .or_else(|| candidates.first().cloned())
        .ok_or_else(|| {
            StateFileNotFoundSnafu {
                folder: folder.to_string_lossy(),
            }
            .build()
        })?;

    Ok(StateLookup { path, inspected })
}

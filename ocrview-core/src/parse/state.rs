use std::path::Path;

use serde_json::{Map, Value};
use snafu::prelude::*;
use tracing::*;

use crate::error::*;

/// The pipeline output this viewer inspects.
///
/// `parsed_json` is opaque and only displayed. `parsed_json_ocr` and
/// `ocr_blocks` hold boxes in one of the page shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub parsed_json: Value,
    pub parsed_json_ocr: Value,
    pub ocr_blocks: Option<Value>,
}

impl DocumentState {
    /// Parses a state document. `path` is only used in error messages.
    pub fn from_slice(bytes: &[u8], path: &str) -> Result<Self, OcrviewError> {
        let mut raw: Map<String, Value> =
            serde_json::from_slice(bytes).context(JsonParseSnafu { path })?;

        // a JSON null is treated the same as a missing key
        let mut take = |key: &str| raw.remove(key).filter(|value| !value.is_null());
        let parsed_json = take("parsed_json");
        let parsed_json_ocr = take("parsed_json_ocr");
        let ocr_blocks = take("ocr_blocks");

        match (parsed_json, parsed_json_ocr) {
            (Some(parsed_json), Some(parsed_json_ocr)) => Ok(Self {
                parsed_json,
                parsed_json_ocr,
                ocr_blocks,
            }),
            (parsed_json, parsed_json_ocr) => {
                let keys = [
                    ("parsed_json", parsed_json.is_none()),
                    ("parsed_json_ocr", parsed_json_ocr.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then(|| format!("'{key}'")))
                .collect::<Vec<_>>()
                .join(" and ");

                MissingKeysSnafu { path, keys }.fail()
            }
        }
    }
}

pub fn load_state<P: AsRef<Path>>(path: P) -> Result<DocumentState, OcrviewError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    let bytes = std::fs::read(path).context(IoReadSnafu { path: &*path_str })?;
    let state = DocumentState::from_slice(&bytes, &path_str)?;

    info!(
        "loaded state {path_str}, ocr_blocks {}",
        if state.ocr_blocks.is_some() { "present" } else { "absent" }
    );

    Ok(state)
}

use std::path::{Path, PathBuf};

use image::RgbImage;
use snafu::ResultExt;
use tracing::*;

use crate::{
    config::ViewerConfig,
    error::*,
    locate::{self, Inspection},
    parse::{
        normalize::{self, Note, NormalizedDocument},
        state::{self, DocumentState},
    },
    render::{self, Rendered},
};

/// Everything read from one document folder.
pub struct LoadedDocument {
    pub folder: PathBuf,
    pub files: Vec<String>,
    pub image_path: PathBuf,
    pub state_path: PathBuf,
    pub inspected: Vec<Inspection>,
    pub state: DocumentState,
    pub image: RgbImage,
}

impl LoadedDocument {
    /// Locates and reads the image and state file of `folder`.
    ///
    /// The image is looked up first, so a folder missing both reports the image.
    pub fn load(folder: &Path, manual_override: Option<&str>) -> Result<Self, OcrviewError> {
        let files = locate::list_files(folder);
        info!("{} files in {}", files.len(), folder.display());

        let image_path = locate::find_image(folder)?;
        let lookup = locate::find_state_file(folder, manual_override)?;
        for inspection in lookup.inspected.iter().filter(|i| !i.matched) {
            info!("skipped {}: {}", inspection.name, inspection.detail);
        }

        let state = state::load_state(&lookup.path)?;
        let image = open_image(&image_path)?;

        Ok(Self {
            folder: folder.to_path_buf(),
            files,
            image_path,
            state_path: lookup.path,
            inspected: lookup.inspected,
            state,
            image,
        })
    }
}

pub fn open_image(path: &Path) -> Result<RgbImage, OcrviewError> {
    let image = image::open(path)
        .context(ImageOpenSnafu {
            path: path.to_string_lossy(),
        })?
        .to_rgb8();
    info!(
        "loaded image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Result of one Load, Normalize, Render pass.
pub struct Outcome {
    pub document: NormalizedDocument,
    pub rendered: Rendered,
    pub written: Vec<PathBuf>,
}

impl Outcome {
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.document.notes()
    }
}

/// Runs the whole viewer on a loaded folder and writes the outputs.
pub fn run(
    loaded: &LoadedDocument,
    config: &ViewerConfig,
    output_dir: &Path,
) -> Result<Outcome, OcrviewError> {
    let document = normalize::normalize(&loaded.state);
    info!(
        "{} ocr blocks, {} parsed boxes on page 0",
        document.ocr.boxes.len(),
        document.parsed.boxes.len()
    );

    let rendered = render::render(&document, &loaded.image, config)?;
    let written = render::write_outputs(&rendered, &document, output_dir)?;

    Ok(Outcome {
        document,
        rendered,
        written,
    })
}

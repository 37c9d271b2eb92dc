use std::{collections::BTreeSet, fmt};

use serde::Serialize;
use serde_json::Value;
use tracing::*;

use crate::{
    consts::RENDERED_PAGE,
    layout::{
        element::{LabelBox, OcrBlock, OverlayBox},
        page::Page,
    },
    parse::{shape::PageShape, state::DocumentState},
};

/// Something worth telling the user that does not stop the render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Note {
    /// An optional fragment is not in the state file.
    Absent { field: &'static str },
    /// A fragment is none of the three supported page shapes.
    UnrecognizedShape { field: &'static str },
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Absent { field } => {
                write!(f, "No '{field}' present in JSON, skipping its overlay.")
            }
            Note::UnrecognizedShape { field } => write!(
                f,
                "Unrecognized structure for '{field}'. Expected dict with 'pages', \
                 a list of pages, or a flat list of boxes."
            ),
        }
    }
}

/// The canonical page-0 boxes of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized<T> {
    pub boxes: Vec<T>,
    /// Page-0 items dropped for a missing or unusable bbox.
    pub dropped: usize,
    pub note: Option<Note>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            boxes: Vec::new(),
            dropped: 0,
            note: None,
        }
    }
}

/// Parses every page of a fragment.
pub fn parse_pages<T: OverlayBox>(shape: &PageShape<'_>) -> (Vec<Page<T>>, usize) {
    let mut dropped = 0;
    let pages = shape
        .raw_pages(T::KIND)
        .into_iter()
        .filter_map(|raw| {
            let page_no = raw.page_no?;
            let boxes = raw
                .items
                .iter()
                .filter_map(T::from_item)
                .collect::<Vec<_>>();
            if page_no == RENDERED_PAGE {
                dropped += raw.items.len() - boxes.len();
            }
            Some(Page { page_no, boxes })
        })
        .collect();

    (pages, dropped)
}

/// Normalizes one box fragment into its canonical page-0 list.
///
/// An absent or unrecognized fragment gives no boxes and a [`Note`].
pub fn normalize_boxes<T: OverlayBox>(fragment: Option<&Value>) -> Normalized<T> {
    let field = T::KIND.field();

    let Some(fragment) = fragment else {
        info!("no '{field}' in state, skipping its overlay");
        return Normalized {
            note: Some(Note::Absent { field }),
            ..Default::default()
        };
    };

    let Some(shape) = PageShape::resolve(fragment) else {
        warn!("unrecognized structure for '{field}'");
        return Normalized {
            note: Some(Note::UnrecognizedShape { field }),
            ..Default::default()
        };
    };

    let (pages, dropped) = parse_pages::<T>(&shape);
    let page_count = pages.len();
    let boxes = pages
        .into_iter()
        .filter(|page| page.page_no == RENDERED_PAGE)
        .flat_map(|page| page.boxes)
        .collect::<Vec<_>>();

    debug!(
        "'{field}' is {} with {page_count} pages, {} boxes on page 0, {dropped} dropped",
        shape.name(),
        boxes.len()
    );

    Normalized {
        boxes,
        dropped,
        note: None,
    }
}

/// A state file reduced to what the renderers draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDocument {
    pub parsed_json: Value,
    pub ocr: Normalized<OcrBlock>,
    pub parsed: Normalized<LabelBox>,
}

impl NormalizedDocument {
    /// Sorted, distinct labels of the parsed boxes.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.parsed
            .boxes
            .iter()
            .map(|label| label.label.as_str())
            .collect()
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.ocr.note.iter().chain(self.parsed.note.iter())
    }
}

pub fn normalize(state: &DocumentState) -> NormalizedDocument {
    NormalizedDocument {
        parsed_json: state.parsed_json.clone(),
        ocr: normalize_boxes(state.ocr_blocks.as_ref()),
        parsed: normalize_boxes(Some(&state.parsed_json_ocr)),
    }
}

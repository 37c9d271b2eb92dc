use serde::Serialize;
use serde_json::Value;

use crate::analysis::{
    bbox::Bbox,
    color::{BoxColor, parse_confidence},
};

/// The two kinds of boxes found in a state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoxKind {
    /// Raw OCR text blocks from `ocr_blocks`.
    Ocr,
    /// Structured-label boxes from `parsed_json_ocr`.
    Parsed,
}

impl BoxKind {
    /// Key of this kind's fragment in the state file.
    pub const fn field(&self) -> &'static str {
        match self {
            BoxKind::Ocr => "ocr_blocks",
            BoxKind::Parsed => "parsed_json_ocr",
        }
    }

    /// Page keys holding the item list, preferred key first.
    pub const fn items_keys(&self) -> [&'static str; 2] {
        match self {
            BoxKind::Ocr => ["blocks", "boxes"],
            BoxKind::Parsed => ["boxes", "blocks"],
        }
    }
}

/// A box that can be drawn by the overlay renderers.
pub trait OverlayBox: Sized {
    const KIND: BoxKind;

    /// Builds a box from one JSON item, `None` when the item has no usable bbox.
    fn from_item(item: &Value) -> Option<Self>;

    fn bbox(&self) -> &Bbox;

    fn color(&self) -> BoxColor;

    /// Unescaped caption shown next to the box.
    fn caption(&self) -> String;
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct OcrBlock {
    pub bbox: Bbox,
    pub text: String,
    pub confidence: Option<f64>,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct LabelBox {
    pub bbox: Bbox,
    pub label: String,
}

impl OverlayBox for OcrBlock {
    const KIND: BoxKind = BoxKind::Ocr;

    fn from_item(item: &Value) -> Option<Self> {
        let item = item.as_object()?;
        let bbox = Bbox::from_json(item.get("bbox")?)?;

        Some(Self {
            bbox,
            text: string_field(item.get("text")),
            confidence: item.get("confidence").and_then(parse_confidence),
        })
    }

    fn bbox(&self) -> &Bbox {
        &self.bbox
    }

    fn color(&self) -> BoxColor {
        BoxColor::from_confidence(self.confidence)
    }

    fn caption(&self) -> String {
        match self.confidence {
            Some(confidence) => format!("{} ({:.2})", self.text, confidence),
            None => self.text.clone(),
        }
    }
}

impl OverlayBox for LabelBox {
    const KIND: BoxKind = BoxKind::Parsed;

    fn from_item(item: &Value) -> Option<Self> {
        let item = item.as_object()?;
        let bbox = Bbox::from_json(item.get("bbox")?)?;

        Some(Self {
            bbox,
            label: string_field(item.get("label")),
        })
    }

    fn bbox(&self) -> &Bbox {
        &self.bbox
    }

    fn color(&self) -> BoxColor {
        BoxColor::Purple
    }

    fn caption(&self) -> String {
        self.label.clone()
    }
}

/// Text of an optional JSON field. Null and missing are empty, other
/// non-string scalars use their JSON spelling.
fn string_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

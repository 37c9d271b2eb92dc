use serde::Serialize;
use serde_json::Value;

use crate::consts::*;

/// Outline colors used by both renderers.
///
/// Names are CSS color keywords, and `rgb` returns the same values the
/// keywords resolve to so the static fallback matches the HTML overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxColor {
    Blue,
    Green,
    Lime,
    Orange,
    Red,
    Purple,
}

impl BoxColor {
    pub const fn name(&self) -> &'static str {
        match self {
            BoxColor::Blue => "blue",
            BoxColor::Green => "green",
            BoxColor::Lime => "lime",
            BoxColor::Orange => "orange",
            BoxColor::Red => "red",
            BoxColor::Purple => "purple",
        }
    }

    pub const fn rgb(&self) -> [u8; 3] {
        match self {
            BoxColor::Blue => [0, 0, 255],
            BoxColor::Green => [0, 128, 0],
            BoxColor::Lime => [0, 255, 0],
            BoxColor::Orange => [255, 165, 0],
            BoxColor::Red => [255, 0, 0],
            BoxColor::Purple => [128, 0, 128],
        }
    }

    /// Confidence bucket of an OCR block. Boundaries belong to the higher bucket.
    ///
    /// ```
    /// use ocrview_core::analysis::color::BoxColor;
    /// assert_eq!(BoxColor::from_confidence(Some(0.99)), BoxColor::Green);
    /// assert_eq!(BoxColor::from_confidence(Some(0.97)), BoxColor::Orange);
    /// assert_eq!(BoxColor::from_confidence(None), BoxColor::Blue);
    /// ```
    pub fn from_confidence(confidence: Option<f64>) -> Self {
        match confidence {
            None => BoxColor::Blue,
            Some(c) if c >= CONFIDENCE_GREEN => BoxColor::Green,
            Some(c) if c >= CONFIDENCE_LIME => BoxColor::Lime,
            Some(c) if c >= CONFIDENCE_ORANGE => BoxColor::Orange,
            Some(_) => BoxColor::Red,
        }
    }
}

/// Reads a confidence score the way a numeric cast would.
///
/// Numbers, booleans and numeric strings are accepted; everything else means
/// the block has no confidence.
pub fn parse_confidence(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

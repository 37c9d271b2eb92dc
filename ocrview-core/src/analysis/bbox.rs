use glam::DVec2;
use serde::Serialize;
use serde_json::Value;

/// A 2D axis-aligned bounding box in image pixel coordinates.
///
/// The origin is the top-left corner of the image with Y increasing downward,
/// which is the convention of the OCR producer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bbox {
    /// The top-left corner.
    pub min: DVec2,
    /// The bottom-right corner.
    pub max: DVec2,
}

/// A box position expressed as percentages of the image size.
///
/// Percentages keep the overlay aligned when the embedding viewport scales the
/// image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// An integer pixel region inside an image, suitable for cropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The integer pixel region of a whole box, which may extend past the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Bbox {
    /// Creates a bounding box from two opposite corners.
    ///
    /// Corners are reordered so that `min <= max` on both axes, an inverted
    /// box from the producer is kept rather than dropped.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use ocrview_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(DVec2::new(50.0, 30.0), DVec2::new(10.0, 10.0));
    /// assert_eq!(bbox.min, DVec2::new(10.0, 10.0));
    /// assert_eq!(bbox.max, DVec2::new(50.0, 30.0));
    /// ```
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a bounding box from `[x1, y1, x2, y2]`.
    pub fn from_xyxy(xyxy: [f64; 4]) -> Self {
        Self::new(
            DVec2::new(xyxy[0], xyxy[1]),
            DVec2::new(xyxy[2], xyxy[3]),
        )
    }

    /// Reads a bounding box from a JSON `bbox` array.
    ///
    /// Only the first four components are used and each must be a number.
    /// Returns `None` for anything shorter or non-numeric.
    ///
    /// # Example
    /// ```
    /// use ocrview_core::analysis::bbox::Bbox;
    /// let value = serde_json::json!([10, 10, 50, 30, 0.5]);
    /// let bbox = Bbox::from_json(&value).unwrap();
    /// assert_eq!(bbox.width(), 40.0);
    /// assert!(Bbox::from_json(&serde_json::json!([1, 2, 3])).is_none());
    /// ```
    pub fn from_json(value: &Value) -> Option<Self> {
        let values = value.as_array()?;
        if values.len() < 4 {
            return None;
        }

        let mut xyxy = [0.0; 4];
        for (slot, value) in xyxy.iter_mut().zip(values) {
            *slot = value.as_f64()?;
        }

        Some(Self::from_xyxy(xyxy))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Calculates the area of the bounding box.
    pub fn area(&self) -> f64 {
        let length = self.max - self.min;

        length.x * length.y
    }

    /// Position of this box as percentages of an image of `image_size` pixels.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use ocrview_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_xyxy([10.0, 10.0, 50.0, 30.0]);
    /// let rect = bbox.to_percent(DVec2::new(1000.0, 1000.0));
    /// assert!((rect.left - 1.0).abs() < 1e-9);
    /// assert!((rect.width - 4.0).abs() < 1e-9);
    /// ```
    pub fn to_percent(&self, image_size: DVec2) -> PercentRect {
        let origin = self.min / image_size * 100.0;
        let size = (self.max - self.min) / image_size * 100.0;

        PercentRect {
            left: origin.x,
            top: origin.y,
            width: size.x,
            height: size.y,
        }
    }

    /// The integer pixel region covered by this box, clipped to the image.
    ///
    /// Coordinates are truncated toward zero before clipping. Returns `None`
    /// when nothing of the box lies inside the image or the region has no
    /// area.
    pub fn crop_rect(&self, image_width: u32, image_height: u32) -> Option<CropRect> {
        let clip = |from: f64, to: f64, limit: u32| -> Option<(u32, u32)> {
            let limit = i64::from(limit);
            let start = (from as i64).clamp(0, limit);
            let end = (to as i64).clamp(0, limit);
            (end > start).then(|| (start as u32, (end - start) as u32))
        };

        let (x, width) = clip(self.min.x, self.max.x, image_width)?;
        let (y, height) = clip(self.min.y, self.max.y, image_height)?;

        Some(CropRect {
            x,
            y,
            width,
            height,
        })
    }

    /// The integer pixel region of the whole box, for padding a crop that
    /// overhangs the image.
    ///
    /// Coordinates are truncated toward zero like [`Bbox::crop_rect`], then
    /// limited to one image size beyond each edge. The result always contains
    /// the crop region.
    pub fn frame_rect(&self, image_width: u32, image_height: u32) -> Option<FrameRect> {
        let span = |from: f64, to: f64, limit: u32| -> Option<(i64, u32)> {
            let limit = i64::from(limit);
            let start = (from as i64).clamp(-limit, 2 * limit);
            let end = (to as i64).clamp(-limit, 2 * limit);
            (end > start).then(|| (start, (end - start) as u32))
        };

        let (x, width) = span(self.min.x, self.max.x, image_width)?;
        let (y, height) = span(self.min.y, self.max.y, image_height)?;

        Some(FrameRect {
            x,
            y,
            width,
            height,
        })
    }
}

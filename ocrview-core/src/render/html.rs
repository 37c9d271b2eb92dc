use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use glam::DVec2;
use image::{
    ImageFormat, RgbImage,
    imageops::{self, FilterType},
};
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    consts::*,
    error::*,
    layout::element::{BoxKind, LabelBox, OcrBlock, OverlayBox},
};

const OVERLAY_CSS: &str = r#"<style>
.overlay-container { position: relative; display: inline-block; max-width: 100%; }
.overlay-container img { display: block; max-width: 100%; height: auto; }
.box { position: absolute; box-sizing: border-box; border: 2px solid blue; pointer-events: auto; z-index: 5; }
.box.parsed { border-style: dashed; }
.box::after { content: attr(data-label); position: absolute; left: 0; top: -1.9em; white-space: nowrap; background: rgba(255,255,255,0.9); padding: 2px 6px; font-size: 12px; color: #000; transform-origin: left top; transition: transform 0.12s ease, background 0.12s ease; z-index: 10; }
.box .zoom { display: none; position: absolute; left: 0; top: 100%; margin-left: 8px; border: 2px solid #333; box-shadow: 0 4px 12px rgba(0,0,0,0.35); max-width: 320px; z-index: 20; }
.box:hover { z-index: 2000; }
.box:hover::after { transform: scale(1.8); z-index: 2010; background: rgba(255,255,255,1.00); backdrop-filter: blur(10px); -webkit-backdrop-filter: blur(6px); font-weight: 700; font-size: 16px; padding: 4px 8px; }
.box:hover .zoom { display: block; z-index: 2020; }
</style>"#;

/// The two hover overlays of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveOverlay {
    pub ocr_html: String,
    pub parsed_html: String,
    /// Height in pixels the embedding surface should reserve.
    pub height_hint: f64,
}

/// Escapes text for a double-quoted HTML attribute, folding line breaks into spaces.
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => {
                chars.next_if_eq(&'\n');
                escaped.push(' ');
            }
            '\n' => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escapes element text content.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// PNG-encodes an image and returns it as base64.
pub fn encode_png_base64(image: &RgbImage, stage: &str) -> Result<String, OcrviewError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context(ImageEncodeSnafu { stage })?;

    Ok(STANDARD.encode(buffer.into_inner()))
}

const fn box_class(kind: BoxKind) -> &'static str {
    match kind {
        BoxKind::Ocr => "box",
        BoxKind::Parsed => "box parsed",
    }
}

/// The base image of an overlay, encoded once and shared by both documents.
pub struct OverlayCanvas<'a> {
    image: &'a RgbImage,
    image_base64: String,
    thumbnail_width: u32,
}

impl<'a> OverlayCanvas<'a> {
    pub fn new(image: &'a RgbImage, thumbnail_width: u32) -> Result<Self, OcrviewError> {
        let image_base64 = encode_png_base64(image, "base-image")?;

        Ok(Self {
            image,
            image_base64,
            thumbnail_width,
        })
    }

    fn size(&self) -> DVec2 {
        DVec2::new(f64::from(self.image.width()), f64::from(self.image.height()))
    }

    /// Zoomed crop of `bbox` as a base64 PNG.
    ///
    /// `None` for boxes with no crop area inside the image. Parts of the box
    /// outside the image are padded with black, so the thumbnail keeps the
    /// aspect ratio of the box.
    pub fn thumbnail(&self, bbox: &Bbox) -> Option<String> {
        let (image_width, image_height) = self.image.dimensions();
        let rect = bbox.crop_rect(image_width, image_height)?;
        let frame = bbox.frame_rect(image_width, image_height)?;
        let crop = imageops::crop_imm(self.image, rect.x, rect.y, rect.width, rect.height).to_image();

        let mut padded = RgbImage::new(frame.width, frame.height);
        imageops::replace(
            &mut padded,
            &crop,
            i64::from(rect.x) - frame.x,
            i64::from(rect.y) - frame.y,
        );

        let width = self.thumbnail_width.max(1);
        let height =
            ((f64::from(width) / f64::from(frame.width)) * f64::from(frame.height)) as u32;
        let zoomed = imageops::resize(&padded, width, height.max(1), FilterType::CatmullRom);

        match encode_png_base64(&zoomed, "thumbnail") {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                warn!("skip thumbnail for {bbox:?}: {err}");
                None
            }
        }
    }

    pub fn box_div<T: OverlayBox>(&self, item: &T) -> String {
        let rect = item.bbox().to_percent(self.size());
        let label = escape_label(&item.caption());
        let zoom = self
            .thumbnail(item.bbox())
            .map(|thumb| format!(r#"<img class="zoom" src="data:image/png;base64,{thumb}" />"#))
            .unwrap_or_default();

        format!(
            r#"<div class="{}" style="left:{:.4}%; top:{:.4}%; width:{:.4}%; height:{:.4}%; border-color:{};" data-label="{}">{}</div>"#,
            box_class(T::KIND),
            rect.left,
            rect.top,
            rect.width,
            rect.height,
            item.color().name(),
            label,
            zoom,
        )
    }

    /// A standalone HTML document with `items` over the base image.
    pub fn document<'b, T, I>(&self, items: I) -> String
    where
        T: OverlayBox + 'b,
        I: IntoIterator<Item = &'b T>,
    {
        let boxes = items
            .into_iter()
            .map(|item| self.box_div(item))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{OVERLAY_CSS}\n</head>\n<body>\n\
             <div class=\"overlay-container\">\n<img src=\"data:image/png;base64,{}\" />\n{boxes}\n</div>\n\
             </body>\n</html>\n",
            self.image_base64
        )
    }
}

/// Builds the OCR and parsed-label hover overlays for one image.
pub fn render_interactive(
    image: &RgbImage,
    ocr: &[OcrBlock],
    parsed: &[&LabelBox],
    thumbnail_width: u32,
) -> Result<InteractiveOverlay, OcrviewError> {
    let canvas = OverlayCanvas::new(image, thumbnail_width)?;

    info!(
        "render overlay with {} ocr blocks and {} parsed boxes",
        ocr.len(),
        parsed.len()
    );

    Ok(InteractiveOverlay {
        ocr_html: canvas.document(ocr),
        parsed_html: canvas.document(parsed.iter().copied()),
        height_hint: f64::from(image.height()) * SURFACE_HEIGHT_RATIO,
    })
}

use std::path::{Path, PathBuf};

use image::RgbImage;
use serde_json::Value;
use snafu::ResultExt;
use tracing::*;

use crate::{
    config::ViewerConfig,
    consts::*,
    error::*,
    layout::element::LabelBox,
    parse::normalize::NormalizedDocument,
};

pub mod annotate;
pub mod html;

use html::{InteractiveOverlay, escape_text};

/// What one render produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Interactive(InteractiveOverlay),
    Static(RgbImage),
}

/// Renders a normalized document over its image.
///
/// Hover overlays are used when interactive mode is on and there are OCR
/// blocks to show, otherwise the OCR blocks are drawn onto the image.
pub fn render(
    document: &NormalizedDocument,
    image: &RgbImage,
    config: &ViewerConfig,
) -> Result<Rendered, OcrviewError> {
    let ocr = &document.ocr.boxes;

    if config.interactive && !ocr.is_empty() {
        let parsed: Vec<&LabelBox> = if config.include_parsed {
            document
                .parsed
                .boxes
                .iter()
                .filter(|label| config.keeps_label(&label.label))
                .collect()
        } else {
            Vec::new()
        };

        let overlay = html::render_interactive(image, ocr, &parsed, config.thumbnail_width)?;
        return Ok(Rendered::Interactive(overlay));
    }

    if config.interactive {
        info!("no ocr blocks to overlay, falling back to a static image");
    }

    let font = annotate::load_font(config.font_path.as_deref())?;
    Ok(Rendered::Static(annotate::annotate(image, ocr, font.as_ref())))
}

/// Page embedding both overlays at the surface height, with the parsed fields below.
pub fn index_page(overlay: &InteractiveOverlay, parsed_json: &Value) -> String {
    let parsed = serde_json::to_string_pretty(parsed_json).unwrap_or_else(|_| parsed_json.to_string());
    let height = overlay.height_hint.round();

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Invoice Viewer</title>\n</head>\n<body>\n\
         <h1>Invoice PDF + Parsed JSON Viewer</h1>\n\
         <p><strong>OCR blocks (text + confidence)</strong></p>\n\
         <iframe src=\"{OCR_OVERLAY_FILE}\" style=\"width: 100%; border: 0;\" height=\"{height}\"></iframe>\n\
         <hr>\n\
         <p><strong>Parsed labels (parsed_json_ocr)</strong></p>\n\
         <iframe src=\"{PARSED_OVERLAY_FILE}\" style=\"width: 100%; border: 0;\" height=\"{height}\"></iframe>\n\
         <details>\n<summary>Parsed JSON</summary>\n<pre>{}</pre>\n</details>\n\
         </body>\n</html>\n",
        escape_text(&parsed)
    )
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, OcrviewError> {
    std::fs::write(&path, contents).context(IoWriteSnafu {
        path: path.to_string_lossy(),
    })?;
    Ok(path)
}

/// Writes the render into `output_dir` and returns the written files.
pub fn write_outputs(
    rendered: &Rendered,
    document: &NormalizedDocument,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, OcrviewError> {
    std::fs::create_dir_all(output_dir).context(IoWriteSnafu {
        path: output_dir.to_string_lossy(),
    })?;

    let written = match rendered {
        Rendered::Interactive(overlay) => vec![
            write_file(output_dir.join(OCR_OVERLAY_FILE), &overlay.ocr_html)?,
            write_file(output_dir.join(PARSED_OVERLAY_FILE), &overlay.parsed_html)?,
            write_file(
                output_dir.join(INDEX_FILE),
                &index_page(overlay, &document.parsed_json),
            )?,
        ],
        Rendered::Static(image) => {
            let path = output_dir.join(STATIC_OVERLAY_FILE);
            image.save(&path).context(ImageWriteSnafu {
                path: path.to_string_lossy(),
            })?;
            vec![path]
        }
    };

    for path in &written {
        info!("wrote {}", path.display());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::bbox::Bbox,
        layout::element::OcrBlock,
        parse::normalize::Normalized,
    };
    use image::Rgb;
    use serde_json::json;

    fn document(ocr: Vec<OcrBlock>, parsed: Vec<LabelBox>) -> NormalizedDocument {
        NormalizedDocument {
            parsed_json: json!({"invoice": "120FA05778"}),
            ocr: Normalized {
                boxes: ocr,
                ..Default::default()
            },
            parsed: Normalized {
                boxes: parsed,
                ..Default::default()
            },
        }
    }

    fn hello() -> OcrBlock {
        OcrBlock {
            bbox: Bbox::from_xyxy([10.0, 10.0, 50.0, 30.0]),
            text: "Hello".into(),
            confidence: Some(0.995),
        }
    }

    fn label(name: &str) -> LabelBox {
        LabelBox {
            bbox: Bbox::from_xyxy([5.0, 5.0, 60.0, 40.0]),
            label: name.into(),
        }
    }

    fn static_config() -> ViewerConfig {
        // a missing font only skips label text
        ViewerConfig {
            interactive: false,
            font_path: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_interactive_when_blocks_present() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let document = document(vec![hello()], vec![label("total"), label("date")]);

        let rendered = render(&document, &image, &ViewerConfig::default()).unwrap();
        let Rendered::Interactive(overlay) = rendered else {
            panic!("expected interactive overlay");
        };
        assert_eq!(overlay.parsed_html.matches("box parsed").count(), 2);
    }

    #[test]
    fn test_label_filter_and_toggle() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let document = document(vec![hello()], vec![label("total"), label("date")]);

        let config = ViewerConfig {
            label_filter: Some(["date".to_string()].into()),
            ..Default::default()
        };
        let Rendered::Interactive(overlay) = render(&document, &image, &config).unwrap() else {
            panic!("expected interactive overlay");
        };
        assert_eq!(overlay.parsed_html.matches("box parsed").count(), 1);
        assert!(overlay.parsed_html.contains(r#"data-label="date""#));

        let config = ViewerConfig {
            include_parsed: false,
            ..Default::default()
        };
        let Rendered::Interactive(overlay) = render(&document, &image, &config).unwrap() else {
            panic!("expected interactive overlay");
        };
        assert_eq!(overlay.parsed_html.matches("box parsed").count(), 0);
        assert!(overlay.parsed_html.contains("overlay-container"));
    }

    #[test]
    fn test_static_without_blocks() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let document = document(Vec::new(), vec![label("total")]);
        let config = ViewerConfig {
            font_path: None,
            ..Default::default()
        };

        let rendered = render(&document, &image, &config).unwrap();
        // parsed boxes are not drawn in the static image
        assert_eq!(rendered, Rendered::Static(image));
    }

    #[test]
    fn test_static_when_disabled() {
        let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let document = document(vec![hello()], Vec::new());

        let Rendered::Static(output) = render(&document, &image, &static_config()).unwrap() else {
            panic!("expected static image");
        };
        assert_eq!(*output.get_pixel(10, 10), Rgb([0, 128, 0]));
    }

    #[test]
    fn test_index_page_embeds_overlays() {
        let overlay = InteractiveOverlay {
            ocr_html: String::new(),
            parsed_html: String::new(),
            height_hint: 1120.0,
        };
        let page = index_page(&overlay, &json!({"note": "<b>"}));

        assert!(page.contains(r#"<iframe src="ocr_overlay.html" style="width: 100%; border: 0;" height="1120">"#));
        assert!(page.contains(r#"<iframe src="parsed_overlay.html""#));
        assert!(page.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        let document = document(vec![hello()], Vec::new());

        let rendered = render(&document, &image, &ViewerConfig::default()).unwrap();
        let written = write_outputs(&rendered, &document, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(dir.path().join(INDEX_FILE).exists());

        let rendered = render(&document, &image, &static_config()).unwrap();
        let written = write_outputs(&rendered, &document, &dir.path().join("static")).unwrap();
        assert_eq!(written, vec![dir.path().join("static").join(STATIC_OVERLAY_FILE)]);
        assert!(image::open(&written[0]).is_ok());
    }
}

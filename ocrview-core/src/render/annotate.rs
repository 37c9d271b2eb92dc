use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_text_mut},
    rect::Rect,
};
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    consts::*,
    error::*,
    layout::element::{OcrBlock, OverlayBox},
};

/// Loads the label font.
///
/// A configured `path` must load. Without one, the common system locations in
/// [`FONT_CANDIDATES`] are tried and `None` is returned if none of them works.
pub fn load_font(path: Option<&Path>) -> Result<Option<FontVec>, OcrviewError> {
    if let Some(path) = path {
        let path_str = path.to_string_lossy();
        let data = std::fs::read(path).context(IoReadSnafu { path: &*path_str })?;
        let font = FontVec::try_from_vec(data).context(FontSnafu { path: &*path_str })?;
        info!("loaded label font {path_str}");
        return Ok(Some(font));
    }

    for candidate in FONT_CANDIDATES {
        if let Ok(data) = std::fs::read(candidate)
            && let Ok(font) = FontVec::try_from_vec(data)
        {
            debug!("loaded label font {candidate}");
            return Ok(Some(font));
        }
    }

    warn!("no label font found, set {FONT_PATH_ENV_NAME} to draw block text");
    Ok(None)
}

/// Static label text, at most [`LABEL_MAX_CHARS`] characters on one line.
fn label_text(block: &OcrBlock) -> String {
    block
        .caption()
        .chars()
        .take(LABEL_MAX_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Inclusive pixel corners of `bbox`.
///
/// Corners are clamped to a margin wider than the stroke around the image, so
/// a clamped edge is still drawn outside the visible area.
fn outline_corners(bbox: &Bbox, image_width: u32, image_height: u32) -> (i32, i32, i32, i32) {
    let margin = i64::from(STROKE_WIDTH) + 1;
    let clamp = |value: f64, limit: u32| {
        (value as i64).clamp(-margin, i64::from(limit) + margin) as i32
    };

    (
        clamp(bbox.min.x, image_width),
        clamp(bbox.min.y, image_height),
        clamp(bbox.max.x, image_width),
        clamp(bbox.max.y, image_height),
    )
}

/// Draws OCR blocks onto a copy of `image`.
///
/// Each block gets a [`STROKE_WIDTH`] outline inside its box in the confidence
/// color, and its label just inside the top-left corner when a font is given.
pub fn annotate(image: &RgbImage, blocks: &[OcrBlock], font: Option<&FontVec>) -> RgbImage {
    let mut output_img = image.clone();
    let font_scale = PxScale::from(LABEL_FONT_SCALE);

    for block in blocks {
        let bbox = block.bbox();
        let (x, y, x2, y2) = outline_corners(&bbox, image.width(), image.height());
        let width = x2 - x + 1;
        let height = y2 - y + 1;

        let color = Rgb(block.color().rgb());

        for offset in 0..STROKE_WIDTH {
            let stroke_width = width - offset * 2;
            let stroke_height = height - offset * 2;
            if stroke_width <= 0 || stroke_height <= 0 {
                break;
            }

            let rect = Rect::at(x + offset, y + offset)
                .of_size(stroke_width as u32, stroke_height as u32);
            draw_hollow_rect_mut(&mut output_img, rect, color);
        }

        if let Some(font) = font {
            draw_text_mut(
                &mut output_img,
                color,
                (bbox.min.x as i32).saturating_add(LABEL_OFFSET),
                (bbox.min.y as i32).saturating_add(LABEL_OFFSET),
                font_scale,
                font,
                &label_text(block),
            );
        }
    }

    output_img
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn block(xyxy: [f64; 4], text: &str, confidence: Option<f64>) -> OcrBlock {
        OcrBlock {
            bbox: Bbox::from_xyxy(xyxy),
            text: text.into(),
            confidence,
        }
    }

    #[test]
    fn test_outline_is_two_pixels_inside() {
        let image = RgbImage::from_pixel(100, 100, WHITE);
        let output = annotate(&image, &[block([10.0, 10.0, 50.0, 30.0], "x", Some(0.995))], None);

        let green = Rgb([0, 128, 0]);
        assert_eq!(*output.get_pixel(10, 10), green);
        assert_eq!(*output.get_pixel(11, 11), green);
        assert_eq!(*output.get_pixel(50, 30), green);
        assert_eq!(*output.get_pixel(49, 29), green);
        assert_eq!(*output.get_pixel(12, 12), WHITE);
        assert_eq!(*output.get_pixel(9, 9), WHITE);
        assert_eq!(*output.get_pixel(51, 31), WHITE);
    }

    #[test]
    fn test_colors_follow_confidence() {
        let image = RgbImage::from_pixel(100, 100, WHITE);
        let blocks = [
            block([0.0, 0.0, 10.0, 10.0], "a", None),
            block([20.0, 0.0, 30.0, 10.0], "b", Some(0.985)),
            block([40.0, 0.0, 50.0, 10.0], "c", Some(0.96)),
            block([60.0, 0.0, 70.0, 10.0], "d", Some(0.2)),
        ];
        let output = annotate(&image, &blocks, None);

        assert_eq!(*output.get_pixel(0, 0), Rgb([0, 0, 255]));
        assert_eq!(*output.get_pixel(20, 0), Rgb([0, 255, 0]));
        assert_eq!(*output.get_pixel(40, 0), Rgb([255, 165, 0]));
        assert_eq!(*output.get_pixel(60, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_source_image_untouched() {
        let image = RgbImage::from_pixel(20, 20, WHITE);
        let _ = annotate(&image, &[block([2.0, 2.0, 8.0, 8.0], "x", None)], None);
        assert!(image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_degenerate_and_offscreen_boxes() {
        let image = RgbImage::from_pixel(20, 20, WHITE);
        let blocks = [
            block([5.0, 5.0, 5.0, 5.0], "dot", None),
            block([-10.0, -10.0, 40.0, 40.0], "huge", None),
            block([100.0, 100.0, 120.0, 120.0], "away", None),
        ];
        let output = annotate(&image, &blocks, None);
        assert_eq!(output.dimensions(), (20, 20));
        // the outline of "huge" lies fully outside the image
        assert_eq!(*output.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_huge_coordinates_do_not_overflow() {
        let image = RgbImage::from_pixel(20, 20, WHITE);
        let blocks = [
            block([0.0, 0.0, 3e9, 10.0], "wide", None),
            block([-3e9, -3e9, 5.0, 5.0], "far", None),
            block([0.0, 0.0, f64::MAX, f64::MAX], "max", None),
        ];
        let output = annotate(&image, &blocks, None);

        let blue = Rgb([0, 0, 255]);
        // the visible edges of "wide" are still drawn
        assert_eq!(*output.get_pixel(0, 0), blue);
        assert_eq!(*output.get_pixel(19, 10), blue);
        assert_eq!(*output.get_pixel(19, 9), blue);
        // the bottom-right corner of "far"
        assert_eq!(*output.get_pixel(5, 5), blue);
        assert_eq!(*output.get_pixel(5, 2), blue);
    }

    #[test]
    fn test_label_drawn_inside_box() {
        let Some(font) = load_font(None).unwrap() else {
            return;
        };
        let image = RgbImage::from_pixel(200, 100, WHITE);
        let blocks = [block([10.0, 10.0, 190.0, 60.0], "HELLO", Some(0.995))];

        let with_text = annotate(&image, &blocks, Some(&font));
        let without_text = annotate(&image, &blocks, None);

        // text starts at (x1 + 2, y1 + 2), inside the outline
        let near_origin = |img: &RgbImage| {
            (12..80)
                .flat_map(|x| (12..40).map(move |y| (x, y)))
                .filter(|&(x, y)| *img.get_pixel(x, y) != WHITE)
                .count()
        };
        assert_eq!(near_origin(&without_text), 0);
        assert!(near_origin(&with_text) > 0);

        let greenish = (12..80)
            .flat_map(|x| (12..40).map(move |y| (x, y)))
            .map(|(x, y)| *with_text.get_pixel(x, y))
            .any(|Rgb([r, g, b])| g > r && g > b);
        assert!(greenish);

        // nothing is drawn left of or above the label origin inside the box
        assert!((2..10).all(|x| *with_text.get_pixel(x, 30) == WHITE));
    }

    #[test]
    fn test_label_text_truncated() {
        let long = "x".repeat(300);
        let text = label_text(&block([0.0, 0.0, 1.0, 1.0], &long, Some(0.5)));
        assert_eq!(text.chars().count(), LABEL_MAX_CHARS);

        let text = label_text(&block([0.0, 0.0, 1.0, 1.0], "two\nlines", Some(0.5)));
        assert_eq!(text, "two lines (0.50)");
    }

    #[test]
    fn test_configured_font_path_loads() {
        let Some(candidate) = FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
        else {
            return;
        };
        assert!(load_font(Some(candidate)).unwrap().is_some());
    }

    #[test]
    fn test_missing_font_path_is_error() {
        let err = load_font(Some(Path::new("/definitely/not/a/font.ttf"))).unwrap_err();
        assert!(matches!(err, OcrviewError::IoRead { .. }));
    }
}

/// Confidence at or above which a block is drawn green.
pub const CONFIDENCE_GREEN: f64 = 0.99;

/// Confidence at or above which a block is drawn lime.
pub const CONFIDENCE_LIME: f64 = 0.98;

/// Confidence at or above which a block is drawn orange. Anything lower is red.
pub const CONFIDENCE_ORANGE: f64 = 0.95;

/// Width in pixels of the zoom thumbnail embedded in each hover box.
///
/// The height follows the crop's aspect ratio, rounded down, never below 1.
pub const THUMBNAIL_WIDTH: u32 = 240;

/// The embedding surface gets this multiple of the image height, leaving
/// room for the caption that sits above the top row of boxes.
pub const SURFACE_HEIGHT_RATIO: f64 = 1.12;

/// Outline width of the static fallback rectangles.
pub const STROKE_WIDTH: i32 = 2;

/// Offset of the static label from the box's top-left corner.
pub const LABEL_OFFSET: i32 = 2;

/// Static labels are cut to this many characters.
pub const LABEL_MAX_CHARS: usize = 120;

/// Pixel scale of the static label font.
pub const LABEL_FONT_SCALE: f32 = 12.0;

/// Only this page index is ever rendered.
pub const RENDERED_PAGE: i64 = 0;

/// Image extensions in lookup priority order.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// File names containing this marker are preferred as the state file.
pub const STATE_FILE_MARKER: &str = "with_full_state";

pub const DEFAULT_BASE_DIR: &str = "./processed_attachments";

pub const FONT_PATH_ENV_NAME: &str = "OCRVIEW_FONT_PATH";

/// Fonts tried in order when no font path is configured.
pub const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub const OCR_OVERLAY_FILE: &str = "ocr_overlay.html";
pub const PARSED_OVERLAY_FILE: &str = "parsed_overlay.html";
pub const INDEX_FILE: &str = "index.html";
pub const STATIC_OVERLAY_FILE: &str = "static_overlay.png";

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum OcrviewError {
    #[snafu(display("Image not found in `{}` (tried {})", folder, patterns))]
    ImageNotFound { folder: String, patterns: String },
    #[snafu(display("State file not found in `{}`", folder))]
    StateFileNotFound { folder: String },
    #[snafu(display("State file `{}` must contain {}", path, keys))]
    MissingKeys { path: String, keys: String },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Parse json `{}` error: {}", path, source))]
    JsonParse {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Image Open `{}` error: {}", path, source))]
    ImageOpen {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image Encode for `{}` error: {}", stage, source))]
    ImageEncode {
        source: image::ImageError,
        stage: String,
    },
    #[snafu(display("Image Write error: {}", source))]
    ImageWrite {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Load Font `{}` error: {}", path, source))]
    Font {
        source: ab_glyph::InvalidFont,
        path: String,
    },
}

pub mod analysis;
pub mod config;
pub mod consts;
pub mod error;
pub mod layout;
pub mod locate;
pub mod parse;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::OcrviewError;
pub use parse::{
    normalize::{NormalizedDocument, normalize},
    state::{DocumentState, load_state},
};
pub use pipeline::{LoadedDocument, Outcome, run};
pub use render::{Rendered, render};

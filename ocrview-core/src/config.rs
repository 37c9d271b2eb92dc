use std::{collections::BTreeSet, path::PathBuf};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Hover overlays instead of a flattened image.
    pub interactive: bool,
    /// Draw parsed-label boxes in the second overlay.
    pub include_parsed: bool,
    /// Only parsed boxes with one of these labels, all when `None`.
    pub label_filter: Option<BTreeSet<String>>,
    pub thumbnail_width: u32,
    /// Font for static labels, a system font is searched when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            include_parsed: true,
            label_filter: None,
            thumbnail_width: THUMBNAIL_WIDTH,
            font_path: std::env::var_os(FONT_PATH_ENV_NAME).map(PathBuf::from),
        }
    }
}

impl ViewerConfig {
    pub fn keeps_label(&self, label: &str) -> bool {
        self.label_filter
            .as_ref()
            .is_none_or(|labels| labels.contains(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert!(config.interactive);
        assert!(config.include_parsed);
        assert_eq!(config.thumbnail_width, 240);
        assert!(config.keeps_label("anything"));
    }

    #[test]
    fn test_label_filter() {
        let config = ViewerConfig {
            label_filter: Some(["total".to_string()].into()),
            ..Default::default()
        };
        assert!(config.keeps_label("total"));
        assert!(!config.keeps_label("consignee"));
    }
}

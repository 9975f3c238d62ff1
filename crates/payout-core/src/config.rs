//! Viewer configuration
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock layout.

use serde::{Deserialize, Serialize};

use crate::result_viewer::ViewMode;

/// Width, in CSS pixels, that pages are rendered at
pub const DEFAULT_PAGE_WIDTH: f64 = 400.0;

/// Left margin added per nesting level in the JSON tree
pub const DEFAULT_INDENT_PX: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub page_width: f64,
    pub indent_px: u32,
    pub initial_view_mode: ViewMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            indent_px: DEFAULT_INDENT_PX,
            initial_view_mode: ViewMode::Tree,
        }
    }
}

impl ViewerConfig {
    /// Parse from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_uses_defaults() {
        assert_eq!(ViewerConfig::from_json("").unwrap(), ViewerConfig::default());
        assert_eq!(
            ViewerConfig::from_json("{}").unwrap(),
            ViewerConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json(r#"{"indent_px": 12, "initial_view_mode": "raw"}"#)
            .unwrap();
        assert_eq!(config.indent_px, 12);
        assert_eq!(config.initial_view_mode, ViewMode::Raw);
        assert_eq!(config.page_width, DEFAULT_PAGE_WIDTH);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(ViewerConfig::from_json("{indent_px: 12").is_err());
    }
}

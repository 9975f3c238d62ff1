//! Result viewer state: the current analysis result and the view mode

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DEFAULT_INDENT_PX;
use crate::json_view::{render_raw_html, render_tree_html};
use crate::signature::{ServiceFailure, SignatureSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Recursively indented, syntax-highlighted tree
    #[default]
    Tree,
    /// Pretty-printed text dump
    Raw,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Tree => ViewMode::Raw,
            ViewMode::Raw => ViewMode::Tree,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Tree => "tree",
            ViewMode::Raw => "raw",
        }
    }

    /// Label for the button that switches away from this mode
    pub fn toggle_label(self) -> &'static str {
        match self {
            ViewMode::Tree => "Show Raw JSON",
            ViewMode::Raw => "Show Formatted Tree",
        }
    }
}

pub struct ResultViewer {
    value: Option<Value>,
    mode: ViewMode,
    indent_px: u32,
}

impl Default for ResultViewer {
    fn default() -> Self {
        Self::new(ViewMode::Tree, DEFAULT_INDENT_PX)
    }
}

impl ResultViewer {
    pub fn new(mode: ViewMode, indent_px: u32) -> Self {
        Self {
            value: None,
            mode,
            indent_px,
        }
    }

    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> ViewMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    pub fn signature_summary(&self) -> Option<SignatureSummary> {
        self.value.as_ref().and_then(SignatureSummary::find)
    }

    pub fn service_failure(&self) -> Option<ServiceFailure> {
        self.value.as_ref().and_then(ServiceFailure::find)
    }

    /// Banners followed by the body in the current mode; `None` with no value
    pub fn render_html(&self) -> Option<String> {
        let value = self.value.as_ref()?;

        let mut html = String::new();
        if let Some(failure) = ServiceFailure::find(value) {
            html.push_str(&failure.to_html());
        }
        if let Some(summary) = SignatureSummary::find(value) {
            html.push_str(&summary.to_html());
        }
        html.push_str(&match self.mode {
            ViewMode::Tree => render_tree_html(value, self.indent_px),
            ViewMode::Raw => render_raw_html(value),
        });
        Some(html)
    }
}

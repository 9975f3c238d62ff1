//! Page navigation state for the document viewer

use serde::Serialize;
use tracing::{debug, warn};

/// Shown in place of the page when the rendering engine rejects the file
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load PDF. Please try a different file.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    /// No document
    Empty,
    /// A document was handed to the renderer; page count not yet known
    Loading,
    Loaded { page: u32, total: u32 },
    Failed { message: String },
}

/// Current page within `[1, total]` once loaded; navigation is a no-op
/// before that and at either end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNavigator {
    state: PageState,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self {
            state: PageState::Empty,
        }
    }
}

impl PageNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// A new document is about to be loaded
    pub fn start_loading(&mut self) {
        self.state = PageState::Loading;
    }

    /// The renderer reported a page count; resets to page 1
    pub fn on_load_success(&mut self, total: u32) {
        if total == 0 {
            warn!("document reported zero pages");
            self.on_load_error("document has no pages");
            return;
        }
        debug!(total, "document loaded");
        self.state = PageState::Loaded { page: 1, total };
    }

    pub fn on_load_error(&mut self, reason: &str) {
        warn!(reason, "document failed to load");
        self.state = PageState::Failed {
            message: LOAD_FAILED_MESSAGE.to_string(),
        };
    }

    pub fn reset(&mut self) {
        self.state = PageState::Empty;
    }

    pub fn current_page(&self) -> Option<u32> {
        match self.state {
            PageState::Loaded { page, .. } => Some(page),
            _ => None,
        }
    }

    /// Total page count, 0 until loaded
    pub fn total_pages(&self) -> u32 {
        match self.state {
            PageState::Loaded { total, .. } => total,
            _ => 0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, PageState::Loaded { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            PageState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.state, PageState::Loaded { page, .. } if page > 1)
    }

    pub fn can_go_next(&self) -> bool {
        matches!(self.state, PageState::Loaded { page, total } if page < total)
    }

    /// Step back one page. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if let PageState::Loaded { page, .. } = &mut self.state {
            if *page > 1 {
                *page -= 1;
                return true;
            }
        }
        false
    }

    /// Step forward one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if let PageState::Loaded { page, total } = &mut self.state {
            if *page < *total {
                *page += 1;
                return true;
            }
        }
        false
    }

    /// "Page 2 of 5"; before load the current page reads as 1 and the
    /// total as 0, matching the disabled controls
    pub fn indicator(&self) -> String {
        let page = self.current_page().unwrap_or(1);
        format!("Page {} of {}", page, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_page_document_stops_at_last_page() {
        let mut nav = PageNavigator::new();
        nav.start_loading();
        nav.on_load_success(2);

        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.indicator(), "Page 2 of 2");
    }

    #[test]
    fn test_previous_at_first_page_is_noop() {
        let mut nav = PageNavigator::new();
        nav.on_load_success(3);
        assert!(!nav.previous());
        assert_eq!(nav.current_page(), Some(1));
        assert!(!nav.can_go_previous());
        assert!(nav.can_go_next());
    }

    #[test]
    fn test_navigation_disabled_before_load() {
        let mut nav = PageNavigator::new();
        nav.start_loading();
        assert!(!nav.next());
        assert!(!nav.previous());
        assert!(!nav.can_go_next());
        assert!(!nav.can_go_previous());
        assert_eq!(nav.indicator(), "Page 1 of 0");
    }

    #[test]
    fn test_new_document_resets_to_first_page() {
        let mut nav = PageNavigator::new();
        nav.on_load_success(5);
        for _ in 0..3 {
            nav.next();
        }
        assert_eq!(nav.current_page(), Some(4));

        nav.start_loading();
        nav.on_load_success(3);
        assert_eq!(nav.current_page(), Some(1));
    }

    #[test]
    fn test_load_error_replaces_page_display() {
        let mut nav = PageNavigator::new();
        nav.start_loading();
        nav.on_load_error("Invalid PDF structure");
        assert_eq!(nav.error(), Some(LOAD_FAILED_MESSAGE));
        assert!(!nav.is_loaded());
        assert!(!nav.next());
    }

    #[test]
    fn test_zero_pages_is_a_failure() {
        let mut nav = PageNavigator::new();
        nav.on_load_success(0);
        assert!(nav.error().is_some());
    }

    #[test]
    fn test_next_clamps_at_last_page() {
        let mut nav = PageNavigator::new();
        nav.on_load_success(4);
        for _ in 0..10 {
            nav.next();
        }
        assert_eq!(nav.current_page(), Some(4));
        assert!(!nav.can_go_next());
    }
}

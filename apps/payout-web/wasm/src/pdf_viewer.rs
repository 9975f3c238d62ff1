//! PDF.js integration for rendering the selected file one page at a time

use js_sys::Reflect;
use payout_core::{DocumentSource, PageNavigator};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{File, HtmlCanvasElement};

use crate::object_url::BrowserObjectUrls;

/// Worker script served next to the page
pub const DEFAULT_WORKER_SRC: &str = "/pdf.worker.min.js";

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> JsValue;

    #[wasm_bindgen(js_name = loadDocument)]
    async fn load_document_internal(url: &str) -> JsValue;

    #[wasm_bindgen(js_name = renderPage)]
    async fn render_page_internal(
        document: &JsValue,
        page_num: u32,
        canvas: &HtmlCanvasElement,
        width: f64,
    ) -> JsValue;

    #[wasm_bindgen(js_name = destroyDocument)]
    fn destroy_document_internal(document: &JsValue);
}

/// Initialize PDF.js; must run before the first document is loaded
#[wasm_bindgen]
pub async fn init_pdf_js(worker_src: Option<String>) -> Result<(), JsValue> {
    let worker_src = worker_src.unwrap_or_else(|| DEFAULT_WORKER_SRC.to_string());
    init_pdf_js_internal(&worker_src).await;
    Ok(())
}

/// Ask pdf.js to open `url`; resolves to `{ numPages }` or `{ error }`
pub async fn load_document(url: &str) -> JsValue {
    load_document_internal(url).await
}

/// Ticket for an in-progress load; stale tickets are discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub generation: u64,
    pub url: String,
}

/// Owns the object URL, the pdf.js document proxy and the page state
pub struct DocumentViewer {
    source: DocumentSource<BrowserObjectUrls>,
    navigator: PageNavigator,
    document: Option<JsValue>,
    generation: u64,
    page_width: f64,
}

impl DocumentViewer {
    pub fn new(page_width: f64) -> Self {
        Self {
            source: DocumentSource::new(BrowserObjectUrls),
            navigator: PageNavigator::new(),
            document: None,
            generation: 0,
            page_width,
        }
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut PageNavigator {
        &mut self.navigator
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in `file`: the previous URL and document are released first
    pub fn open(&mut self, file: &File) -> Result<PendingLoad, JsValue> {
        self.destroy_document();
        self.generation += 1;
        self.navigator.start_loading();

        match self.source.load(file) {
            Ok(url) => Ok(PendingLoad {
                generation: self.generation,
                url: url.to_string(),
            }),
            Err(err) => {
                self.navigator.on_load_error("could not create object url");
                Err(err)
            }
        }
    }

    /// Apply the bridge's answer for `pending`. Returns false when a newer
    /// file was opened in the meantime.
    pub fn finish_load(&mut self, pending: &PendingLoad, loaded: JsValue) -> bool {
        if pending.generation != self.generation {
            debug!(stale = pending.generation, current = self.generation, "discarding stale load");
            destroy_document_internal(&loaded);
            return false;
        }

        let num_pages = Reflect::get(&loaded, &JsValue::from_str("numPages"))
            .ok()
            .and_then(|v| v.as_f64());

        match page_count_from(num_pages) {
            Ok(total) => {
                self.navigator.on_load_success(total);
                self.document = Some(loaded);
            }
            Err(reason) => {
                let reason = Reflect::get(&loaded, &JsValue::from_str("error"))
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or(reason);
                self.navigator.on_load_error(&reason);
            }
        }
        true
    }

    /// Document proxy and page to draw, if a document is showing
    pub fn render_target(&self) -> Option<(JsValue, u32, f64)> {
        let document = self.document.clone()?;
        let page = self.navigator.current_page()?;
        Some((document, page, self.page_width))
    }

    /// Release everything held for the current file
    pub fn close(&mut self) {
        self.destroy_document();
        self.generation += 1;
        self.source.clear();
        self.navigator.reset();
    }

    fn destroy_document(&mut self) {
        if let Some(document) = self.document.take() {
            destroy_document_internal(&document);
        }
    }
}

impl Drop for DocumentViewer {
    fn drop(&mut self) {
        self.destroy_document();
    }
}

/// Draw `page_num` of `document` into `canvas`
pub async fn render_page(
    document: &JsValue,
    page_num: u32,
    canvas: &HtmlCanvasElement,
    width: f64,
) -> Result<(), JsValue> {
    let rendered = render_page_internal(document, page_num, canvas, width).await;
    if let Ok(error) = Reflect::get(&rendered, &JsValue::from_str("error")) {
        if let Some(message) = error.as_string() {
            warn!(page_num, %message, "page render failed");
            return Err(JsValue::from_str(&message));
        }
    }
    Ok(())
}

/// Blank `canvas` so no stale page stays on screen
pub fn clear_canvas(canvas: &HtmlCanvasElement) {
    canvas.set_width(0);
    canvas.set_height(0);
}

/// Keeps page draws on one canvas from overlapping.
///
/// pdf.js rejects a render while another is running on the same canvas, so
/// requests made mid-draw collapse into a single redraw of whatever page is
/// current once the running draw ends.
#[derive(Debug, Default)]
pub struct RenderQueue {
    drawing: bool,
    redraw: bool,
}

impl RenderQueue {
    /// True when the caller should start drawing now
    pub fn request(&mut self) -> bool {
        if self.drawing {
            self.redraw = true;
            false
        } else {
            self.drawing = true;
            true
        }
    }

    /// A draw ended. True when another one was requested meanwhile and the
    /// caller should draw again.
    pub fn finish(&mut self) -> bool {
        if self.redraw {
            self.redraw = false;
            true
        } else {
            self.drawing = false;
            false
        }
    }
}

/// Validate the page count reported by pdf.js
fn page_count_from(num_pages: Option<f64>) -> Result<u32, String> {
    match num_pages {
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        Some(n) => Err(format!("invalid page count: {}", n)),
        None => Err("renderer did not report a page count".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_from_valid() {
        assert_eq!(page_count_from(Some(2.0)), Ok(2));
        assert_eq!(page_count_from(Some(1.0)), Ok(1));
    }

    #[test]
    fn test_page_count_from_invalid() {
        assert!(page_count_from(Some(0.0)).is_err());
        assert!(page_count_from(Some(2.5)).is_err());
        assert!(page_count_from(Some(-1.0)).is_err());
        assert!(page_count_from(None).is_err());
    }

    #[test]
    fn test_requests_during_a_draw_collapse_into_one_redraw() {
        let mut queue = RenderQueue::default();
        assert!(queue.request());
        assert!(!queue.request());
        assert!(!queue.request());

        // one redraw, then the canvas is free again
        assert!(queue.finish());
        assert!(!queue.request());
        assert!(queue.finish());
        assert!(!queue.finish());
        assert!(queue.request());
    }

    #[test]
    fn test_idle_queue_draws_immediately() {
        let mut queue = RenderQueue::default();
        assert!(queue.request());
        assert!(!queue.finish());
        assert!(queue.request());
    }
}

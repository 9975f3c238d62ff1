//! Stateful app object exported to JavaScript
//!
//! All page state lives here. JavaScript forwards DOM events and then
//! re-renders from [`PayoutApp::view`]; it never inspects the analysis
//! result itself.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Promise, Uint8Array};
use payout_core::{
    describe, ActionOutcome, ControllerView, Endpoint, PageNavigator, ResultViewer, SelectedFile,
    UploadController, ViewerConfig,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{File, HtmlCanvasElement};

use crate::api::FetchClient;
use crate::pdf_viewer::{self, DocumentViewer, RenderQueue};

/// Last known reachability of the extraction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Checking,
    Online,
    Offline,
}

impl ServiceStatus {
    fn label(self) -> &'static str {
        match self {
            ServiceStatus::Checking => Endpoint::Health.busy_label(),
            _ => Endpoint::Health.idle_label(),
        }
    }

    fn hint(self) -> Option<String> {
        match self {
            ServiceStatus::Offline => Some(Endpoint::Health.failure_message().to_string()),
            _ => None,
        }
    }
}

struct AppState {
    controller: RefCell<UploadController<File>>,
    viewer: RefCell<DocumentViewer>,
    results: RefCell<ResultViewer>,
    file_summary: RefCell<Option<String>>,
    render_queue: RefCell<RenderQueue>,
    service: RefCell<ServiceStatus>,
    client: FetchClient,
}

/// Everything the page renders, in one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppView {
    #[serde(flatten)]
    pub controller: ControllerView,
    pub file_summary: Option<String>,
    pub page_indicator: Option<String>,
    pub can_previous: bool,
    pub can_next: bool,
    pub page_loaded: bool,
    pub page_error: Option<String>,
    pub view_mode: String,
    pub toggle_label: String,
    pub result_html: Option<String>,
    pub service_label: String,
    pub service_checking: bool,
    pub service_hint: Option<String>,
}

impl AppView {
    pub fn assemble(
        controller: ControllerView,
        navigator: &PageNavigator,
        results: &ResultViewer,
        file_summary: Option<String>,
        service: ServiceStatus,
    ) -> Self {
        let page_loaded = navigator.is_loaded();
        Self {
            controller,
            file_summary,
            page_indicator: page_loaded.then(|| navigator.indicator()),
            can_previous: navigator.can_go_previous(),
            can_next: navigator.can_go_next(),
            page_loaded,
            page_error: navigator.error().map(str::to_string),
            view_mode: results.mode().as_str().to_string(),
            toggle_label: results.mode().toggle_label().to_string(),
            result_html: results.render_html(),
            service_label: service.label().to_string(),
            service_checking: service == ServiceStatus::Checking,
            service_hint: service.hint(),
        }
    }
}

#[wasm_bindgen]
pub struct PayoutApp {
    state: Rc<AppState>,
}

#[wasm_bindgen]
impl PayoutApp {
    /// Create the app. `config_json` is an optional `ViewerConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PayoutApp, JsValue> {
        let config = match config_json {
            Some(json) => ViewerConfig::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?,
            None => ViewerConfig::default(),
        };
        debug!(?config, "creating app");

        let state = AppState {
            controller: RefCell::new(UploadController::new()),
            viewer: RefCell::new(DocumentViewer::new(config.page_width)),
            results: RefCell::new(ResultViewer::new(config.initial_view_mode, config.indent_px)),
            file_summary: RefCell::new(None),
            render_queue: RefCell::new(RenderQueue::default()),
            service: RefCell::new(ServiceStatus::Unknown),
            client: FetchClient::new(),
        };
        Ok(PayoutApp {
            state: Rc::new(state),
        })
    }

    /// Select `file`, clear the previous result and start loading it into
    /// the viewer. Resolves to the view once the document has loaded.
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file: File) -> Result<Promise, JsValue> {
        let state = Rc::clone(&self.state);
        let name = file.name();
        let size = file.size().max(0.0) as u64;

        state
            .controller
            .borrow_mut()
            .select_file(SelectedFile::new(name.clone(), size, file.clone()));
        state.results.borrow_mut().set_value(None);
        *state.file_summary.borrow_mut() = None;
        let pending = state.viewer.borrow_mut().open(&file)?;

        Ok(future_to_promise(async move {
            let loaded = pdf_viewer::load_document(&pending.url).await;
            if !state.viewer.borrow_mut().finish_load(&pending, loaded) {
                return state.view_js();
            }

            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let bytes = Uint8Array::new(&buffer).to_vec();
                    if state.viewer.borrow().generation() == pending.generation {
                        *state.file_summary.borrow_mut() = Some(describe(&name, &bytes));
                    }
                }
                Err(err) => warn!(error = ?err, "could not read file bytes"),
            }

            state.view_js()
        }))
    }

    /// POST the selected file to the analysis endpoint
    pub fn analyze(&self) -> Promise {
        self.dispatch(Endpoint::AnalyzePdf)
    }

    /// POST the selected file to the debug extraction endpoint
    #[wasm_bindgen(js_name = debugExtract)]
    pub fn debug_extract(&self) -> Promise {
        self.dispatch(Endpoint::DebugExtract)
    }

    /// Draw the current page into `canvas`, or blank it when no document
    /// is showing. Calls made while a draw is running are folded into one
    /// redraw of the page that is current when it ends; never rejects.
    #[wasm_bindgen(js_name = renderPage)]
    pub fn render_page(&self, canvas: HtmlCanvasElement) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            if !state.render_queue.borrow_mut().request() {
                return Ok(JsValue::UNDEFINED);
            }
            loop {
                let target = state.viewer.borrow().render_target();
                match target {
                    Some((document, page, width)) => {
                        if let Err(err) =
                            pdf_viewer::render_page(&document, page, &canvas, width).await
                        {
                            warn!(page, error = ?err, "page draw failed");
                        }
                    }
                    None => pdf_viewer::clear_canvas(&canvas),
                }
                if !state.render_queue.borrow_mut().finish() {
                    break;
                }
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> bool {
        self.state.viewer.borrow_mut().navigator_mut().next()
    }

    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&self) -> bool {
        self.state.viewer.borrow_mut().navigator_mut().previous()
    }

    /// Switch between tree and raw display; returns the new mode
    #[wasm_bindgen(js_name = toggleViewMode)]
    pub fn toggle_view_mode(&self) -> String {
        self.state.results.borrow_mut().toggle_mode().as_str().to_string()
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        self.state.view_js()
    }

    /// Resolves to `true` when the extraction service is reachable
    #[wasm_bindgen(js_name = checkService)]
    pub fn check_service(&self) -> Promise {
        let state = Rc::clone(&self.state);
        *state.service.borrow_mut() = ServiceStatus::Checking;
        future_to_promise(async move {
            let healthy = state.client.check_health().await;
            info!(healthy, "service health check");
            *state.service.borrow_mut() = if healthy {
                ServiceStatus::Online
            } else {
                ServiceStatus::Offline
            };
            Ok(JsValue::from_bool(healthy))
        })
    }

    /// Release the object URL and the loaded document
    #[wasm_bindgen(js_name = closeDocument)]
    pub fn close_document(&self) {
        self.state.viewer.borrow_mut().close();
        *self.state.file_summary.borrow_mut() = None;
    }
}

impl PayoutApp {
    fn dispatch(&self, endpoint: Endpoint) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let outcome =
                payout_core::run_action(&state.controller, &state.client, endpoint).await;

            let result = state.controller.borrow().result().cloned();
            state.results.borrow_mut().set_value(result);

            match outcome {
                ActionOutcome::Failed(notification) => {
                    if let Some(window) = web_sys::window() {
                        window.alert_with_message(&notification.message)?;
                    }
                }
                ActionOutcome::Skipped => debug!(%endpoint, "no file selected"),
                ActionOutcome::Completed => {}
            }

            state.view_js()
        })
    }
}

impl AppState {
    fn view(&self) -> AppView {
        let viewer = self.viewer.borrow();
        AppView::assemble(
            self.controller.borrow().view(),
            viewer.navigator(),
            &self.results.borrow(),
            self.file_summary.borrow().clone(),
            *self.service.borrow(),
        )
    }

    fn view_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.view())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn empty_controller_view() -> ControllerView {
        UploadController::<()>::new().view()
    }

    #[test]
    fn test_initial_view() {
        let view = AppView::assemble(
            empty_controller_view(),
            &PageNavigator::new(),
            &ResultViewer::default(),
            None,
            ServiceStatus::Unknown,
        );

        assert!(!view.controller.show_actions);
        assert_eq!(view.page_indicator, None);
        assert!(!view.can_previous);
        assert!(!view.can_next);
        assert_eq!(view.view_mode, "tree");
        assert_eq!(view.toggle_label, "Show Raw JSON");
        assert_eq!(view.result_html, None);
    }

    #[test]
    fn test_loaded_document_view() {
        let mut navigator = PageNavigator::new();
        navigator.start_loading();
        navigator.on_load_success(2);
        navigator.next();

        let view = AppView::assemble(
            empty_controller_view(),
            &navigator,
            &ResultViewer::default(),
            Some("contract.pdf · 2 pages · 1.5 KB".to_string()),
            ServiceStatus::Online,
        );

        assert_eq!(view.page_indicator.as_deref(), Some("Page 2 of 2"));
        assert!(view.can_previous);
        assert!(!view.can_next);
        assert!(view.page_loaded);
    }

    #[test]
    fn test_failed_load_reports_error() {
        let mut navigator = PageNavigator::new();
        navigator.start_loading();
        navigator.on_load_error("bad xref");

        let view = AppView::assemble(
            empty_controller_view(),
            &navigator,
            &ResultViewer::default(),
            None,
            ServiceStatus::Unknown,
        );

        assert!(view.page_error.is_some());
        assert_eq!(view.page_indicator, None);
    }

    #[test]
    fn test_page_hidden_while_next_file_loads() {
        let mut navigator = PageNavigator::new();
        navigator.on_load_success(3);
        navigator.start_loading();

        let view = AppView::assemble(
            empty_controller_view(),
            &navigator,
            &ResultViewer::default(),
            None,
            ServiceStatus::Unknown,
        );

        assert!(!view.page_loaded);
        assert_eq!(view.page_indicator, None);
        assert_eq!(view.page_error, None);
    }

    #[test]
    fn test_service_status_in_view() {
        let view = |service| {
            AppView::assemble(
                empty_controller_view(),
                &PageNavigator::new(),
                &ResultViewer::default(),
                None,
                service,
            )
        };

        let idle = view(ServiceStatus::Unknown);
        assert_eq!(idle.service_label, "Check Service");
        assert!(!idle.service_checking);
        assert_eq!(idle.service_hint, None);

        let checking = view(ServiceStatus::Checking);
        assert_eq!(checking.service_label, "Checking...");
        assert!(checking.service_checking);

        let offline = view(ServiceStatus::Offline);
        assert_eq!(offline.service_label, "Check Service");
        assert_eq!(
            offline.service_hint.as_deref(),
            Some("Extraction service is not reachable.")
        );
        assert_eq!(view(ServiceStatus::Online).service_hint, None);
    }

    #[test]
    fn test_view_serializes_flat() {
        let mut results = ResultViewer::default();
        results.set_value(Some(json!({"data": {"page_count": 1}})));
        let view = AppView::assemble(
            empty_controller_view(),
            &PageNavigator::new(),
            &results,
            None,
            ServiceStatus::Unknown,
        );

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["show_actions"], json!(false));
        assert_eq!(value["analyze_label"], json!("Analyze PDF Structure"));
        assert!(value["result_html"].as_str().unwrap().contains("json-display"));
    }
}

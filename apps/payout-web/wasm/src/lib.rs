//! WASM bindings for the Payout Process PDF viewer
//!
//! State, rendering and request orchestration live in Rust; JavaScript only
//! wires DOM events to [`PayoutApp`] and writes its view back into the page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PayoutApp, init_pdf_js } from './pkg/payout_wasm.js';
//!
//! await init();
//! await init_pdf_js();
//!
//! const app = new PayoutApp();
//! render(await app.selectFile(input.files[0]));
//! await app.renderPage(canvas);
//! render(await app.analyze());
//! ```

pub mod api;
pub mod app;
pub mod logging;
pub mod object_url;
pub mod pdf_viewer;

use wasm_bindgen::prelude::*;

pub use api::FetchClient;
pub use app::{AppView, PayoutApp};
pub use object_url::BrowserObjectUrls;
pub use pdf_viewer::{init_pdf_js, DocumentViewer};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(debug_assertions)]
    logging::init(tracing::Level::DEBUG);
    #[cfg(not(debug_assertions))]
    logging::init(tracing::Level::INFO);
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// One-line description of a PDF (`name · N pages · size`) without opening
/// it in the viewer
#[wasm_bindgen]
pub fn describe_pdf(name: &str, bytes: &[u8]) -> String {
    payout_core::describe(name, bytes)
}

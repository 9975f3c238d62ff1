//! `URL.createObjectURL` / `URL.revokeObjectURL` for selected files

use payout_core::ObjectUrlProvider;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{File, Url};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserObjectUrls;

impl ObjectUrlProvider for BrowserObjectUrls {
    type Blob = File;
    type Error = JsValue;

    fn create(&self, blob: &File) -> Result<String, JsValue> {
        Url::create_object_url_with_blob(blob)
    }

    fn revoke(&self, url: &str) {
        if let Err(err) = Url::revoke_object_url(url) {
            warn!(url, error = ?err, "failed to revoke object url");
        }
    }
}

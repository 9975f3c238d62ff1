//! `fetch` transport for the extraction service

use payout_core::{AnalysisClient, AnalysisError, Endpoint, SelectedFile, UPLOAD_FIELD};
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// Multipart uploads via `window.fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    pub fn new() -> Self {
        Self
    }

    /// True when the health endpoint answers with a 2xx status
    pub async fn check_health(&self) -> bool {
        match self.send(Endpoint::Health, None).await {
            Ok(response) => response.ok(),
            Err(_) => false,
        }
    }

    async fn send(&self, endpoint: Endpoint, file: Option<&File>) -> Result<Response, AnalysisError> {
        let window = web_sys::window().ok_or_else(|| transport("No window"))?;

        let opts = RequestInit::new();
        opts.set_method(endpoint.method());
        opts.set_mode(RequestMode::Cors);

        if let Some(file) = file {
            let form = FormData::new().map_err(js_transport)?;
            form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
                .map_err(js_transport)?;
            opts.set_body(&form);
        }

        let request = Request::new_with_str_and_init(&endpoint.url(), &opts).map_err(js_transport)?;

        debug!(%endpoint, "sending request");
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_transport)?;
        response.dyn_into::<Response>().map_err(js_transport)
    }
}

impl AnalysisClient<File> for FetchClient {
    async fn upload(
        &self,
        endpoint: Endpoint,
        file: &SelectedFile<File>,
    ) -> Result<Value, AnalysisError> {
        let response = self.send(endpoint, Some(&file.handle)).await?;

        if !response.ok() {
            return Err(AnalysisError::HttpStatus {
                endpoint,
                status: response.status(),
            });
        }

        let text = JsFuture::from(response.text().map_err(js_transport)?)
            .await
            .map_err(js_transport)?
            .as_string()
            .unwrap_or_default();

        serde_json::from_str(&text).map_err(|e| AnalysisError::InvalidJson(e.to_string()))
    }
}

fn transport(message: &str) -> AnalysisError {
    AnalysisError::Transport(message.to_string())
}

fn js_transport(err: JsValue) -> AnalysisError {
    AnalysisError::Transport(describe_js_error(&err))
}

/// Best-effort text for a thrown JS value
pub fn describe_js_error(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", err)
}

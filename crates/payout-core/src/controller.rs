//! Upload/orchestration controller
//!
//! Holds the selected file, the last analysis result and the in-flight flag.
//! The controller never performs I/O itself: a request is split into
//! [`UploadController::begin`] and [`UploadController::complete`] so the
//! caller can await the network without holding a borrow on the state.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::endpoint::Endpoint;
use crate::error::AnalysisError;

/// A file picked by the user. `F` is the platform handle (a browser `File`).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile<F> {
    pub name: String,
    pub size: u64,
    pub handle: F,
}

impl<F> SelectedFile<F> {
    pub fn new(name: impl Into<String>, size: u64, handle: F) -> Self {
        Self {
            name: name.into(),
            size,
            handle,
        }
    }
}

/// Issued by [`UploadController::begin`]; hand it back to `complete`.
#[derive(Debug, Clone)]
pub struct RequestTicket<F> {
    pub endpoint: Endpoint,
    pub sequence: u64,
    pub file: SelectedFile<F>,
}

/// User-visible failure report, shown as a blocking alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub endpoint: Endpoint,
    pub message: String,
    pub detail: String,
}

/// What happened to a dispatched action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The response became the new analysis result
    Completed,
    /// The request failed; the notification should be surfaced
    Failed(Notification),
    /// Nothing was sent because no file is selected
    Skipped,
}

/// Transport used by [`run_action`] to reach the extraction service
#[allow(async_fn_in_trait)]
pub trait AnalysisClient<F> {
    async fn upload(
        &self,
        endpoint: Endpoint,
        file: &SelectedFile<F>,
    ) -> Result<Value, AnalysisError>;
}

pub struct UploadController<F> {
    file: Option<SelectedFile<F>>,
    result: Option<Value>,
    busy: Option<Endpoint>,
    issued: u64,
}

impl<F> Default for UploadController<F> {
    fn default() -> Self {
        Self {
            file: None,
            result: None,
            busy: None,
            issued: 0,
        }
    }
}

impl<F: Clone> UploadController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected file and drop any previous result
    pub fn select_file(&mut self, file: SelectedFile<F>) {
        debug!(name = %file.name, size = file.size, "file selected");
        self.file = Some(file);
        self.result = None;
    }

    pub fn selected_file(&self) -> Option<&SelectedFile<F>> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    pub fn busy_endpoint(&self) -> Option<Endpoint> {
        self.busy
    }

    /// Start a request against `endpoint` for the selected file.
    ///
    /// Being busy does not block a new request; the UI disables the triggers
    /// instead, and whichever response arrives last wins.
    pub fn begin(&mut self, endpoint: Endpoint) -> Result<RequestTicket<F>, AnalysisError> {
        let file = self.file.clone().ok_or(AnalysisError::NoFileSelected)?;

        self.issued += 1;
        self.busy = Some(endpoint);
        debug!(%endpoint, sequence = self.issued, file = %file.name, "request started");

        Ok(RequestTicket {
            endpoint,
            sequence: self.issued,
            file,
        })
    }

    /// Apply the outcome of a request started with [`begin`](Self::begin).
    ///
    /// Returns a notification when the request failed. On failure the result
    /// is cleared but the selected file is kept so the user can retry.
    pub fn complete(
        &mut self,
        ticket: RequestTicket<F>,
        outcome: Result<Value, AnalysisError>,
    ) -> Option<Notification> {
        self.busy = None;

        if ticket.sequence < self.issued {
            warn!(
                endpoint = %ticket.endpoint,
                sequence = ticket.sequence,
                latest = self.issued,
                "response for an older request arrived after a newer one was issued"
            );
        }

        match outcome {
            Ok(value) => {
                debug!(endpoint = %ticket.endpoint, sequence = ticket.sequence, "request completed");
                self.result = Some(value);
                None
            }
            Err(err) => {
                error!(endpoint = %ticket.endpoint, error = %err, "request failed");
                self.result = None;
                Some(Notification {
                    endpoint: ticket.endpoint,
                    message: ticket.endpoint.failure_message().to_string(),
                    detail: err.to_string(),
                })
            }
        }
    }

    /// Snapshot of everything the upload section and placeholders need
    pub fn view(&self) -> ControllerView {
        let busy = self.is_busy();
        let label = |endpoint: Endpoint| {
            if busy {
                endpoint.busy_label()
            } else {
                endpoint.idle_label()
            }
        };

        let viewer_placeholder = match self.file {
            Some(_) => None,
            None => Some(VIEWER_PLACEHOLDER.to_string()),
        };
        let result_placeholder = match (&self.result, &self.file) {
            (Some(_), _) => None,
            (None, Some(_)) => Some(RESULT_PLACEHOLDER_READY.to_string()),
            (None, None) => Some(RESULT_PLACEHOLDER_EMPTY.to_string()),
        };

        ControllerView {
            file_name: self.file.as_ref().map(|f| f.name.clone()),
            show_actions: self.file.is_some(),
            actions_disabled: busy,
            analyze_label: label(Endpoint::AnalyzePdf).to_string(),
            debug_label: label(Endpoint::DebugExtract).to_string(),
            viewer_placeholder,
            result_placeholder,
        }
    }
}

pub const VIEWER_PLACEHOLDER: &str = "Select a PDF file to view";
pub const RESULT_PLACEHOLDER_EMPTY: &str = "Upload a PDF first";
pub const RESULT_PLACEHOLDER_READY: &str = "Click \"Analyze PDF Structure\" to extract data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerView {
    pub file_name: Option<String>,
    pub show_actions: bool,
    pub actions_disabled: bool,
    pub analyze_label: String,
    pub debug_label: String,
    pub viewer_placeholder: Option<String>,
    pub result_placeholder: Option<String>,
}

/// Run one action end to end: begin, upload, complete.
///
/// The `RefCell` is only borrowed around `begin` and `complete`, never across
/// the upload, so callers may inspect the busy state while it runs.
pub async fn run_action<F, C>(
    controller: &RefCell<UploadController<F>>,
    client: &C,
    endpoint: Endpoint,
) -> ActionOutcome
where
    F: Clone,
    C: AnalysisClient<F>,
{
    let ticket = match controller.borrow_mut().begin(endpoint) {
        Ok(ticket) => ticket,
        Err(_) => return ActionOutcome::Skipped,
    };

    let outcome = client.upload(endpoint, &ticket.file).await;

    match controller.borrow_mut().complete(ticket, outcome) {
        Some(notification) => ActionOutcome::Failed(notification),
        None => ActionOutcome::Completed,
    }
}

pub async fn analyze<F: Clone, C: AnalysisClient<F>>(
    controller: &RefCell<UploadController<F>>,
    client: &C,
) -> ActionOutcome {
    run_action(controller, client, Endpoint::AnalyzePdf).await
}

pub async fn debug_extract<F: Clone, C: AnalysisClient<F>>(
    controller: &RefCell<UploadController<F>>,
    client: &C,
) -> ActionOutcome {
    run_action(controller, client, Endpoint::DebugExtract).await
}

//! Payout Process viewer core
//!
//! Platform-independent state and rendering for the PDF upload/analysis
//! page. The browser bindings in `payout-wasm` supply the file handles,
//! object URLs, HTTP transport and DOM; everything here runs and is tested
//! on the native target.
//!
//! - [`controller`]: selected file, analysis result, in-flight flag
//! - [`navigation`]: page state for the document viewer
//! - [`document`]: object-URL lifetime for the document viewer
//! - [`json_view`] / [`result_viewer`] / [`signature`]: result rendering
//! - [`document_info`]: pre-flight PDF inspection

pub mod config;
pub mod controller;
pub mod document;
pub mod document_info;
pub mod endpoint;
pub mod error;
pub mod json_view;
pub mod navigation;
pub mod result_viewer;
pub mod signature;

pub use config::ViewerConfig;
pub use controller::{
    analyze, debug_extract, run_action, ActionOutcome, AnalysisClient, ControllerView,
    Notification, RequestTicket, SelectedFile, UploadController,
};
pub use document::{DocumentSource, ObjectUrlProvider, ScopedObjectUrl};
pub use document_info::{describe, format_bytes, inspect, DocumentInfo};
pub use endpoint::{Endpoint, API_BASE, UPLOAD_FIELD};
pub use error::{AnalysisError, DocumentInfoError};
pub use navigation::{PageNavigator, PageState};
pub use result_viewer::{ResultViewer, ViewMode};
pub use signature::{BannerKind, ServiceFailure, SignatureSummary};

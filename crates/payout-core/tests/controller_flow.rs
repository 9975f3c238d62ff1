//! End-to-end controller tests against a scripted transport

use std::cell::RefCell;
use std::collections::VecDeque;

use payout_core::{
    analyze, debug_extract, ActionOutcome, AnalysisClient, AnalysisError, Endpoint,
    ResultViewer, SelectedFile, SignatureSummary, UploadController,
};
use serde_json::{json, Value};

#[derive(Default)]
struct ScriptedClient {
    responses: RefCell<VecDeque<Result<Value, AnalysisError>>>,
    calls: RefCell<Vec<(Endpoint, String)>>,
}

impl ScriptedClient {
    fn with(responses: Vec<Result<Value, AnalysisError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl AnalysisClient<Vec<u8>> for ScriptedClient {
    async fn upload(
        &self,
        endpoint: Endpoint,
        file: &SelectedFile<Vec<u8>>,
    ) -> Result<Value, AnalysisError> {
        self.calls.borrow_mut().push((endpoint, file.name.clone()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AnalysisError::Transport("no scripted response".into())))
    }
}

/// Observes the controller while the request is in flight
struct ObservingClient<'a> {
    controller: &'a RefCell<UploadController<Vec<u8>>>,
    saw_busy: RefCell<Option<bool>>,
}

impl AnalysisClient<Vec<u8>> for ObservingClient<'_> {
    async fn upload(
        &self,
        _endpoint: Endpoint,
        _file: &SelectedFile<Vec<u8>>,
    ) -> Result<Value, AnalysisError> {
        let busy = self.controller.borrow().view().actions_disabled;
        *self.saw_busy.borrow_mut() = Some(busy);
        Ok(json!({"success": true}))
    }
}

fn pdf(name: &str) -> SelectedFile<Vec<u8>> {
    let bytes = b"%PDF-1.7\n".to_vec();
    SelectedFile::new(name, bytes.len() as u64, bytes)
}

#[test]
fn analyze_success_becomes_result() {
    let controller = RefCell::new(UploadController::new());
    controller.borrow_mut().select_file(pdf("statement.pdf"));

    let client = ScriptedClient::with(vec![Ok(json!({"data": {"page_count": 2}}))]);
    let outcome = tokio_test::block_on(analyze(&controller, &client));

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        controller.borrow().result(),
        Some(&json!({"data": {"page_count": 2}}))
    );
    assert_eq!(
        client.calls.borrow().as_slice(),
        &[(Endpoint::AnalyzePdf, "statement.pdf".to_string())]
    );
}

#[test]
fn debug_extract_uses_its_own_endpoint() {
    let controller = RefCell::new(UploadController::new());
    controller.borrow_mut().select_file(pdf("a.pdf"));

    let client = ScriptedClient::with(vec![Ok(json!({"data": {"extracted_text": "--- Page 1 ---"}}))]);
    tokio_test::block_on(debug_extract(&controller, &client));

    assert_eq!(client.calls.borrow()[0].0, Endpoint::DebugExtract);
}

#[test]
fn non_success_status_notifies_and_keeps_file() {
    for endpoint in [Endpoint::AnalyzePdf, Endpoint::DebugExtract] {
        let controller = RefCell::new(UploadController::new());
        controller.borrow_mut().select_file(pdf("keep-me.pdf"));

        let client = ScriptedClient::with(vec![
            Ok(json!({"first": true})),
            Err(AnalysisError::HttpStatus {
                endpoint,
                status: 502,
            }),
        ]);
        tokio_test::block_on(payout_core::run_action(&controller, &client, endpoint));
        let outcome = tokio_test::block_on(payout_core::run_action(&controller, &client, endpoint));

        match outcome {
            ActionOutcome::Failed(notification) => {
                assert_eq!(notification.endpoint, endpoint);
                assert_eq!(notification.message, endpoint.failure_message());
            }
            other => panic!("expected failure, got {:?}", other),
        }

        let state = controller.borrow();
        assert!(state.result().is_none());
        assert!(!state.is_busy());
        assert_eq!(state.selected_file().unwrap().name, "keep-me.pdf");
    }
}

#[test]
fn action_without_file_sends_nothing() {
    let controller: RefCell<UploadController<Vec<u8>>> = RefCell::new(UploadController::new());
    let client = ScriptedClient::default();

    let outcome = tokio_test::block_on(analyze(&controller, &client));

    assert_eq!(outcome, ActionOutcome::Skipped);
    assert!(client.calls.borrow().is_empty());
}

#[test]
fn controller_is_readable_while_request_in_flight() {
    let controller = RefCell::new(UploadController::new());
    controller.borrow_mut().select_file(pdf("a.pdf"));

    let client = ObservingClient {
        controller: &controller,
        saw_busy: RefCell::new(None),
    };
    tokio_test::block_on(analyze(&controller, &client));

    assert_eq!(*client.saw_busy.borrow(), Some(true));
    assert!(!controller.borrow().is_busy());
}

#[test]
fn selecting_new_file_clears_displayed_result() {
    let controller = RefCell::new(UploadController::new());
    controller.borrow_mut().select_file(pdf("first.pdf"));

    let client = ScriptedClient::with(vec![Ok(json!({
        "data": {"signature_validation": {"status": "COMPLETE", "completed_signatures": 3, "total_signatures": 3}}
    }))]);
    tokio_test::block_on(analyze(&controller, &client));

    let mut viewer = ResultViewer::default();
    viewer.set_value(controller.borrow().result().cloned());
    let summary = viewer.signature_summary().unwrap();
    assert_eq!(summary.count_text(), "3/3 signatures complete");

    controller.borrow_mut().select_file(pdf("second.pdf"));
    viewer.set_value(controller.borrow().result().cloned());
    assert!(viewer.render_html().is_none());
    assert!(SignatureSummary::find(&json!({})).is_none());
}

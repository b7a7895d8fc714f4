use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use crate::ai::gateway::{Gateway, GatewayError, SubtaskSuggestion};
use crate::model::task::Task;

/// One of the three advisory request shapes
#[derive(Debug, Clone)]
pub enum AdvisoryRequest {
    Analyze,
    Ask(String),
    SuggestSubtasks,
}

/// The result of a finished advisory call
#[derive(Debug, Clone)]
pub enum AdvisoryReply {
    Text(String),
    Subtasks(Vec<SubtaskSuggestion>),
}

/// Handle for an in-flight advisory call. The event loop polls it each
/// tick; dropping it abandons the call (the worker's send fails and the
/// eventual result is discarded, which is the only cancellation the
/// board needs).
pub struct PendingCall {
    rx: mpsc::Receiver<Result<AdvisoryReply, GatewayError>>,
}

impl PendingCall {
    /// Non-blocking poll. Some(..) exactly once, when the call finishes.
    pub fn poll(&self) -> Option<Result<AdvisoryReply, GatewayError>> {
        self.rx.try_recv().ok()
    }
}

/// Run an advisory request on a worker thread against a snapshot of the
/// task. The board stays fully usable while the call is pending; the
/// snapshot means a concurrent edit does not race the prompt.
pub fn spawn(gateway: Arc<Gateway>, task: Task, request: AdvisoryRequest) -> PendingCall {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match request {
            AdvisoryRequest::Analyze => gateway.analyze(&task).map(AdvisoryReply::Text),
            AdvisoryRequest::Ask(question) => {
                gateway.answer(&task, &question).map(AdvisoryReply::Text)
            }
            AdvisoryRequest::SuggestSubtasks => gateway
                .suggest_subtasks(&task)
                .map(AdvisoryReply::Subtasks),
        };
        // Receiver gone means the session was closed; nothing to do.
        let _ = tx.send(result);
    });
    PendingCall { rx }
}

use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode};
use tokio::sync::{Mutex, oneshot};

use crate::{types::CallbackOutcome, warning};

pub const SUCCESS_BODY: &str = "Authorization successful! You can close this window now.";
pub const DENIED_BODY: &str = "Authorization was denied. You can close this window now.";

/// Shared with the callback handler: the expected `state` and the one-shot
/// sender that wakes the waiting authorization flow.
pub struct CallbackState {
    expected_state: String,
    sender: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

impl CallbackState {
    pub fn new(expected_state: String, sender: oneshot::Sender<CallbackOutcome>) -> Self {
        Self {
            expected_state,
            sender: Mutex::new(Some(sender)),
        }
    }

    /// Hands the outcome to the flow. Only the first delivery counts.
    async fn signal(&self, outcome: CallbackOutcome) -> bool {
        match self.sender.lock().await.take() {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> (StatusCode, &'static str) {
    if params.get("state").map(String::as_str) != Some(state.expected_state.as_str()) {
        warning!("Ignoring callback with unexpected state parameter.");
        return (StatusCode::BAD_REQUEST, "Invalid state parameter.");
    }

    if let Some(err) = params.get("error") {
        state.signal(CallbackOutcome::Denied(err.clone())).await;
        return (StatusCode::OK, DENIED_BODY);
    }

    match params.get("code").filter(|c| !c.is_empty()) {
        Some(code) => {
            if !state.signal(CallbackOutcome::Code(code.clone())).await {
                return (StatusCode::OK, "Authorization already received.");
            }
            (StatusCode::OK, SUCCESS_BODY)
        }
        None => (StatusCode::BAD_REQUEST, "Missing authorization code."),
    }
}

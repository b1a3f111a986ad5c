//! Worker message contract and the worker-side handler

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

use crate::error::HydrateError;
use crate::feed::{parse_feed, FeedDatabase};

/// `{ text }` sent to the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    #[serde(default)]
    pub text: String,
}

/// `{ ok: true, db }` or `{ ok: false, error }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<FeedDatabase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerResponse {
    pub fn success(db: FeedDatabase) -> Self {
        Self { ok: true, db: Some(db), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, db: None, error: Some(error.into()) }
    }

    pub fn into_result(self) -> Result<FeedDatabase, HydrateError> {
        match (self.ok, self.db) {
            (true, Some(db)) => Ok(db),
            (true, None) => Err(HydrateError::WorkerFailed("reply carried no database".to_string())),
            (false, _) => Err(HydrateError::WorkerFailed(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Handle one request inside the worker. A parser panic is reported as
/// `ok: false` instead of killing the worker without a reply.
///
/// On `wasm32-unknown-unknown` panics abort, so the worker dies instead and
/// the page side sees `onerror` (`WorkerClosed`) or the timeout.
pub fn respond(request: WorkerRequest) -> WorkerResponse {
    match panic::catch_unwind(AssertUnwindSafe(|| parse_feed(&request.text))) {
        Ok(db) => WorkerResponse::success(db),
        Err(payload) => WorkerResponse::failure(panic_message(payload.as_ref())),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

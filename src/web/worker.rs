//! Dedicated Web Worker on both sides of the parse round-trip

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent, Worker};

use super::js_error;
use crate::console;
use crate::error::HydrateError;
use crate::worker::{respond, OffloadWorker, WorkerRequest, WorkerResponse};

// =============================================================================
// Page side
// =============================================================================

/// A freshly spawned `Worker`, used for exactly one request
pub struct BrowserWorker {
    worker: Worker,
    on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    on_error: Option<Closure<dyn FnMut(JsValue)>>,
    terminated: bool,
}

impl BrowserWorker {
    pub fn spawn(script_url: &str) -> Result<Self, HydrateError> {
        let worker = Worker::new(script_url).map_err(|e| HydrateError::WorkerUnavailable(js_error(&e)))?;
        Ok(Self {
            worker,
            on_message: None,
            on_error: None,
            terminated: false,
        })
    }
}

impl OffloadWorker for BrowserWorker {
    fn post(&mut self, request: &WorkerRequest) -> Result<(), HydrateError> {
        let message = request
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| HydrateError::WorkerUnavailable(e.to_string()))?;
        self.worker
            .post_message(&message)
            .map_err(|e| HydrateError::WorkerUnavailable(js_error(&e)))
    }

    fn reply(&mut self) -> LocalBoxFuture<'static, Option<WorkerResponse>> {
        let (tx, rx) = oneshot::channel::<WorkerResponse>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let message_tx = Rc::clone(&tx);
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            let response = serde_wasm_bindgen::from_value::<WorkerResponse>(event.data())
                .unwrap_or_else(|e| WorkerResponse::failure(format!("malformed reply: {}", e)));
            if let Some(tx) = message_tx.borrow_mut().take() {
                let _ = tx.send(response);
            }
        }) as Box<dyn FnMut(_)>);

        // Script load or runtime error: drop the sender so the reply resolves to None
        let on_error = Closure::wrap(Box::new(move |_event: JsValue| {
            tx.borrow_mut().take();
        }) as Box<dyn FnMut(_)>);

        self.worker.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        self.worker.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        self.on_message = Some(on_message);
        self.on_error = Some(on_error);

        rx.map(|reply| reply.ok()).boxed_local()
    }

    fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.worker.set_onmessage(None);
        self.worker.set_onerror(None);
        self.worker.terminate();
        self.on_message = None;
        self.on_error = None;
    }
}

// =============================================================================
// Worker side
// =============================================================================

/// Install the feed parser as this worker's `onmessage` handler.
///
/// Call from the worker script after the wasm module is initialized.
#[wasm_bindgen(js_name = installFeedWorker)]
pub fn install_feed_worker() -> Result<(), JsValue> {
    let scope: DedicatedWorkerGlobalScope = js_sys::global().dyn_into()?;
    let reply_scope = scope.clone();

    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        let request = serde_wasm_bindgen::from_value::<WorkerRequest>(event.data())
            .unwrap_or(WorkerRequest { text: String::new() });
        let response = respond(request);

        match response.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(value) => {
                if let Err(e) = reply_scope.post_message(&value) {
                    console::warn(&format!("worker reply failed: {}", js_error(&e)));
                }
            }
            Err(e) => {
                let failure = WorkerResponse::failure(e.to_string());
                if let Ok(value) = failure.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
                    let _ = reply_scope.post_message(&value);
                }
            }
        }
    }) as Box<dyn FnMut(_)>);

    scope.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();
    Ok(())
}

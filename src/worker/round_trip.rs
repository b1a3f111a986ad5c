//! One-shot isolated parse: spawn → send → race(reply, timeout) → teardown
//!
//! The worker is held by a `WorkerGuard`, so it is terminated on every exit
//! path, including the surrounding future being dropped mid-flight.

use futures::future::{self, Either, LocalBoxFuture};
use std::ops::{Deref, DerefMut};

use super::message::{WorkerRequest, WorkerResponse};
use crate::error::HydrateError;
use crate::feed::FeedDatabase;

/// An isolated execution context used for a single request/response pair.
pub trait OffloadWorker {
    /// Deliver the request. Called once.
    fn post(&mut self, request: &WorkerRequest) -> Result<(), HydrateError>;

    /// Resolves with the first reply, or `None` if the worker goes away first.
    /// Must be called before `post` so no reply can be missed.
    fn reply(&mut self) -> LocalBoxFuture<'static, Option<WorkerResponse>>;

    /// Forcibly stop the context. Must tolerate being called after it already finished.
    fn terminate(&mut self);
}

/// Owns a worker for one round-trip and terminates it on drop.
pub struct WorkerGuard<W: OffloadWorker> {
    worker: W,
}

impl<W: OffloadWorker> WorkerGuard<W> {
    pub fn new(worker: W) -> Self {
        Self { worker }
    }
}

impl<W: OffloadWorker> Deref for WorkerGuard<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.worker
    }
}

impl<W: OffloadWorker> DerefMut for WorkerGuard<W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.worker
    }
}

impl<W: OffloadWorker> Drop for WorkerGuard<W> {
    fn drop(&mut self) {
        self.worker.terminate();
    }
}

/// Parse `text` in a freshly spawned worker, giving up when `timeout` fires first.
pub async fn round_trip<W, S>(
    spawn: S,
    text: String,
    timeout: LocalBoxFuture<'static, ()>,
    timeout_ms: u32,
) -> Result<FeedDatabase, HydrateError>
where
    W: OffloadWorker,
    S: FnOnce() -> Result<W, HydrateError>,
{
    let mut guard = WorkerGuard::new(spawn()?);
    let reply = guard.reply();
    guard.post(&WorkerRequest { text })?;

    match future::select(reply, timeout).await {
        Either::Left((Some(response), _)) => response.into_result(),
        Either::Left((None, _)) => Err(HydrateError::WorkerClosed),
        Either::Right(((), _)) => Err(HydrateError::WorkerTimeout(timeout_ms)),
    }
}

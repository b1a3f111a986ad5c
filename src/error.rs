//! Error type shared by the hydration pipeline.
//!
//! Nothing here ever reaches the page as a visible error: the coordinator
//! logs these and leaves the affected cards in their server-rendered state.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateError {
    /// Network-level failure while fetching a feed
    Fetch(String),
    /// Feed responded with a non-OK status
    HttpStatus(u16),
    /// Feed body was empty
    EmptyFeed,
    /// Worker could not be constructed or messaged
    WorkerUnavailable(String),
    /// Worker did not reply within the timeout (ms)
    WorkerTimeout(u32),
    /// Worker replied `ok: false`
    WorkerFailed(String),
    /// Worker went away without replying
    WorkerClosed,
    /// A DOM operation was rejected
    Dom(String),
    /// A queued task failed
    Task(String),
}

impl fmt::Display for HydrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrateError::Fetch(e) => write!(f, "Feed fetch failed: {}", e),
            HydrateError::HttpStatus(status) => write!(f, "Feed responded with HTTP {}", status),
            HydrateError::EmptyFeed => write!(f, "Feed body was empty"),
            HydrateError::WorkerUnavailable(e) => write!(f, "Worker unavailable: {}", e),
            HydrateError::WorkerTimeout(ms) => write!(f, "Worker did not reply within {}ms", ms),
            HydrateError::WorkerFailed(e) => write!(f, "Worker failed to parse feed: {}", e),
            HydrateError::WorkerClosed => write!(f, "Worker closed without replying"),
            HydrateError::Dom(e) => write!(f, "DOM error: {}", e),
            HydrateError::Task(e) => write!(f, "Task failed: {}", e),
        }
    }
}

impl std::error::Error for HydrateError {}

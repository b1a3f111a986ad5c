//! Offload worker: feed parsing in an isolated execution context
//!
//! - `message.rs` - `{text}` request, `{ok, db | error}` response, worker-side `respond`
//! - `round_trip.rs` - `OffloadWorker` trait, `WorkerGuard`, timeout race

pub mod message;
pub mod round_trip;

pub use message::*;
pub use round_trip::*;

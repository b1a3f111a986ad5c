//! Hydration coordinator
//!
//! - `platform.rs` - host seam (DOM, fetch, worker, timers, frames)
//! - `task.rs` - HydrationTask: one card against one feed database
//! - `coordinator.rs` - Hydrator: latch, grouping, per-group pipeline
//! - `report.rs` - HydrationReport counters

pub mod platform;
pub mod task;
pub mod report;
pub mod coordinator;


pub use platform::*;
pub use task::*;
pub use report::*;
pub use coordinator::*;

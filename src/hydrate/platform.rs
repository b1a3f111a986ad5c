//! Platform seam for the hydration coordinator
//!
//! Everything the coordinator needs from its host: DOM scan, network,
//! worker construction, timers and frame ticks.

use futures::future::LocalBoxFuture;

use crate::card::Element;
use crate::error::HydrateError;
use crate::schedule::FrameClock;
use crate::worker::OffloadWorker;

pub trait Platform: FrameClock {
    type Element: Element + 'static;
    type Worker: OffloadWorker + 'static;

    /// All elements matching `selector`, in document order
    fn query_cards(&self, selector: &str) -> Result<Vec<Self::Element>, HydrateError>;

    /// Fetch `url` as text without credentials. Non-OK statuses are errors.
    fn fetch_text(&self, url: &str) -> LocalBoxFuture<'static, Result<String, HydrateError>>;

    /// Start a fresh isolated worker running `script_url`
    fn spawn_worker(&self, script_url: &str) -> Result<Self::Worker, HydrateError>;

    /// Resolves after `ms` milliseconds
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

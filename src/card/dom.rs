//! Minimal DOM surface the card updater needs.
//!
//! Implemented over `web_sys::Element` in the browser and by in-memory
//! fakes in tests.

use crate::error::HydrateError;

/// A handle to a DOM element. Handles are cheap to clone and share the node.
pub trait Element: Clone {
    /// First descendant matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, HydrateError>;

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), HydrateError>;

    fn set_text_content(&self, text: &str) -> Result<(), HydrateError>;
}

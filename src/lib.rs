//! CardCore: Product Card Hydration
//!
//! A Rust/WASM implementation of the product-card enrichment pipeline.
//!
//! # Architecture
//!
//! ## Feed
//! - `feed/record.rs` - FeedRecord / FeedDatabase with per-field merge
//! - `feed/parser.rs` - FeedParser: JSON, key-value and positional line strategies
//!
//! ## Pipeline
//! - `worker/` - Offload worker message contract + guarded round-trip with timeout
//! - `schedule/` - FrameQueue: one batch of tasks per animation frame
//! - `card/` - CardUpdater and affiliate link hygiene over a minimal `Element` trait
//! - `hydrate/` - Hydrator: one-shot scan, grouping by feed URL, concurrent groups
//!
//! ## Browser
//! - `web/` - BrowserPlatform, Web Worker glue and the `CardHydrator` JS class (wasm32 only)
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { CardHydrator, parseFeed } from 'cardcore';
//!
//! await init();
//!
//! // Cards: <article class="product" data-sku="A1" data-src="/feed.txt">
//! const hydrator = new CardHydrator();
//! hydrator.armTriggers();
//!
//! // Parser is also usable directly
//! parseFeed("A1|499€|https://shop/a1|https://cdn/a1.png");
//! // => { A1: { sku: "A1", price: "499€", url: "...", image: "..." } }
//! ```

pub mod error;
pub mod config;
mod console;
pub mod feed;
pub mod worker;
pub mod schedule;
pub mod card;
pub mod hydrate;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::*;
pub use config::*;
pub use feed::*;
pub use worker::*;
pub use schedule::*;
pub use card::*;
pub use hydrate::*;

use serde::Serialize;
use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Parse feed text on the calling thread; returns a plain `{ sku: record }` object
#[wasm_bindgen(js_name = parseFeed)]
pub fn js_parse_feed(text: &str) -> Result<JsValue, JsValue> {
    parse_feed(text)
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("cardcore v{}", env!("CARGO_PKG_VERSION"))
}

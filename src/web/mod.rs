//! Browser bindings (wasm32 only)
//!
//! - `platform.rs` - BrowserPlatform: DOM scan, fetch, timers, animation frames
//! - `worker.rs` - BrowserWorker (page side) and `installFeedWorker` (worker side)
//! - `element.rs` - `Element` for `web_sys::Element`
//!
//! # Usage (page)
//! ```javascript,ignore
//! import init, { CardHydrator } from 'cardcore';
//!
//! await init();
//! const hydrator = new CardHydrator({ worker_url: '/assets/ir-worker.js' });
//! hydrator.armTriggers(); // first scroll / click / touchstart, then idle
//! hydrator.armLinkHygiene(); // rel/target on clicked affiliate links
//! ```
//!
//! # Usage (worker script)
//! ```javascript,ignore
//! import init, { installFeedWorker } from 'cardcore';
//! await init();
//! installFeedWorker();
//! ```

pub mod element;
pub mod platform;
pub mod worker;

pub use platform::*;
pub use worker::*;

use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{AddEventListenerOptions, Window};

use crate::card::AffiliatePolicy;
use crate::config::HydrationConfig;
use crate::console;
use crate::error::HydrateError;
use crate::hydrate::{Hydrator, Platform};

pub(crate) fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn to_js(error: HydrateError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Run `callback` from `requestIdleCallback`, or a 1ms timeout where unsupported
fn run_when_idle(window: &Window, callback: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let callback = Closure::once_into_js(callback);
    let idle = js_sys::Reflect::get(window, &JsValue::from_str("requestIdleCallback"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());

    match idle {
        Some(request_idle) => request_idle.call1(window, &callback).map(|_| ()),
        None => window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 1)
            .map(|_| ()),
    }
}

// =============================================================================
// CardHydrator (JS API)
// =============================================================================

#[wasm_bindgen]
pub struct CardHydrator {
    inner: Rc<Hydrator<BrowserPlatform>>,
    /// Set once any trigger fired and queued the idle run
    requested: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl CardHydrator {
    /// `config` is an optional partial `HydrationConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CardHydrator, JsValue> {
        let config: HydrationConfig = if config.is_undefined() || config.is_null() {
            HydrationConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid hydration config: {}", e)))?
        };
        let platform = BrowserPlatform::new().map_err(to_js)?;

        Ok(Self {
            inner: Rc::new(Hydrator::new(platform, config)),
            requested: Rc::new(Cell::new(false)),
        })
    }

    /// Hydrate now. Resolves when every group finished or was abandoned.
    /// Calls after the first resolve immediately.
    #[wasm_bindgen]
    pub fn hydrate(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            inner.hydrate().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(js_name = hasStarted)]
    pub fn has_started(&self) -> bool {
        self.inner.has_started()
    }

    /// Defer hydration to the first trigger event, then to an idle period.
    ///
    /// Returns false (and attaches nothing) when the page has no candidate cards.
    #[wasm_bindgen(js_name = armTriggers)]
    pub fn arm_triggers(&self) -> Result<bool, JsValue> {
        let platform = self.inner.platform();
        let cards = platform
            .query_cards(&self.inner.config().card_selector)
            .map_err(to_js)?;
        if cards.is_empty() {
            return Ok(false);
        }

        let window = platform.window().clone();
        let inner = Rc::clone(&self.inner);
        let requested = Rc::clone(&self.requested);
        let start: Rc<dyn Fn()> = Rc::new(move || {
            if requested.replace(true) {
                return;
            }
            let inner = Rc::clone(&inner);
            let scheduled = run_when_idle(&window, move || {
                spawn_local(async move {
                    inner.hydrate().await;
                });
            });
            if let Err(e) = scheduled {
                console::warn(&format!("could not schedule hydration: {}", js_error(&e)));
            }
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        options.set_passive(true);

        for event in &self.inner.config().trigger_events {
            let start = Rc::clone(&start);
            let listener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                start();
            }) as Box<dyn FnMut(_)>);
            platform.window().add_event_listener_with_callback_and_add_event_listener_options(
                event,
                listener.as_ref().unchecked_ref(),
                &options,
            )?;
            listener.forget();
        }
        Ok(true)
    }

    /// Apply affiliate `rel`/`target` hygiene to any affiliate link as it is clicked.
    /// Links whose host is not an affiliate host are left alone.
    #[wasm_bindgen(js_name = armLinkHygiene)]
    pub fn arm_link_hygiene(&self) -> Result<(), JsValue> {
        let policy = AffiliatePolicy::from_config(self.inner.config());
        let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let link = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| el.closest("a[href]").ok().flatten());
            if let Some(link) = link {
                if let Err(e) = policy.ensure_rel_target(&link, false) {
                    console::debug(&format!("link hygiene skipped: {}", e));
                }
            }
        }) as Box<dyn FnMut(_)>);

        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        options.set_passive(true);
        self.inner
            .platform()
            .window()
            .add_event_listener_with_callback_and_add_event_listener_options(
                "click",
                listener.as_ref().unchecked_ref(),
                &options,
            )?;
        listener.forget();
        Ok(())
    }
}

//! BrowserPlatform: the hydration seam over `window` / `document`

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, RequestCredentials, RequestInit, Response, Window};

use super::js_error;
use super::worker::BrowserWorker;
use crate::error::HydrateError;
use crate::hydrate::Platform;
use crate::schedule::FrameClock;

#[derive(Clone)]
pub struct BrowserPlatform {
    window: Window,
    document: Document,
}

impl BrowserPlatform {
    pub fn new() -> Result<Self, HydrateError> {
        let window = web_sys::window().ok_or_else(|| HydrateError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| HydrateError::Dom("no document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl FrameClock for BrowserPlatform {
    fn next_frame(&self) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if window.request_animation_frame(&resolve).is_err() {
                // No rendering pipeline: resolve right away
                let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
            }
        });
        JsFuture::from(promise).map(|_| ()).boxed_local()
    }
}

impl Platform for BrowserPlatform {
    type Element = web_sys::Element;
    type Worker = BrowserWorker;

    fn query_cards(&self, selector: &str) -> Result<Vec<web_sys::Element>, HydrateError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|e| HydrateError::Dom(js_error(&e)))?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect())
    }

    fn fetch_text(&self, url: &str) -> LocalBoxFuture<'static, Result<String, HydrateError>> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_credentials(RequestCredentials::Omit);
        let request = self.window.fetch_with_str_and_init(url, &init);

        async move {
            let response: Response = JsFuture::from(request)
                .await
                .map_err(|e| HydrateError::Fetch(js_error(&e)))?
                .dyn_into()
                .map_err(|e| HydrateError::Fetch(js_error(&e)))?;
            if !response.ok() {
                return Err(HydrateError::HttpStatus(response.status()));
            }
            let body = response.text().map_err(|e| HydrateError::Fetch(js_error(&e)))?;
            let text = JsFuture::from(body)
                .await
                .map_err(|e| HydrateError::Fetch(js_error(&e)))?;
            Ok(text.as_string().unwrap_or_default())
        }
        .boxed_local()
    }

    fn spawn_worker(&self, script_url: &str) -> Result<BrowserWorker, HydrateError> {
        BrowserWorker::spawn(script_url)
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
        });
        JsFuture::from(promise).map(|_| ()).boxed_local()
    }
}

//! Browser console logging.
//!
//! Compiles to nothing off wasm32 so the pipeline stays testable natively.

const PREFIX: &str = "[CardCore]";

pub(crate) fn debug(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&wasm_bindgen::JsValue::from_str(&format!("{} {}", PREFIX, msg)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (PREFIX, msg);
}

pub(crate) fn warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!("{} {}", PREFIX, msg)));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (PREFIX, msg);
}

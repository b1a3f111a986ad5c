//! Browser tests: `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use cardcore::web::BrowserPlatform;
use cardcore::{
    AffiliatePolicy, CardSelectors, CardUpdater, FeedField, FeedRecord, FrameClock, FrameQueue, HydrateError, Platform,
};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn parse_feed_returns_plain_object() {
    let db = cardcore::js_parse_feed("A1|$10|https://x/a1").unwrap();
    let record = Reflect::get(&db, &JsValue::from_str("A1")).unwrap();
    let price = Reflect::get(&record, &JsValue::from_str("price")).unwrap();

    assert!(!db.is_instance_of::<js_sys::Map>());
    assert_eq!(price.as_string().as_deref(), Some("$10"));
}

#[wasm_bindgen_test]
async fn frame_and_timer_resolve() {
    let platform = BrowserPlatform::new().unwrap();
    platform.next_frame().await;
    platform.sleep(5).await;
}

#[wasm_bindgen_test]
fn scan_finds_no_cards_on_blank_page() {
    let platform = BrowserPlatform::new().unwrap();
    let cards = platform.query_cards(".product[data-sku][data-src]").unwrap();
    assert!(cards.is_empty());
}

#[wasm_bindgen_test]
async fn queue_keeps_going_after_failed_task() {
    let platform = BrowserPlatform::new().unwrap();
    let mut queue = FrameQueue::new(1);
    queue.push(Box::new(|| -> Result<u32, HydrateError> { Ok(1) }));
    queue.push(Box::new(|| -> Result<u32, HydrateError> { Err(HydrateError::Dom("detached".into())) }));
    queue.push(Box::new(|| -> Result<u32, HydrateError> { Ok(3) }));

    let outcome = queue.drain(&platform).await;

    assert_eq!(outcome.results, vec![1, 3]);
    assert_eq!(outcome.stats.ran, 3);
    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.stats.frames, 3);
}

#[wasm_bindgen_test]
fn dom_error_skips_only_that_field() {
    let document = web_sys::window().unwrap().document().unwrap();
    let card = document.create_element("article").unwrap();
    card.set_inner_html(r#"<h3>Static</h3><p class="price">-</p><img src="/static.png">"#);

    let selectors = CardSelectors {
        heading: "[[".to_string(),
        ..CardSelectors::default()
    };
    let updater = CardUpdater::new(selectors, AffiliatePolicy::default());
    let mut record = FeedRecord::with_sku("A1");
    record.set(FeedField::Name, "Scooter A1");
    record.set(FeedField::Price, "$10");
    record.set(FeedField::Image, "https://x/a1.png");

    let written = updater.apply(&card, Some(&record));

    assert!(!written.contains(FeedField::Name));
    assert!(written.contains(FeedField::Price));
    assert!(written.contains(FeedField::Image));
    let price = card.query_selector(".price").unwrap().unwrap();
    assert_eq!(price.text_content().as_deref(), Some("$10"));
}

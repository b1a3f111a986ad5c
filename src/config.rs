//! Configuration types and defaults for card hydration
//!
//! Defaults match the site's product card template.

use serde::{Deserialize, Serialize};

/// Upper bound on waiting for the parse worker to reply
pub const DEFAULT_WORKER_TIMEOUT_MS: u32 = 4000;

// =============================================================================
// Card Selectors
// =============================================================================

/// Where each updatable field lives inside a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSelectors {
    /// Product name heading
    pub heading: String,
    /// Price display
    pub price: String,
    /// Product image
    pub image: String,
    /// Preferred call-to-action link
    pub cta_primary: String,
    /// Fallback action link when no primary CTA exists
    pub cta_fallback: String,
    /// Copy-to-clipboard trigger holding the coupon
    pub copy: String,
    /// Attribute carrying the copy payload
    pub copy_attribute: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            heading: "h3".to_string(),
            price: ".price".to_string(),
            image: "img".to_string(),
            cta_primary: ".actions a.btn-cta".to_string(),
            cta_fallback: ".actions a.btn".to_string(),
            copy: "[data-copy]".to_string(),
            copy_attribute: "data-copy".to_string(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
    /// Candidate card selector. Default: `.product[data-sku][data-src]`
    pub card_selector: String,
    /// Attribute holding the product key. Default: `data-sku`
    pub sku_attribute: String,
    /// Attribute holding the feed URL. Default: `data-src`
    pub src_attribute: String,
    /// Script URL of the parse worker
    pub worker_url: String,
    /// Worker reply timeout. Default: 4000
    pub worker_timeout_ms: u32,
    /// Tasks executed per animation frame. Default: 1
    pub tasks_per_frame: usize,
    pub selectors: CardSelectors,
    /// Substrings identifying affiliate hosts
    pub affiliate_hosts: Vec<String>,
    /// Base used to resolve relative hrefs before host checks
    pub affiliate_base: String,
    /// Window events that arm hydration (each fires once)
    pub trigger_events: Vec<String>,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            card_selector: ".product[data-sku][data-src]".to_string(),
            sku_attribute: "data-sku".to_string(),
            src_attribute: "data-src".to_string(),
            worker_url: "/assets/ir-worker.js".to_string(),
            worker_timeout_ms: DEFAULT_WORKER_TIMEOUT_MS,
            tasks_per_frame: 1,
            selectors: CardSelectors::default(),
            affiliate_hosts: ["isinwheel.com", "isinwheel.fr", "sjv.io", "amzn.to", "amazon."]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            affiliate_base: "https://localhost/".to_string(),
            trigger_events: ["scroll", "click", "touchstart"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HydrationConfig::default();
        assert_eq!(config.worker_timeout_ms, 4000);
        assert_eq!(config.tasks_per_frame, 1);
        assert_eq!(config.selectors.cta_primary, ".actions a.btn-cta");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: HydrationConfig = serde_json::from_str(
            r#"{"worker_timeout_ms": 1500, "selectors": {"price": ".cost"}}"#,
        ).unwrap();

        assert_eq!(config.worker_timeout_ms, 1500);
        assert_eq!(config.selectors.price, ".cost");
        assert_eq!(config.selectors.heading, "h3");
        assert_eq!(config.sku_attribute, "data-sku");
    }
}

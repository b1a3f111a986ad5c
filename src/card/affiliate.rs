//! Affiliate link hygiene
//!
//! Outbound affiliate CTAs open in a new browsing context and carry
//! `sponsored noopener noreferrer`.

use url::Url;

use super::dom::Element;
use crate::config::HydrationConfig;
use crate::error::HydrateError;

const REL_TOKENS: [&str; 3] = ["sponsored", "noopener", "noreferrer"];

#[derive(Debug, Clone)]
pub struct AffiliatePolicy {
    /// Lowercased host substrings
    hosts: Vec<String>,
    /// Base for resolving relative hrefs
    base: Option<Url>,
}

impl AffiliatePolicy {
    pub fn new<I, S>(hosts: I, base: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            base: Url::parse(base).ok(),
        }
    }

    pub fn from_config(config: &HydrationConfig) -> Self {
        Self::new(&config.affiliate_hosts, &config.affiliate_base)
    }

    /// Cheap substring pre-check on the raw href
    pub fn matches_hint(&self, href: &str) -> bool {
        let href = href.to_ascii_lowercase();
        self.hosts.iter().any(|host| href.contains(host.as_str()))
    }

    /// The href passes the hint check and its resolved hostname matches a hint too
    pub fn is_affiliate(&self, href: &str) -> bool {
        if !self.matches_hint(href) {
            return false;
        }
        let resolved = match &self.base {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        resolved
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
            .is_some_and(|host| self.matches_hint(&host))
    }

    /// Apply `target=_blank` and the safe `rel` tokens.
    ///
    /// With `force`, any link with a non-empty href is treated as affiliate.
    /// Returns whether the link was touched.
    pub fn ensure_rel_target<E: Element>(&self, link: &E, force: bool) -> Result<bool, HydrateError> {
        let href = link.attribute("href").unwrap_or_default();
        if href.is_empty() || (!force && !self.is_affiliate(&href)) {
            return Ok(false);
        }

        link.set_attribute("target", "_blank")?;
        link.set_attribute("rel", &merge_rel(link.attribute("rel").as_deref()))?;
        Ok(true)
    }
}

impl Default for AffiliatePolicy {
    fn default() -> Self {
        Self::from_config(&HydrationConfig::default())
    }
}

/// Existing `rel` tokens (lowercased, deduplicated) plus the safe tokens
pub fn merge_rel(existing: Option<&str>) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for token in existing.unwrap_or_default().split_whitespace() {
        let token = token.to_ascii_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    for token in REL_TOKENS {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_matching() {
        let policy = AffiliatePolicy::default();
        assert!(policy.matches_hint("https://www.AMAZON.fr/dp/B0"));
        assert!(policy.matches_hint("https://isinwheel.sjv.io/c/123"));
        assert!(!policy.matches_hint("https://example.com/"));
    }

    #[test]
    fn test_affiliate_needs_matching_host() {
        let policy = AffiliatePolicy::default();
        assert!(policy.is_affiliate("https://amzn.to/3xyz"));
        // Hint only appears in the query, not the host
        assert!(!policy.is_affiliate("https://example.com/?ref=amzn.to"));
        // Relative hrefs resolve against the base host
        assert!(!policy.is_affiliate("/go/isinwheel.com"));
    }

    #[test]
    fn test_merge_rel() {
        assert_eq!(merge_rel(None), "sponsored noopener noreferrer");
        assert_eq!(merge_rel(Some("NoOpener  external")), "noopener external sponsored noreferrer");
        assert_eq!(merge_rel(Some("sponsored noopener noreferrer")), "sponsored noopener noreferrer");
    }

    #[test]
    fn test_clicked_link_pass_only_touches_affiliates() {
        use crate::card::testing::FakeElement;

        let policy = AffiliatePolicy::default();
        let partner = FakeElement::new("a").with_attr("href", "https://amzn.to/3xyz").with_attr("rel", "external");
        let plain = FakeElement::new("a").with_attr("href", "https://example.com/?ref=amzn.to");

        assert_eq!(policy.ensure_rel_target(&partner, false), Ok(true));
        assert_eq!(partner.attribute("target").as_deref(), Some("_blank"));
        assert_eq!(partner.attribute("rel").as_deref(), Some("external sponsored noopener noreferrer"));

        assert_eq!(policy.ensure_rel_target(&plain, false), Ok(false));
        assert_eq!(plain.attribute("target"), None);
    }

    #[test]
    fn test_custom_hosts() {
        let policy = AffiliatePolicy::new(["Partner.Example"], "https://site.test/");
        assert!(policy.is_affiliate("https://shop.partner.example/p/1"));
        assert!(!policy.is_affiliate("https://amzn.to/3xyz"));
    }
}

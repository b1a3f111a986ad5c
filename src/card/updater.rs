//! CardUpdater: applies one feed record to one product card
//!
//! Five independent updates (name, price, image, url, coupon). Each is
//! guarded on its own: a missing element, a missing value or a rejected DOM
//! call skips that field and leaves the siblings alone.

use super::affiliate::AffiliatePolicy;
use super::dom::Element;
use crate::config::{CardSelectors, HydrationConfig};
use crate::console;
use crate::error::HydrateError;
use crate::feed::{FeedField, FeedRecord};

// =============================================================================
// FieldSet
// =============================================================================

/// Which fields an update actually wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    fn bit(field: FeedField) -> u8 {
        match field {
            FeedField::Sku => 1 << 0,
            FeedField::Name => 1 << 1,
            FeedField::Price => 1 << 2,
            FeedField::Image => 1 << 3,
            FeedField::Url => 1 << 4,
            FeedField::Coupon => 1 << 5,
        }
    }

    pub fn insert(&mut self, field: FeedField) {
        self.0 |= Self::bit(field);
    }

    pub fn contains(&self, field: FeedField) -> bool {
        self.0 & Self::bit(field) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<FeedField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FeedField>>(iter: I) -> Self {
        let mut set = FieldSet::default();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

// =============================================================================
// CardUpdater
// =============================================================================

#[derive(Debug, Clone)]
pub struct CardUpdater {
    selectors: CardSelectors,
    affiliate: AffiliatePolicy,
}

impl Default for CardUpdater {
    fn default() -> Self {
        Self::from_config(&HydrationConfig::default())
    }
}

impl CardUpdater {
    pub fn new(selectors: CardSelectors, affiliate: AffiliatePolicy) -> Self {
        Self { selectors, affiliate }
    }

    pub fn from_config(config: &HydrationConfig) -> Self {
        Self::new(config.selectors.clone(), AffiliatePolicy::from_config(config))
    }

    /// Apply `record` to `card`. A `None` record is a no-op.
    pub fn apply<E: Element>(&self, card: &E, record: Option<&FeedRecord>) -> FieldSet {
        let Some(record) = record else {
            return FieldSet::default();
        };

        let mut written = FieldSet::default();
        let s = &self.selectors;

        self.guarded(&mut written, FeedField::Name, || {
            set_text(card, &s.heading, record.get(FeedField::Name))
        });
        self.guarded(&mut written, FeedField::Price, || {
            set_text(card, &s.price, record.get(FeedField::Price))
        });
        self.guarded(&mut written, FeedField::Image, || {
            set_attr(card, &s.image, "src", record.get(FeedField::Image))
        });
        self.guarded(&mut written, FeedField::Url, || {
            self.update_cta(card, record.get(FeedField::Url))
        });
        self.guarded(&mut written, FeedField::Coupon, || {
            set_attr(card, &s.copy, &s.copy_attribute, record.get(FeedField::Coupon))
        });

        written
    }

    fn guarded<F>(&self, written: &mut FieldSet, field: FeedField, update: F)
    where
        F: FnOnce() -> Result<bool, HydrateError>,
    {
        match update() {
            Ok(true) => written.insert(field),
            Ok(false) => {}
            Err(e) => console::debug(&format!("skipped {:?} update: {}", field, e)),
        }
    }

    fn update_cta<E: Element>(&self, card: &E, url: Option<&str>) -> Result<bool, HydrateError> {
        let Some(url) = url else {
            return Ok(false);
        };
        let cta = match card.query_selector(&self.selectors.cta_primary)? {
            Some(cta) => cta,
            None => match card.query_selector(&self.selectors.cta_fallback)? {
                Some(cta) => cta,
                None => return Ok(false),
            },
        };

        cta.set_attribute("href", url)?;
        self.affiliate.ensure_rel_target(&cta, true)?;
        Ok(true)
    }
}

fn set_text<E: Element>(card: &E, selector: &str, value: Option<&str>) -> Result<bool, HydrateError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match card.query_selector(selector)? {
        Some(el) => el.set_text_content(value).map(|_| true),
        None => Ok(false),
    }
}

fn set_attr<E: Element>(card: &E, selector: &str, name: &str, value: Option<&str>) -> Result<bool, HydrateError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match card.query_selector(selector)? {
        Some(el) => el.set_attribute(name, value).map(|_| true),
        None => Ok(false),
    }
}

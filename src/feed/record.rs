//! FeedRecord / FeedDatabase: the enrichment data keyed by SKU

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// FeedRecord
// =============================================================================

/// Enrichable fields for one product. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pre-formatted display text, e.g. `499€`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Destination URL for the call-to-action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
}

/// Recognized record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedField {
    Sku,
    Name,
    Price,
    Image,
    Url,
    Coupon,
}

impl FeedField {
    /// Resolve a feed key (case-insensitive, `img` aliases `image`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "sku" => Some(FeedField::Sku),
            "name" => Some(FeedField::Name),
            "price" => Some(FeedField::Price),
            "image" | "img" => Some(FeedField::Image),
            "url" => Some(FeedField::Url),
            "coupon" => Some(FeedField::Coupon),
            _ => None,
        }
    }
}

impl FeedRecord {
    pub fn with_sku(sku: impl Into<String>) -> Self {
        Self {
            sku: Some(sku.into()),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: FeedField, value: impl Into<String>) {
        let slot = match field {
            FeedField::Sku => &mut self.sku,
            FeedField::Name => &mut self.name,
            FeedField::Price => &mut self.price,
            FeedField::Image => &mut self.image,
            FeedField::Url => &mut self.url,
            FeedField::Coupon => &mut self.coupon,
        };
        *slot = Some(value.into());
    }

    /// Field value, treating empty strings as absent
    pub fn get(&self, field: FeedField) -> Option<&str> {
        let value = match field {
            FeedField::Sku => &self.sku,
            FeedField::Name => &self.name,
            FeedField::Price => &self.price,
            FeedField::Image => &self.image,
            FeedField::Url => &self.url,
            FeedField::Coupon => &self.coupon,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Shallow per-field overwrite: every field set in `other` wins,
    /// fields `other` leaves unset keep their current value.
    pub fn merge(&mut self, other: FeedRecord) {
        let FeedRecord { sku, name, price, image, url, coupon } = other;
        overwrite(&mut self.sku, sku);
        overwrite(&mut self.name, name);
        overwrite(&mut self.price, price);
        overwrite(&mut self.image, image);
        overwrite(&mut self.url, url);
        overwrite(&mut self.coupon, coupon);
    }

    pub fn is_empty(&self) -> bool {
        *self == FeedRecord::default()
    }
}

fn overwrite(slot: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

// =============================================================================
// FeedDatabase
// =============================================================================

/// SKU → record mapping built fresh per parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedDatabase {
    records: HashMap<String, FeedRecord>,
}

impl FeedDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `record` into the entry for `sku`, creating it if needed.
    /// Empty SKUs are ignored.
    pub fn put(&mut self, sku: &str, record: FeedRecord) {
        if sku.is_empty() {
            return;
        }
        self.records
            .entry(sku.to_string())
            .or_default()
            .merge(record);
    }

    pub fn get(&self, sku: &str) -> Option<&FeedRecord> {
        self.records.get(sku)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.records.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_per_field() {
        let mut rec = FeedRecord::with_sku("A1");
        rec.set(FeedField::Price, "$10");

        let mut later = FeedRecord::default();
        later.set(FeedField::Url, "https://x/y");
        rec.merge(later);

        assert_eq!(rec.get(FeedField::Price), Some("$10"));
        assert_eq!(rec.get(FeedField::Url), Some("https://x/y"));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut db = FeedDatabase::new();
        let mut first = FeedRecord::with_sku("A1");
        first.set(FeedField::Price, "$10");
        let mut second = FeedRecord::with_sku("A1");
        second.set(FeedField::Price, "$12");

        db.put("A1", first);
        db.put("A1", second);

        assert_eq!(db.len(), 1);
        assert_eq!(db.get("A1").unwrap().price.as_deref(), Some("$12"));
    }

    #[test]
    fn test_empty_sku_ignored() {
        let mut db = FeedDatabase::new();
        db.put("", FeedRecord::default());
        assert!(db.is_empty());
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let mut rec = FeedRecord::default();
        rec.set(FeedField::Name, "");
        assert_eq!(rec.get(FeedField::Name), None);
    }

    #[test]
    fn test_field_aliases() {
        assert_eq!(FeedField::from_key("IMG"), Some(FeedField::Image));
        assert_eq!(FeedField::from_key("Price"), Some(FeedField::Price));
        assert_eq!(FeedField::from_key("color"), None);
    }

    #[test]
    fn test_database_serializes_as_plain_object() {
        let mut db = FeedDatabase::new();
        let mut rec = FeedRecord::with_sku("A1");
        rec.set(FeedField::Price, "$10");
        db.put("A1", rec);

        let json = serde_json::to_value(&db).unwrap();
        assert_eq!(json, serde_json::json!({"A1": {"sku": "A1", "price": "$10"}}));
    }
}

//! FeedParser: best-effort parsing of the pipe/JSON hybrid product feed
//!
//! Every non-empty line is parsed on its own, trying in order:
//! - JSON object: `{"sku":"A1","price":"$10"}`
//! - Key-value tokens: `sku: A1 | price=499€ | img: https://...`
//! - Positional pipes: `sku|price|url|image`
//!
//! Lines matching nothing are dropped. Parsing never fails.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::record::{FeedDatabase, FeedField, FeedRecord};

/// Key-value token: recognized key, `:` or `=`, value up to `|` / `,` / EOL
const KV_PATTERN: &str = r"(?i)\b(sku|price|url|image|img|name|coupon)\s*[:=]\s*([^|,]+)";

/// Positional field order for pipe-delimited lines
const POSITIONAL: [FeedField; 4] = [FeedField::Sku, FeedField::Price, FeedField::Url, FeedField::Image];

/// Which strategy claimed a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Json,
    KeyValue,
    Positional,
}

pub struct FeedParser {
    kv_re: Regex,
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedParser {
    pub fn new() -> Self {
        Self {
            kv_re: Regex::new(KV_PATTERN).expect("key-value pattern is valid"),
        }
    }

    /// Parse a whole feed into a fresh database
    pub fn parse(&self, text: &str) -> FeedDatabase {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| self.parse_line(line))
            .fold(FeedDatabase::new(), |mut db, (_, record)| {
                if let Some(sku) = record.sku.clone() {
                    db.put(&sku, record);
                }
                db
            })
    }

    /// Parse one trimmed line. The returned record always carries a non-empty SKU.
    pub fn parse_line(&self, line: &str) -> Option<(LineKind, FeedRecord)> {
        if line.starts_with('{') {
            if let Some(record) = parse_json_line(line) {
                return Some((LineKind::Json, record));
            }
        }

        // Key-value shaped when the leading segment holds a token; a token
        // inside a later segment (e.g. a query string) does not count
        if self.is_key_value_line(line) {
            return self.parse_key_values(line).map(|r| (LineKind::KeyValue, r));
        }

        parse_positional(line).map(|r| (LineKind::Positional, r))
    }

    fn is_key_value_line(&self, line: &str) -> bool {
        let head = line.split('|').next().unwrap_or_default();
        self.kv_re.is_match(head)
    }

    /// `None` when the line carries no SKU token
    fn parse_key_values(&self, line: &str) -> Option<FeedRecord> {
        let mut record = FeedRecord::default();

        for caps in self.kv_re.captures_iter(line) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Some(field) = FeedField::from_key(key.as_str()) else {
                continue;
            };
            let value = value.as_str().trim();
            if !value.is_empty() {
                record.set(field, value);
            }
        }

        record.get(FeedField::Sku).is_some().then_some(record)
    }
}

/// Parse a feed with a shared parser instance
pub fn parse_feed(text: &str) -> FeedDatabase {
    static PARSER: OnceLock<FeedParser> = OnceLock::new();
    PARSER.get_or_init(FeedParser::new).parse(text)
}

fn parse_json_line(line: &str) -> Option<FeedRecord> {
    let obj: Map<String, Value> = serde_json::from_str(line).ok()?;
    let sku = obj
        .iter()
        .find(|(key, _)| FeedField::from_key(key) == Some(FeedField::Sku))
        .and_then(|(_, value)| scalar_to_string(value))
        .filter(|s| !s.is_empty())?;

    let mut record = FeedRecord::with_sku(sku);
    for (key, value) in &obj {
        let Some(field) = FeedField::from_key(key) else {
            continue;
        };
        if field == FeedField::Sku {
            continue;
        }
        if let Some(value) = scalar_to_string(value) {
            record.set(field, value);
        }
    }
    Some(record)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_positional(line: &str) -> Option<FeedRecord> {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.iter().filter(|p| !p.is_empty()).count() < 2 || parts[0].is_empty() {
        return None;
    }

    let mut record = FeedRecord::default();
    for (field, value) in POSITIONAL.iter().zip(parts.iter()) {
        if !value.is_empty() {
            record.set(*field, *value);
        }
    }
    Some(record)
}

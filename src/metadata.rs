//! Content metadata: the decoded front matter of one document.
//!
//! [`ContentMetadata`] keeps the header as an ordered YAML mapping so unknown
//! keys and their order survive a rewrite, and layers typed accessors on top
//! for the keys the resolver cares about:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `published` | tri-state: `true`, `false`, or absent |
//! | `slug` | effective slug |
//! | `slugs` | append-only list of alternate slugs |
//! | `secret` | document is only reachable through a secret slug |
//! | `publish date` / `publish-date` / `publishDate` | scheduled publish instant |
//! | `author`, `title` | informational |
//!
//! Malformed optional values are read as absent: a non-boolean `published` is
//! not `false`, a non-sequence `slugs` is empty, an unparseable date is no date.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;

pub const AUTHOR: &str = "author";
pub const TITLE: &str = "title";
pub const PUBLISHED: &str = "published";
pub const SLUG: &str = "slug";
pub const SLUGS: &str = "slugs";
pub const SECRET: &str = "secret";

/// Publish date keys in lookup priority order.
pub const PUBLISH_DATE_KEYS: [&str; 3] = ["publish date", "publish-date", "publishDate"];

/// Ordered key/value metadata decoded from a document header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMetadata {
    fields: Mapping,
}

impl ContentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(fields: Mapping) -> Self {
        Self { fields }
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set `key`, keeping its position if it already exists.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(Value::String(key.to_string()), value);
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn author(&self) -> Option<&str> {
        self.get_str(AUTHOR)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str(TITLE)
    }

    /// `Some(false)` only for an explicit boolean `false`.
    pub fn published(&self) -> Option<bool> {
        self.get_bool(PUBLISHED)
    }

    pub fn set_published(&mut self, published: bool) {
        self.insert(PUBLISHED, Value::Bool(published));
    }

    pub fn secret(&self) -> Option<bool> {
        self.get_bool(SECRET)
    }

    pub fn slug(&self) -> Option<&str> {
        self.get_str(SLUG)
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.insert(SLUG, Value::String(slug.to_string()));
    }

    /// String entries of `slugs`, in order. Non-string entries are skipped.
    pub fn slugs(&self) -> Vec<&str> {
        self.slug_entries()
            .map(|entries| entries.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of entries in `slugs`, counting non-string entries too.
    pub fn slug_count(&self) -> usize {
        self.slug_entries().map_or(0, Vec::len)
    }

    fn slug_entries(&self) -> Option<&Vec<Value>> {
        self.get(SLUGS).and_then(Value::as_sequence)
    }

    /// Append `slug` to `slugs`.
    ///
    /// A missing or non-sequence `slugs` value is replaced by a new sequence.
    pub fn push_slug(&mut self, slug: &str) {
        let entry = Value::String(slug.to_string());
        match self.fields.get_mut(SLUGS).and_then(Value::as_sequence_mut) {
            Some(entries) => entries.push(entry),
            None => self.insert(SLUGS, Value::Sequence(vec![entry])),
        }
    }

    /// First entry of `slugs` starting with `prefix`.
    pub fn find_slug_with_prefix(&self, prefix: &str) -> Option<&str> {
        self.slugs().into_iter().find(|s| s.starts_with(prefix))
    }

    /// Whether any publish date alias is present, valid or not.
    pub fn has_publish_date(&self) -> bool {
        PUBLISH_DATE_KEYS.iter().any(|key| self.contains_key(key))
    }

    /// The scheduled publish instant.
    ///
    /// The first alias with a value is consulted; blank aliases (`~` or `''`)
    /// fall through to the next one. If the chosen value does not parse, the
    /// document has no publish date even when a later alias would.
    pub fn publish_date(&self) -> Option<DateTime<Utc>> {
        PUBLISH_DATE_KEYS
            .iter()
            .filter_map(|key| self.get(key))
            .find(|value| !is_blank(value))
            .and_then(parse_publish_date)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// `YYYY-MM-DD`, date only.
static YAML_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid regex"));

/// YAML 1.1 timestamp: one- or two-digit month, day and hour, `T`/`t` or
/// spaces as separator, optional fraction, optional zone after optional
/// blanks. `±HHMM` without a colon is accepted too.
static YAML_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})",
        r"(?:[Tt]|[ \t]+)([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]*))?",
        r"(?:[ \t]*(Z|z|([-+])([0-9]{1,2})(?::?([0-9]{2}))?))?$",
    ))
    .expect("valid regex")
});

/// Parse a YAML value as a point in time.
///
/// Accepts the YAML timestamp forms written as plain strings: a bare
/// `YYYY-MM-DD` (midnight UTC) or a date and time with an optional fraction
/// and zone (`Z`, `±H`, `±HH`, `±HH:MM`, `±HHMM`). Without a zone the time is
/// UTC. Anything else, including out-of-range fields, is no date.
pub fn parse_publish_date(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();

    if let Some(caps) = YAML_DATE.captures(raw) {
        return Some(calendar_date(&caps)?.and_hms_opt(0, 0, 0)?.and_utc());
    }

    let caps = YAML_TIMESTAMP.captures(raw)?;
    let date = calendar_date(&caps)?;
    let nanos = caps.get(7).map_or(Some(0), |m| fraction_nanos(m.as_str()))?;
    let local = date.and_hms_nano_opt(
        number(&caps, 4)?,
        number(&caps, 5)?,
        number(&caps, 6)?,
        nanos,
    )?;

    let offset_seconds = match caps.get(9) {
        Some(sign) => {
            let hours: i32 = number(&caps, 10)?;
            let minutes: i32 = caps.get(11).map_or(Some(0), |m| m.as_str().parse().ok())?;
            if minutes > 59 {
                return None;
            }
            let magnitude = hours * 3600 + minutes * 60;
            if sign.as_str() == "-" { -magnitude } else { magnitude }
        }
        None => 0,
    };
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let instant = offset.from_local_datetime(&local).single()?;
    Some(instant.with_timezone(&Utc))
}

/// Groups 1-3 as year, month and day.
fn calendar_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(number(caps, 1)?, number(caps, 2)?, number(caps, 3)?)
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

/// Fraction digits as nanoseconds; digits past the ninth are dropped.
fn fraction_nanos(digits: &str) -> Option<u32> {
    let significant: String = digits.chars().take(9).collect();
    if significant.is_empty() {
        return Some(0);
    }
    let scale = 10u32.pow(9 - significant.len() as u32);
    significant.parse::<u32>().ok().map(|n| n * scale)
}

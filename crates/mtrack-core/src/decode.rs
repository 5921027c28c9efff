//! Line-oriented decoder for the indentation-based config format.
//!
//! This is deliberately not a general YAML parser. It understands exactly
//! the shape the normalizer expects: an ordered list of records, each a flat
//! mapping of scalar fields, with at most one level of nesting under the two
//! reserved section keys `metrics` and `files`. Anchors, flow collections,
//! block scalars, multi-document streams, and deeper nesting are out of its
//! contract and must stay that way: generalizing the decoder would silently
//! change which config files are accepted.

use crate::scalar::Scalar;

/// Section keys that open a nested mapping when written with an empty value.
const NESTED_KEYS: [&str; 2] = ["metrics", "files"];

/// A decoded field value: either a scalar or one nested scalar mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(Scalar),
    Map(Vec<(String, Scalar)>),
}

/// One loosely-typed record in source order.
///
/// Fields keep their source order; assigning an existing key overwrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The scalar stored under `key`, if the field exists and is a scalar.
    pub fn scalar(&self, key: &str) -> Option<&Scalar> {
        match self.get(key) {
            Some(RawValue::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// The nested mapping stored under `key`, if the field is a mapping.
    pub fn map(&self, key: &str) -> Option<&[(String, Scalar)]> {
        match self.get(key) {
            Some(RawValue::Map(m)) => Some(m),
            _ => None,
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Look up a scalar in a nested mapping.
pub fn map_scalar<'a>(map: &'a [(String, Scalar)], key: &str) -> Option<&'a Scalar> {
    map.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Decode raw config text into an ordered sequence of records.
///
/// Never fails: unrecognized lines are skipped, and malformed records simply
/// come out with fewer fields for the normalizer to default.
pub fn decode_records(input: &str) -> Vec<RawRecord> {
    let mut records: Vec<RawRecord> = Vec::new();
    let mut current: Option<RawRecord> = None;
    // Open nested section: (section key, accumulated entries).
    let mut nested: Option<(String, Vec<(String, Scalar)>)> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed == "-" || trimmed.starts_with("- ") {
            close_nested(&mut nested, &mut current);
            if let Some(done) = current.take() {
                records.push(done);
            }
            let mut record = RawRecord::new();
            let rest = trimmed[1..].trim_start();
            if let Some((key, value)) = split_key_value(rest) {
                record.insert(key, RawValue::Scalar(Scalar::coerce(value)));
            }
            current = Some(record);
            continue;
        }

        let Some((key, value)) = split_key_value(trimmed) else {
            continue;
        };

        let indent = leading_spaces(line);
        if nested.is_some() && (indent == 4 || indent == 6) {
            if let Some((_, entries)) = nested.as_mut() {
                entries.push((key.to_owned(), Scalar::coerce(value)));
            }
            continue;
        }

        // Any top-level key ends an open nested section.
        close_nested(&mut nested, &mut current);

        let Some(record) = current.as_mut() else {
            // Key/value outside any record; nothing to attach it to.
            continue;
        };

        if value.is_empty() && NESTED_KEYS.contains(&key) {
            nested = Some((key.to_owned(), Vec::new()));
        } else {
            record.insert(key, RawValue::Scalar(Scalar::coerce(value)));
        }
    }

    close_nested(&mut nested, &mut current);
    if let Some(done) = current.take() {
        records.push(done);
    }
    records
}

/// Attach an open nested section to the current record.
fn close_nested(
    nested: &mut Option<(String, Vec<(String, Scalar)>)>,
    current: &mut Option<RawRecord>,
) {
    if let Some((key, entries)) = nested.take() {
        if let Some(record) = current.as_mut() {
            record.insert(key, RawValue::Map(entries));
        }
    }
}

/// Split a `key: value` line at the first colon. Returns `None` when the
/// line has no colon or an empty key.
fn split_key_value(s: &str) -> Option<(&str, &str)> {
    let (key, value) = s.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

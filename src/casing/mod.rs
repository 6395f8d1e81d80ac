//! Key-casing adapter between the employee API and the screen.
//!
//! The API names fields `first_name`, the screen names them `firstName`. Only keys are
//! rewritten; values pass through untouched, so nested objects keep their own keys.

use serde_json::{Map, Value};

/// A record keyed in either convention, exactly as it crosses the adapter.
pub type RawRecord = Map<String, Value>;

/// Rename every key from the server convention (`gross_salary`) to the client
/// convention (`grossSalary`).
pub fn to_internal(record: RawRecord) -> RawRecord {
    record
        .into_iter()
        .map(|(key, value)| (snake_to_camel(&key), value))
        .collect()
}

/// Rename every key from the client convention to the server convention.
pub fn to_external(record: RawRecord) -> RawRecord {
    record
        .into_iter()
        .map(|(key, value)| (camel_to_snake(&key), value))
        .collect()
}

/// Adapt a whole listing to the client convention, preserving order.
pub fn list_to_internal(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records.into_iter().map(to_internal).collect()
}

/// `_` followed by a lowercase ASCII letter collapses into the uppercase letter.
/// Any other underscore is kept as-is.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}

/// Every uppercase ASCII letter becomes `_` plus its lowercase form.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);

    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

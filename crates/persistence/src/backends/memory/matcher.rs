//! Filter evaluation against in-memory documents.
//!
//! Semantics follow the Mongo query dialect the filters render to:
//!
//! - `{field: null}` matches a null or missing field
//! - equality against an array field matches if any element is equal
//! - numbers compare by value (`1` equals `1.0`)
//! - range bounds only compare against values of the same kind: dates
//!   against RFC 3339 strings, epochs against numbers

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{Document, Filter, Fragment, RangeBound, RangeValue};

/// Returns true if `document` satisfies every fragment of `filter`.
pub fn matches(document: &Document, filter: &Filter) -> bool {
    filter
        .fragments()
        .iter()
        .all(|fragment| fragment_matches(document, fragment))
}

fn fragment_matches(document: &Document, fragment: &Fragment) -> bool {
    match fragment {
        Fragment::Eq { field, value } => {
            let actual = document.get(field);
            if value.is_null() {
                return actual.is_none_or(Value::is_null);
            }
            actual.is_some_and(|actual| {
                values_equal(actual, value)
                    || matches!(actual, Value::Array(items) if items.iter().any(|item| values_equal(item, value)))
            })
        }
        Fragment::Range {
            field,
            lower,
            upper,
        } => {
            let Some(actual) = document.get(field) else {
                return false;
            };
            lower.is_none_or(|bound| satisfies(actual, &bound, Ordering::Greater))
                && upper.is_none_or(|bound| satisfies(actual, &bound, Ordering::Less))
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// `wanted` is the ordering of the stored value relative to the bound that
/// satisfies it strictly.
fn satisfies(actual: &Value, bound: &RangeBound, wanted: Ordering) -> bool {
    match compare(actual, &bound.value) {
        Some(Ordering::Equal) => bound.inclusive,
        Some(ordering) => ordering == wanted,
        None => false,
    }
}

fn compare(actual: &Value, bound: &RangeValue) -> Option<Ordering> {
    match bound {
        RangeValue::Date(bound) => {
            let actual = actual.as_str()?;
            let actual: DateTime<Utc> = DateTime::parse_from_rfc3339(actual).ok()?.into();
            Some(actual.cmp(bound))
        }
        RangeValue::Epoch(bound) => match actual {
            Value::Number(number) => match number.as_i64() {
                Some(actual) => Some(actual.cmp(bound)),
                None => number.as_f64()?.partial_cmp(&(*bound as f64)),
            },
            _ => None,
        },
    }
}

/// Keeps only `fields` (and `_id`) of `document`.
pub fn project(document: &Document, fields: &[String]) -> Document {
    document
        .iter()
        .filter(|(key, _)| *key == "_id" || fields.iter().any(|field| field == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

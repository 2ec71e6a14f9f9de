//! Filter expressions and update patches.
//!
//! A [`Filter`] is an ordered conjunction of [`Fragment`]s. Each fragment
//! constrains exactly one field, either by equality or by an optionally
//! open-ended range. An empty filter matches every document.
//!
//! Filters render to the Mongo query dialect through [`Filter::to_json`],
//! which is what backends speaking that dialect consume and what the
//! repositories log.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use super::Document;

/// A value placed in a range fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeValue {
    /// Compared as a calendar timestamp.
    Date(DateTime<Utc>),
    /// Compared as milliseconds since the Unix epoch.
    Epoch(i64),
}

impl RangeValue {
    /// Renders the value the way it is stored in documents.
    pub fn to_json(&self) -> Value {
        match self {
            RangeValue::Date(date) => {
                Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            RangeValue::Epoch(millis) => Value::from(*millis),
        }
    }
}

/// One side of a range fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBound {
    /// The bound value.
    pub value: RangeValue,
    /// Whether a value equal to the bound satisfies it.
    pub inclusive: bool,
}

impl RangeBound {
    /// Creates a strict (`>` / `<`) bound.
    pub fn exclusive(value: RangeValue) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Creates an inclusive (`>=` / `<=`) bound.
    pub fn inclusive(value: RangeValue) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }
}

/// A predicate on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// The field equals the value. A `null` value also matches a missing field.
    Eq { field: String, value: Value },

    /// The field lies within the bounds. At least one bound is present.
    Range {
        field: String,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    },
}

impl Fragment {
    /// Creates an equality fragment.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Fragment::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the constrained field.
    pub fn field(&self) -> &str {
        match self {
            Fragment::Eq { field, .. } | Fragment::Range { field, .. } => field,
        }
    }

    /// Renders the fragment as a Mongo query document.
    pub fn to_json(&self) -> Value {
        match self {
            Fragment::Eq { field, value } => {
                let mut fragment = Map::new();
                fragment.insert(field.clone(), value.clone());
                Value::Object(fragment)
            }
            Fragment::Range {
                field,
                lower,
                upper,
            } => {
                let mut operators = Map::new();
                if let Some(lower) = lower {
                    let op = if lower.inclusive { "$gte" } else { "$gt" };
                    operators.insert(op.to_string(), lower.value.to_json());
                }
                if let Some(upper) = upper {
                    let op = if upper.inclusive { "$lte" } else { "$lt" };
                    operators.insert(op.to_string(), upper.value.to_json());
                }
                let mut fragment = Map::new();
                fragment.insert(field.clone(), Value::Object(operators));
                Value::Object(fragment)
            }
        }
    }
}

/// A conjunction of fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fragments: Vec<Fragment>,
}

impl Filter {
    /// The empty conjunction.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Creates a filter from fragments, keeping their order.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Appends a fragment.
    pub fn with(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Returns the fragments in order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns true if the filter has no fragments.
    pub fn is_match_all(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the filter has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the constrained field names, in fragment order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fragments.iter().map(Fragment::field).collect()
    }

    /// Renders the filter as a Mongo query document (`{}` when empty).
    pub fn to_json(&self) -> Value {
        if self.fragments.is_empty() {
            return json!({});
        }
        let clauses: Vec<Value> = self.fragments.iter().map(Fragment::to_json).collect();
        json!({ "$and": clauses })
    }
}

impl From<Vec<Fragment>> for Filter {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self::new(fragments)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A field-level patch (`$set`): fields not named are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePatch {
    set: Document,
}

impl UpdatePatch {
    /// Creates a patch setting every field of `set`.
    pub fn set(set: Document) -> Self {
        Self { set }
    }

    /// Returns the fields to set.
    pub fn fields(&self) -> &Document {
        &self.set
    }

    /// Returns the names of the fields to set.
    pub fn field_names(&self) -> Vec<&str> {
        self.set.keys().map(String::as_str).collect()
    }

    /// Renders the patch as a Mongo update document.
    pub fn to_json(&self) -> Value {
        json!({ "$set": Value::Object(self.set.clone()) })
    }
}

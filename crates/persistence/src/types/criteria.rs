//! Search criteria.
//!
//! [`SearchCriteria`] is a loosely-typed, ordered bag of field constraints:
//! a partial record where every field may be absent. Entity-specific search
//! types ([`crate::records::PatientSearch`], ...) lower themselves into it,
//! and the criteria builder in [`crate::search`] turns it into a
//! [`Filter`](super::Filter).

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::Document;

/// The value a criterion carries.
///
/// `Absent` and `Null` are different things: an absent criterion places no
/// constraint, while `Null` asks for the field to be null or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    /// No constraint.
    Absent,
    /// Explicit null.
    Null,
    /// A scalar (string, number, boolean) or object compared by equality.
    Scalar(Value),
    /// A calendar value, only usable as a range bound.
    Date(DateTime<Utc>),
    /// A collection value, never compared by equality.
    List(Vec<Value>),
}

impl CriterionValue {
    /// Returns true if the criterion places no constraint.
    pub fn is_absent(&self) -> bool {
        matches!(self, CriterionValue::Absent)
    }

    /// Returns the date if this is a calendar value.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            CriterionValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<Value> for CriterionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CriterionValue::Null,
            Value::Array(items) => CriterionValue::List(items),
            other => CriterionValue::Scalar(other),
        }
    }
}

impl From<DateTime<Utc>> for CriterionValue {
    fn from(date: DateTime<Utc>) -> Self {
        CriterionValue::Date(date)
    }
}

/// An ordered set of named criteria.
///
/// Field order is the insertion order; setting an existing field replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    entries: Vec<(String, CriterionValue)>,
}

impl SearchCriteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds criteria from a JSON object. Keys map to `Null`, `List` or
    /// `Scalar` by value type; dates are never inferred from strings.
    ///
    /// A [`Document`] keeps its keys sorted, so the criteria take that sorted
    /// order rather than the order of the original request body. Use
    /// [`with`](Self::with) to control field order.
    pub fn from_json(document: Document) -> Self {
        let mut criteria = Self::new();
        for (field, value) in document {
            criteria.set(field, CriterionValue::from(value));
        }
        criteria
    }

    /// Sets a criterion, replacing any previous value for the field.
    pub fn set(&mut self, field: impl Into<String>, value: CriterionValue) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, field: impl Into<String>, value: CriterionValue) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a scalar criterion, or `Absent` when `value` is `None`.
    pub fn with_optional<T: Into<Value>>(self, field: impl Into<String>, value: Option<T>) -> Self {
        let value = match value {
            Some(value) => CriterionValue::from(value.into()),
            None => CriterionValue::Absent,
        };
        self.with(field, value)
    }

    /// Sets a date criterion, or `Absent` when `value` is `None`.
    pub fn with_optional_date(
        self,
        field: impl Into<String>,
        value: Option<DateTime<Utc>>,
    ) -> Self {
        let value = value.map_or(CriterionValue::Absent, CriterionValue::Date);
        self.with(field, value)
    }

    /// Returns the criterion for a field.
    pub fn get(&self, field: &str) -> Option<&CriterionValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Removes and returns the criterion for a field.
    pub fn remove(&mut self, field: &str) -> Option<CriterionValue> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &CriterionValue) -> bool) {
        self.entries.retain(|(name, value)| keep(name, value));
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriterionValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names, in order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of entries, absent ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_classifies_values() {
        let document = json!({
            "gender": "male",
            "insuranceNumber": null,
            "tags": ["a", "b"]
        });
        let Value::Object(document) = document else {
            unreachable!()
        };

        let criteria = SearchCriteria::from_json(document);
        assert_eq!(
            criteria.get("gender"),
            Some(&CriterionValue::Scalar(json!("male")))
        );
        assert_eq!(criteria.get("insuranceNumber"), Some(&CriterionValue::Null));
        assert_eq!(
            criteria.get("tags"),
            Some(&CriterionValue::List(vec![json!("a"), json!("b")]))
        );
    }

    #[test]
    fn test_from_json_fields_follow_sorted_keys() {
        let document: Document =
            serde_json::from_str(r#"{"postCode": "1234", "gender": "male", "lastName": "Doe"}"#)
                .unwrap();
        let criteria = SearchCriteria::from_json(document);
        assert_eq!(criteria.fields(), vec!["gender", "lastName", "postCode"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let criteria = SearchCriteria::new()
            .with_optional("lastName", Some("Doe"))
            .with_optional::<String>("postCode", None)
            .with_optional("lastName", Some("Roe"));

        assert_eq!(criteria.fields(), vec!["lastName", "postCode"]);
        assert_eq!(
            criteria.get("lastName"),
            Some(&CriterionValue::Scalar(json!("Roe")))
        );
        assert!(criteria.get("postCode").is_some_and(CriterionValue::is_absent));
    }

    #[test]
    fn test_remove() {
        let mut criteria = SearchCriteria::new()
            .with("a", CriterionValue::Null)
            .with("b", CriterionValue::Null);
        assert_eq!(criteria.remove("a"), Some(CriterionValue::Null));
        assert_eq!(criteria.remove("a"), None);
        assert_eq!(criteria.fields(), vec!["b"]);
    }
}

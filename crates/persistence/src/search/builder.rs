//! Criteria-to-filter construction.
//!
//! Turns a [`SearchCriteria`] into a [`Filter`]. Every function here is pure:
//! the same criteria always produce the same fragments in the same order
//! (equality fragments in criteria order, then one range fragment per
//! declared date range that has a bound).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{CriterionValue, Filter, Fragment, RangeBound, RangeValue, SearchCriteria};

use super::dates::{end_of_previous_day, start_of_next_day};

/// How a date range is turned into bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeOptions {
    /// Place millisecond timestamps in the fragment instead of dates.
    pub use_epoch: bool,
    /// Use the bounds exactly as given (inclusive) instead of widening them
    /// to whole calendar days.
    pub precise: bool,
}

impl DateRangeOptions {
    /// Calendar-day widening, date values.
    pub const CALENDAR_DAY: Self = Self {
        use_epoch: false,
        precise: false,
    };

    /// Exact inclusive bounds, millisecond timestamps.
    pub const PRECISE_EPOCH: Self = Self {
        use_epoch: true,
        precise: true,
    };
}

/// A date range an entity can be searched by: the pair of criteria keys
/// holding the bounds and the stored field they constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeField {
    /// Criteria key of the lower bound.
    pub from: &'static str,
    /// Criteria key of the upper bound.
    pub to: &'static str,
    /// Stored comparison field.
    pub target: &'static str,
    /// Bound handling.
    pub options: DateRangeOptions,
}

/// Drops every absent criterion. Idempotent.
pub fn strip_absent_fields(mut criteria: SearchCriteria) -> SearchCriteria {
    criteria.retain(|_, value| !value.is_absent());
    criteria
}

/// Emits one equality fragment per scalar or null criterion.
///
/// Dates and lists are skipped: they need range or membership semantics.
pub fn build_equality_fragments(criteria: &SearchCriteria) -> Vec<Fragment> {
    criteria
        .iter()
        .filter_map(|(field, value)| match value {
            CriterionValue::Scalar(value) => Some(Fragment::eq(field, value.clone())),
            CriterionValue::Null => Some(Fragment::eq(field, Value::Null)),
            CriterionValue::Absent | CriterionValue::Date(_) | CriterionValue::List(_) => None,
        })
        .collect()
}

/// Appends a range fragment on `target_field` for whichever bounds are present.
///
/// In calendar-day mode the lower bound becomes a strict bound at the end of
/// the previous day and the upper bound a strict bound at the start of the
/// next day, so both bound days are fully included. In precise mode both
/// bounds are used as given, inclusively. Nothing is appended when both
/// bounds are absent, or when a widened bound falls outside the representable
/// dates and the other bound is absent.
pub fn build_date_range_fragment(
    lower: Option<DateTime<Utc>>,
    upper: Option<DateTime<Utc>>,
    target_field: &str,
    fragments: &mut Vec<Fragment>,
    options: DateRangeOptions,
) {
    if lower.is_none() && upper.is_none() {
        return;
    }

    let to_value = |date: DateTime<Utc>| {
        if options.use_epoch {
            RangeValue::Epoch(date.timestamp_millis())
        } else {
            RangeValue::Date(date)
        }
    };

    // A widened bound past either end of the calendar constrains nothing.
    let (lower, upper) = if options.precise {
        (
            lower.map(|date| RangeBound::inclusive(to_value(date))),
            upper.map(|date| RangeBound::inclusive(to_value(date))),
        )
    } else {
        (
            lower
                .and_then(end_of_previous_day)
                .map(|date| RangeBound::exclusive(to_value(date))),
            upper
                .and_then(start_of_next_day)
                .map(|date| RangeBound::exclusive(to_value(date))),
        )
    };
    if lower.is_none() && upper.is_none() {
        return;
    }

    fragments.push(Fragment::Range {
        field: target_field.to_string(),
        lower,
        upper,
    });
}

/// Builds the full filter for `criteria`.
///
/// Bound keys named by `ranges` never produce equality fragments, whatever
/// their value; a bound that is not a date counts as absent.
pub fn build_filter(criteria: SearchCriteria, ranges: &[DateRangeField]) -> Filter {
    let mut criteria = strip_absent_fields(criteria);

    let bounds: Vec<_> = ranges
        .iter()
        .map(|range| {
            let lower = criteria.remove(range.from).and_then(|v| v.as_date());
            let upper = criteria.remove(range.to).and_then(|v| v.as_date());
            (range, lower, upper)
        })
        .collect();

    let mut fragments = build_equality_fragments(&criteria);
    for (range, lower, upper) in bounds {
        build_date_range_fragment(lower, upper, range.target, &mut fragments, range.options);
    }

    Filter::new(fragments)
}

//! Query criteria builder.
//!
//! This module turns partial search requests into store-agnostic filters:
//!
//! - [`builder`] - Absent-field stripping, equality fragments, date ranges
//! - [`dates`] - Calendar-day normalization and partial-date parsing
//!
//! # Date Ranges
//!
//! ```text
//! calendar-day mode   from=2020-05-01  ->  field >  2020-04-30T23:59:59.999Z
//!                     to=2020-05-01    ->  field <  2020-05-02T00:00:00Z
//!
//! precise mode        from=T1          ->  field >= T1
//!                     to=T2            ->  field <= T2
//! ```
//!
//! With `use_epoch` the bounds are millisecond timestamps instead of dates.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use patient_tests_persistence::search::{DateRangeField, DateRangeOptions, build_filter};
//! use patient_tests_persistence::types::SearchCriteria;
//!
//! const DOB: DateRangeField = DateRangeField {
//!     from: "dateOfBirthFrom",
//!     to: "dateOfBirthTo",
//!     target: "_dateOfBirthDate",
//!     options: DateRangeOptions::CALENDAR_DAY,
//! };
//!
//! let criteria = SearchCriteria::new()
//!     .with_optional("gender", Some("female"))
//!     .with_optional::<String>("lastName", None)
//!     .with_optional_date("dateOfBirthFrom", Some(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()));
//!
//! let filter = build_filter(criteria, &[DOB]);
//! assert_eq!(filter.field_names(), vec!["gender", "_dateOfBirthDate"]);
//! ```

pub mod builder;
pub mod dates;

pub use builder::{
    DateRangeField, DateRangeOptions, build_date_range_fragment, build_equality_fragments,
    build_filter, strip_absent_fields,
};
pub use dates::{end_of_previous_day, parse_partial_date, start_of_day, start_of_next_day};

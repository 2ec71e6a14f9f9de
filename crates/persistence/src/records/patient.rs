//! Patient records.

// Record fields are named after the stored camelCase schema
#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StorageResult, ValidationError};
use crate::search::{DateRangeField, DateRangeOptions, parse_partial_date};
use crate::types::{Document, SearchCriteria};

use super::{Entity, require_id, strip_reserved};

/// Date-of-birth range: calendar-day widening on the derived date.
pub const DATE_OF_BIRTH_RANGE: DateRangeField = DateRangeField {
    from: "dateOfBirthFrom",
    to: "dateOfBirthTo",
    target: "_dateOfBirthDate",
    options: DateRangeOptions::CALENDAR_DAY,
};

/// Administrative gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
            Gender::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "unknown" => Ok(Gender::Unknown),
            _ => Err(ValidationError::InvalidValue {
                field: "gender".to_string(),
                message: format!("expected male, female, other or unknown, got {:?}", s),
            }),
        }
    }
}

/// A patient as callers see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub gender: Gender,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub post_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Fields outside the schema, kept as given.
    #[serde(flatten)]
    pub extra: Document,
}

impl Patient {
    /// Creates a patient with the required fields set.
    pub fn new(
        id: impl Into<String>,
        gender: Gender,
        date_of_birth: impl Into<String>,
        post_code: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            first_name: None,
            last_name: None,
            full_name: None,
            gender,
            date_of_birth: date_of_birth.into(),
            post_code: post_code.into(),
            insurance_number: None,
            preferred_contact_number: None,
            last_updated: None,
            extra: Document::new(),
        }
    }

    /// Sets the first name.
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// A patient as written to the store.
///
/// `_dateOfBirthDate` is always written (null when the date of birth cannot
/// be parsed) so an update never leaves a stale derived date behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPatient {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(rename = "_id")]
    pub primary_key: String,
    #[serde(rename = "_shardKey")]
    pub shard_key: String,
    #[serde(rename = "_dateOfBirthDate", default)]
    pub date_of_birth_date: Option<DateTime<Utc>>,
}

/// Patient search request. Every field is optional; unset fields place no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientSearch {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<String>,
    pub post_code: Option<String>,
    pub insurance_number: Option<String>,
    pub preferred_contact_number: Option<String>,
    pub date_of_birth_from: Option<DateTime<Utc>>,
    pub date_of_birth_to: Option<DateTime<Utc>>,
}

impl Entity for Patient {
    const KIND: &'static str = "Patient";
    const DATE_RANGES: &'static [DateRangeField] = &[DATE_OF_BIRTH_RANGE];

    type Stored = StoredPatient;
    type Search = PatientSearch;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn into_stored(mut self) -> StorageResult<StoredPatient> {
        let id = require_id(self.id())?;
        strip_reserved(&mut self.extra, Self::DATE_RANGES);
        let date_of_birth_date = parse_partial_date(&self.date_of_birth);

        Ok(StoredPatient {
            patient: self,
            primary_key: id.clone(),
            shard_key: id,
            date_of_birth_date,
        })
    }

    fn from_stored(stored: StoredPatient) -> Self {
        let mut patient = stored.patient;
        strip_reserved(&mut patient.extra, Self::DATE_RANGES);
        patient
    }

    fn search_criteria(search: &PatientSearch) -> SearchCriteria {
        SearchCriteria::new()
            .with_optional("id", search.id.clone())
            .with_optional("firstName", search.first_name.clone())
            .with_optional("lastName", search.last_name.clone())
            .with_optional("fullName", search.full_name.clone())
            .with_optional("gender", search.gender.map(|gender| gender.to_string()))
            .with_optional("dateOfBirth", search.date_of_birth.clone())
            .with_optional("postCode", search.post_code.clone())
            .with_optional("insuranceNumber", search.insurance_number.clone())
            .with_optional(
                "preferredContactNumber",
                search.preferred_contact_number.clone(),
            )
            .with_optional_date(DATE_OF_BIRTH_RANGE.from, search.date_of_birth_from)
            .with_optional_date(DATE_OF_BIRTH_RANGE.to, search.date_of_birth_to)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;
    use crate::types::CriterionValue;

    fn doe() -> Patient {
        Patient::new("p1", Gender::Male, "1990-05-07", "1234").with_last_name("Doe")
    }

    #[test]
    fn test_gender_round_trips_through_str() {
        for gender in [Gender::Male, Gender::Female, Gender::Other, Gender::Unknown] {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        let err = "x".parse::<Gender>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "gender"));
        assert_eq!(
            err.to_string(),
            "invalid value for gender: expected male, female, other or unknown, got \"x\""
        );
    }

    #[test]
    fn test_stored_document_shape() {
        let stored = doe().into_stored().unwrap();
        let value = serde_json::to_value(&stored).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "p1",
                "lastName": "Doe",
                "gender": "male",
                "dateOfBirth": "1990-05-07",
                "postCode": "1234",
                "_id": "p1",
                "_shardKey": "p1",
                "_dateOfBirthDate": "1990-05-07T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_partial_date_of_birth_derives_start_of_period() {
        let stored = Patient::new("p1", Gender::Other, "1990-05", "1234")
            .into_stored()
            .unwrap();
        assert_eq!(
            stored.date_of_birth_date,
            Some(Utc.with_ymd_and_hms(1990, 5, 1, 0, 0, 0).unwrap())
        );

        let stored = Patient::new("p1", Gender::Other, "not a date", "1234")
            .into_stored()
            .unwrap();
        assert_eq!(stored.date_of_birth_date, None);
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["_dateOfBirthDate"], Value::Null);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut patient = doe();
        patient.id = None;
        assert!(patient.into_stored().is_err());
    }

    #[test]
    fn test_from_stored_drops_persistence_fields() {
        let mut patient = doe();
        patient.extra.insert("nickname".to_string(), json!("JD"));
        let document = serde_json::to_value(patient.clone().into_stored().unwrap()).unwrap();

        let stored: StoredPatient = serde_json::from_value(document).unwrap();
        let restored = Patient::from_stored(stored);

        assert_eq!(restored, patient);
        let value = serde_json::to_value(&restored).unwrap();
        assert!(value.as_object().unwrap().keys().all(|k| !k.starts_with('_')));
    }

    #[test]
    fn test_reserved_extra_fields_are_not_persisted() {
        let mut patient = doe();
        patient.extra.insert("_shardKey".to_string(), json!("other"));
        let value = serde_json::to_value(patient.into_stored().unwrap()).unwrap();
        assert_eq!(value["_shardKey"], json!("p1"));
    }

    #[test]
    fn test_search_criteria_order_and_absence() {
        let search = PatientSearch {
            last_name: Some("Doe".to_string()),
            gender: Some(Gender::Male),
            date_of_birth_to: Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let criteria = Patient::search_criteria(&search);

        assert_eq!(criteria.get("lastName"), Some(&CriterionValue::Scalar(json!("Doe"))));
        assert_eq!(criteria.get("gender"), Some(&CriterionValue::Scalar(json!("male"))));
        assert!(criteria.get("firstName").unwrap().is_absent());
        assert!(criteria.get("dateOfBirthTo").unwrap().as_date().is_some());
    }

    #[test]
    fn test_search_deserializes_from_camel_case() {
        let search: PatientSearch = serde_json::from_value(json!({
            "gender": "female",
            "dateOfBirthFrom": "2020-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(search.gender, Some(Gender::Female));
        assert_eq!(
            search.date_of_birth_from,
            Some(Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap())
        );
    }
}

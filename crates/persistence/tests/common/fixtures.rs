//! Record fixtures.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use patient_tests_persistence::backends::memory::MemoryCollection;
use patient_tests_persistence::records::{Gender, Patient, PatientTest};
use patient_tests_persistence::repository::{PatientRepository, PatientTestRepository};

/// Returns a fresh random id.
pub fn random_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The patient used by the end-to-end example.
pub fn doe() -> Patient {
    Patient::new("p1", Gender::Male, "1990-05-07", "1234").with_last_name("Doe")
}

/// A patient with a random id.
pub fn patient(gender: Gender, date_of_birth: &str) -> Patient {
    Patient::new(random_id(), gender, date_of_birth, "4000")
}

/// A patient test last updated at `time`.
pub fn test_at(id: &str, patient_id: &str, time: DateTime<Utc>) -> PatientTest {
    PatientTest::new(id, patient_id).updated_at(time)
}

/// A UTC timestamp with whole seconds.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("valid fixture timestamp")
}

/// A patient repository over a fresh in-memory collection.
pub fn memory_patients() -> (Arc<MemoryCollection>, PatientRepository) {
    let collection = Arc::new(MemoryCollection::new("patients"));
    (collection.clone(), PatientRepository::new(collection))
}

/// A patient-test repository over a fresh in-memory collection.
pub fn memory_tests() -> (Arc<MemoryCollection>, PatientTestRepository) {
    let collection = Arc::new(MemoryCollection::new("tests"));
    (collection.clone(), PatientTestRepository::new(collection))
}

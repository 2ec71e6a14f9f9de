//! Persistence configuration.
//!
//! Settings are read from environment variables (or command line flags when a
//! binary embeds them), with defaults suitable for local runs against the
//! in-memory store.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PATIENT_TEST_DATABASE` | patient_test | Database name |
//! | `PATIENT_COLLECTION` | patients | Patient collection |
//! | `TEST_COLLECTION` | tests | Patient-test collection |
//! | `MONGO_CONNECTION_STRING` | memory:// | Store connection string |
//! | `ALLOW_SELF_SIGNED_MONGO_CERT` | false | Accept self-signed store certificates |
//! | `LOG_LEVEL` | info | Log level |
//! | `ENABLE_DEPENDENCY_TELEMETRY` | true | Report every storage call to the telemetry sink |
//!
//! # Example
//!
//! ```rust
//! use patient_tests_persistence::Settings;
//!
//! // Create from environment
//! let settings = Settings::from_env();
//!
//! // Or create programmatically
//! let settings = Settings {
//!     patient_collection: "patients_v2".to_string(),
//!     ..Default::default()
//! };
//! assert!(settings.validate().is_ok());
//! ```

use clap::Parser;

/// Settings for the persistence layer.
#[derive(Debug, Clone, Parser)]
#[command(name = "patient-tests")]
#[command(about = "Patient Tests API persistence settings")]
pub struct Settings {
    /// Database name.
    #[arg(long, env = "PATIENT_TEST_DATABASE", default_value = "patient_test")]
    pub database: String,

    /// Collection holding patient records.
    #[arg(long, env = "PATIENT_COLLECTION", default_value = "patients")]
    pub patient_collection: String,

    /// Collection holding patient-test records.
    #[arg(long, env = "TEST_COLLECTION", default_value = "tests")]
    pub test_collection: String,

    /// Store connection string.
    #[arg(long, env = "MONGO_CONNECTION_STRING", default_value = "memory://")]
    pub connection_string: String,

    /// Accept self-signed TLS certificates from the store.
    #[arg(long, env = "ALLOW_SELF_SIGNED_MONGO_CERT", default_value = "false")]
    pub allow_self_signed_cert: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Wrap collections with the telemetry decorator.
    #[arg(long, env = "ENABLE_DEPENDENCY_TELEMETRY", default_value = "true")]
    pub enable_dependency_telemetry: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: "patient_test".to_string(),
            patient_collection: "patients".to_string(),
            test_collection: "tests".to_string(),
            connection_string: "memory://".to_string(),
            allow_self_signed_cert: false,
            log_level: "info".to_string(),
            enable_dependency_telemetry: true,
        }
    }
}

impl Settings {
    /// Creates settings from environment variables only, ignoring the process
    /// arguments, and falls back to defaults if they cannot be parsed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["patient-tests"]).unwrap_or_default()
    }

    /// Validates the settings and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.database.trim().is_empty() {
            errors.push("Database name cannot be empty".to_string());
        }

        if self.patient_collection.trim().is_empty() {
            errors.push("Patient collection cannot be empty".to_string());
        }

        if self.test_collection.trim().is_empty() {
            errors.push("Test collection cannot be empty".to_string());
        }

        if self.patient_collection == self.test_collection {
            errors.push("Patient and test collections must differ".to_string());
        }

        if self.connection_string.trim().is_empty() {
            errors.push("Connection string cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates settings suitable for testing: in-memory store, debug logging.
    pub fn for_testing() -> Self {
        Self {
            database: "patient_test_it".to_string(),
            log_level: "debug".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.patient_collection, "patients");
        assert_eq!(settings.test_collection, "tests");
        assert!(settings.enable_dependency_telemetry);
        assert!(!settings.allow_self_signed_cert);
    }

    #[test]
    fn test_parse_flags() {
        let settings = Settings::try_parse_from([
            "patient-tests",
            "--patient-collection",
            "people",
            "--allow-self-signed-cert",
        ])
        .unwrap();
        assert_eq!(settings.patient_collection, "people");
        assert!(settings.allow_self_signed_cert);
    }

    #[test]
    fn test_validate_valid() {
        assert!(Settings::default().validate().is_ok());
        assert!(Settings::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_same_collections() {
        let settings = Settings {
            test_collection: "patients".to_string(),
            ..Default::default()
        };
        let result = settings.validate();
        assert!(result.unwrap_err().iter().any(|e| e.contains("must differ")));
    }

    #[test]
    fn test_validate_empty_values() {
        let settings = Settings {
            database: " ".to_string(),
            connection_string: String::new(),
            ..Default::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

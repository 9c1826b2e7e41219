//! Patient models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::choices::{OptionSet, YesNo};
use super::facility::Facility;

/// Working copy of a patient record as edited on the patient form.
///
/// Every editable field is kept exactly as the widget emitted it. The
/// record identifier is not part of the record: it belongs to the screen
/// that opened it (see `form::PatientFormScreen`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientRecord {
    /// External identifier (optional)
    pub lookup_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// Date of birth as emitted by the date widget (`YYYY-MM-DD`)
    pub birth_date: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    /// Biological sex
    pub gender: Option<String>,
    /// STAFF, RESIDENT, STUDENT or VISITOR
    pub role: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub street_two: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    pub zip_code: Option<String>,
    /// Facility the record is restricted to; `None` means all facilities
    pub facility: Option<Facility>,
    pub resident_congregate_setting: Option<YesNo>,
    pub employed_in_healthcare: Option<YesNo>,
    /// Checkbox groups keyed by widget name
    pub option_sets: BTreeMap<String, OptionSet>,
    /// Test history, display only
    pub test_results: Vec<TestResult>,
}

impl PatientRecord {
    /// Name shown in the heading and breadcrumbs for an existing record.
    pub fn full_name(&self) -> String {
        display_full_name(
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

/// A past test shown in the record's history table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// RFC 3339 timestamp
    pub date_tested: String,
    pub result: String,
}

impl TestResult {
    /// Localized medium date-time, e.g. `Jan 5, 2021 3:04 PM`.
    ///
    /// Falls back to the raw value when it is not a valid timestamp.
    pub fn display_date(&self) -> String {
        match chrono::DateTime::parse_from_rfc3339(&self.date_tested) {
            Ok(ts) => ts.format("%b %-d, %Y %-I:%M %p").to_string(),
            Err(_) => self.date_tested.clone(),
        }
    }
}

/// Join the non-empty name parts with single spaces.
pub fn display_full_name(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> String {
    [first, middle, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_missing_parts() {
        let record = PatientRecord {
            first_name: Some("Jane".into()),
            middle_name: Some("".into()),
            last_name: Some("Doe".into()),
            ..Default::default()
        };
        assert_eq!(record.full_name(), "Jane Doe");
    }

    #[test]
    fn test_full_name_with_middle() {
        assert_eq!(
            display_full_name(Some("Jane"), Some("Q"), Some("Doe")),
            "Jane Q Doe"
        );
        assert_eq!(display_full_name(None, None, None), "");
    }

    #[test]
    fn test_display_date() {
        let result = TestResult {
            date_tested: "2021-01-05T15:04:00Z".into(),
            result: "NEGATIVE".into(),
        };
        assert_eq!(result.display_date(), "Jan 5, 2021 3:04 PM");
    }

    #[test]
    fn test_display_date_fallback() {
        let result = TestResult {
            date_tested: "yesterday".into(),
            result: "POSITIVE".into(),
        };
        assert_eq!(result.display_date(), "yesterday");
    }

    #[test]
    fn test_deserialize_loaded_record() {
        let json = r#"{
            "firstName": "Jane",
            "lastName": "Doe",
            "birthDate": "1990-01-01",
            "residentCongregateSetting": "NO",
            "employedInHealthcare": "YES",
            "facility": {"id": "fac-1", "name": "Main Clinic"},
            "testResults": [{"dateTested": "2021-01-05T15:04:00Z", "result": "NEGATIVE"}]
        }"#;

        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.first_name.as_deref(), Some("Jane"));
        assert_eq!(record.resident_congregate_setting, Some(YesNo::No));
        assert_eq!(record.employed_in_healthcare, Some(YesNo::Yes));
        assert_eq!(record.facility.unwrap().id, "fac-1");
        assert_eq!(record.test_results.len(), 1);
        assert!(record.street.is_none());
    }
}

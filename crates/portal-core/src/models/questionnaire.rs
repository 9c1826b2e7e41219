//! Time-of-test questionnaire answers ("ask on entry").

use serde::{Deserialize, Serialize};

use super::choices::{ChoiceOption, OptionSet};

/// Answers a patient submits before testing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AoeAnswers {
    pub no_symptoms: bool,
    /// Checkbox group keyed by symptom value
    pub symptoms: OptionSet,
    /// Onset date (`YYYY-MM-DD`) when symptomatic
    pub symptom_onset: Option<String>,
    pub first_test: Option<bool>,
    pub prior_test_date: Option<String>,
    pub prior_test_type: Option<String>,
    pub prior_test_result: Option<String>,
    /// SNOMED code from [`PREGNANCY_VALUES`]
    pub pregnancy: Option<String>,
}

impl AoeAnswers {
    /// Tick or untick one symptom. Checking a symptom clears "no symptoms".
    pub fn set_symptom(&mut self, key: &str, checked: bool) {
        self.symptoms.merge(key, checked);
        if checked {
            self.no_symptoms = false;
        }
    }

    pub fn has_symptoms(&self) -> bool {
        !self.symptoms.checked().is_empty()
    }
}

pub const SYMPTOM_VALUES: &[ChoiceOption] = &[
    ChoiceOption { label: "Fever over 100.4F", value: "fever" },
    ChoiceOption { label: "Chills", value: "chills" },
    ChoiceOption { label: "Cough", value: "cough" },
    ChoiceOption { label: "Shortness of breath", value: "shortness_of_breath" },
    ChoiceOption { label: "Fatigue", value: "fatigue" },
    ChoiceOption { label: "Muscle or body aches", value: "body_aches" },
    ChoiceOption { label: "Headache", value: "headache" },
    ChoiceOption { label: "New loss of taste", value: "loss_of_taste" },
    ChoiceOption { label: "New loss of smell", value: "loss_of_smell" },
    ChoiceOption { label: "Sore throat", value: "sore_throat" },
    ChoiceOption { label: "Congestion or runny nose", value: "congestion" },
    ChoiceOption { label: "Nausea or vomiting", value: "nausea" },
    ChoiceOption { label: "Diarrhea", value: "diarrhea" },
];

pub const PREGNANCY_VALUES: &[ChoiceOption] = &[
    ChoiceOption { label: "Yes", value: "77386006" },
    ChoiceOption { label: "No", value: "60001007" },
    ChoiceOption { label: "Would not state", value: "261665006" },
];

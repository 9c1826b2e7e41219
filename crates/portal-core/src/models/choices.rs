//! Fixed value sets offered by the patient form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Two-valued answer kept in its display encoding until the payload is built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum YesNo {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl YesNo {
    /// Decode a radio button value. Only `YES` and `NO` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "YES" => Some(YesNo::Yes),
            "NO" => Some(YesNo::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "YES",
            YesNo::No => "NO",
        }
    }

    /// Network encoding: an unanswered flag counts as "no".
    pub fn is_yes(flag: Option<YesNo>) -> bool {
        flag == Some(YesNo::Yes)
    }
}

/// Checked state of each box in a checkbox group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OptionSet(BTreeMap<String, bool>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one box, keeping every other box as it was.
    pub fn merge(&mut self, key: impl Into<String>, checked: bool) {
        self.0.insert(key.into(), checked);
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Keys of the boxes currently checked, in key order.
    pub fn checked(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A label/value pair for radio groups and dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn choice(label: &'static str, value: &'static str) -> ChoiceOption {
    ChoiceOption { label, value }
}

pub const RACE_VALUES: &[ChoiceOption] = &[
    choice("American Indian or Alaskan Native", "native"),
    choice("Asian", "asian"),
    choice("Black or African American", "black"),
    choice("Native Hawaiian or other Pacific Islander", "pacific"),
    choice("White", "white"),
    choice("Unknown", "unknown"),
    choice("Prefer not to answer", "refused"),
];

pub const ETHNICITY_VALUES: &[ChoiceOption] = &[
    choice("Hispanic or Latino", "hispanic"),
    choice("Not Hispanic", "not_hispanic"),
    choice("Prefer not to answer", "refused"),
];

pub const GENDER_VALUES: &[ChoiceOption] = &[
    choice("Female", "female"),
    choice("Male", "male"),
    choice("Other", "other"),
    choice("Prefer not to answer", "refused"),
];

pub const ROLE_VALUES: &[ChoiceOption] = &[
    choice("-Select-", ""),
    choice("Staff", "STAFF"),
    choice("Resident", "RESIDENT"),
    choice("Student", "STUDENT"),
    choice("Visitor", "VISITOR"),
];

pub const YES_NO_VALUES: &[ChoiceOption] = &[choice("Yes", "YES"), choice("No", "NO")];

/// US states, DC and territories.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AS", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FM", "FL", "GA", "GU", "HI",
    "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MH", "MD", "MA", "MI", "MN", "MS", "MO",
    "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "MP", "OH", "OK", "OR", "PW", "PA",
    "PR", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VI", "VA", "WA", "WV", "WI", "WY",
];

/// Label for a stored value, if it belongs to the set.
pub fn label_for(options: &[ChoiceOption], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
}

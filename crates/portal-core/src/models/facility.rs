//! Facility models.

use serde::{Deserialize, Serialize};

/// Option value reserved for "no single-facility restriction".
pub const ALL_FACILITIES: &str = "~~ALL-FACILITIES~~";

/// A testing facility the user has access to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facility {
    pub id: String,
    pub name: String,
}

impl Facility {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Current value of the facility dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilitySelection {
    /// The "-Select-" placeholder
    Unselected,
    /// The all-facilities sentinel
    AllFacilities,
    /// A concrete facility id
    Facility(String),
}

impl FacilitySelection {
    /// Interpret a raw dropdown value.
    pub fn from_option_value(value: &str) -> Self {
        match value {
            "" => FacilitySelection::Unselected,
            ALL_FACILITIES => FacilitySelection::AllFacilities,
            id => FacilitySelection::Facility(id.to_string()),
        }
    }

    /// The dropdown value for this selection.
    pub fn option_value(&self) -> &str {
        match self {
            FacilitySelection::Unselected => "",
            FacilitySelection::AllFacilities => ALL_FACILITIES,
            FacilitySelection::Facility(id) => id,
        }
    }

    /// Facility id as sent over the network; `None` serializes as null.
    pub fn facility_id(&self) -> Option<String> {
        match self {
            FacilitySelection::AllFacilities => None,
            other => Some(other.option_value().to_string()),
        }
    }
}

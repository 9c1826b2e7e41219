//! Facility dropdown options.

use crate::models::{Facility, FacilitySelection, PatientRecord, ALL_FACILITIES};

/// One entry of the facility dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityOption {
    pub label: String,
    pub value: String,
}

/// Builds the facility dropdown from the injected facility list.
#[derive(Debug, Clone)]
pub struct FacilitySelector {
    options: Vec<FacilityOption>,
}

impl FacilitySelector {
    /// `-Select-` and `All facilities` first, then facilities in source order.
    pub fn new(facilities: &[Facility]) -> Self {
        let mut options = Vec::with_capacity(facilities.len() + 2);
        options.push(FacilityOption {
            label: "-Select-".to_string(),
            value: String::new(),
        });
        options.push(FacilityOption {
            label: "All facilities".to_string(),
            value: ALL_FACILITIES.to_string(),
        });
        options.extend(facilities.iter().map(|f| FacilityOption {
            label: f.name.clone(),
            value: f.id.clone(),
        }));
        Self { options }
    }

    pub fn options(&self) -> &[FacilityOption] {
        &self.options
    }

    /// Selection shown when the form opens.
    pub fn initial_selection(record: &PatientRecord) -> FacilitySelection {
        match &record.facility {
            None => FacilitySelection::AllFacilities,
            Some(facility) => FacilitySelection::Facility(facility.id.clone()),
        }
    }
}

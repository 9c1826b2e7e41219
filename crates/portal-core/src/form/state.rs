//! Working copy of the record being edited.

use super::field::{FieldSlot, PatientField};
use super::{FormError, FormResult};
use crate::models::{FacilitySelection, PatientRecord, YesNo};

/// Widget name of the facility dropdown.
pub const FACILITY_FIELD: &str = "facilityId";

/// Form state store: the record, the facility selection and the dirty flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    record: PatientRecord,
    facility: FacilitySelection,
    dirty: bool,
}

impl FormState {
    /// Start a clean form from a loaded record.
    pub fn new(record: PatientRecord, facility: FacilitySelection) -> Self {
        Self {
            record,
            facility,
            dirty: false,
        }
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn facility(&self) -> &FacilitySelection {
        &self.facility
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set one scalar field. Other fields are never touched.
    ///
    /// Flag fields accept only `YES` or `NO`; anything else is rejected and
    /// the state is left as it was.
    pub fn set_field(&mut self, field: PatientField, raw: &str) -> FormResult<()> {
        match field.slot(&mut self.record) {
            FieldSlot::Text(slot) => *slot = Some(raw.to_string()),
            FieldSlot::Flag(slot) => {
                let flag = YesNo::parse(raw).ok_or_else(|| FormError::InvalidFlagValue {
                    field: field.name(),
                    value: raw.to_string(),
                })?;
                *slot = Some(flag);
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Apply a change event carrying the widget's name.
    pub fn set_field_by_name(&mut self, name: &str, raw: &str) -> FormResult<()> {
        if name == FACILITY_FIELD {
            self.select_facility(raw);
            return Ok(());
        }
        let field =
            PatientField::from_name(name).ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        self.set_field(field, raw)
    }

    /// Tick or untick one box of a checkbox group, keeping the others.
    pub fn set_sub_option(&mut self, group: &str, key: &str, checked: bool) {
        self.record
            .option_sets
            .entry(group.to_string())
            .or_default()
            .merge(key, checked);
        self.dirty = true;
    }

    /// Change the facility dropdown.
    pub fn select_facility(&mut self, raw: &str) {
        self.facility = FacilitySelection::from_option_value(raw);
        self.dirty = true;
    }

    pub fn value(&self, field: PatientField) -> Option<String> {
        field.value(&self.record)
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ALL_FACILITIES;

    fn clean_state() -> FormState {
        let record = PatientRecord {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            resident_congregate_setting: Some(YesNo::No),
            ..Default::default()
        };
        FormState::new(record, FacilitySelection::AllFacilities)
    }

    #[test]
    fn test_new_state_is_clean() {
        assert!(!clean_state().is_dirty());
    }

    #[test]
    fn test_set_field_marks_dirty() {
        let mut state = clean_state();
        state.set_field(PatientField::Telephone, "5551234567").unwrap();

        assert!(state.is_dirty());
        assert_eq!(state.record().telephone.as_deref(), Some("5551234567"));
        assert_eq!(state.record().first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_set_flag() {
        let mut state = clean_state();
        state
            .set_field(PatientField::ResidentCongregateSetting, "YES")
            .unwrap();
        assert_eq!(state.record().resident_congregate_setting, Some(YesNo::Yes));
    }

    #[test]
    fn test_invalid_flag_rejected_without_change() {
        let mut state = clean_state();
        let err = state
            .set_field(PatientField::ResidentCongregateSetting, "MAYBE")
            .unwrap_err();

        assert_eq!(
            err,
            FormError::InvalidFlagValue {
                field: "residentCongregateSetting",
                value: "MAYBE".into()
            }
        );
        assert!(!state.is_dirty());
        assert_eq!(state.record().resident_congregate_setting, Some(YesNo::No));
    }

    #[test]
    fn test_set_field_by_name() {
        let mut state = clean_state();
        state.set_field_by_name("zipCode", "94110").unwrap();
        assert_eq!(state.record().zip_code.as_deref(), Some("94110"));

        let err = state.set_field_by_name("shoeSize", "9").unwrap_err();
        assert_eq!(err, FormError::UnknownField("shoeSize".into()));
    }

    #[test]
    fn test_facility_by_name() {
        let mut state = clean_state();
        state.set_field_by_name(FACILITY_FIELD, "fac-2").unwrap();
        assert_eq!(state.facility(), &FacilitySelection::Facility("fac-2".into()));

        state.set_field_by_name(FACILITY_FIELD, ALL_FACILITIES).unwrap();
        assert_eq!(state.facility(), &FacilitySelection::AllFacilities);
        assert!(state.is_dirty());
    }

    #[test]
    fn test_sub_option_merges() {
        let mut state = clean_state();
        state.set_sub_option("symptoms", "cough", true);
        state.set_sub_option("symptoms", "fever", true);
        state.set_sub_option("symptoms", "cough", false);

        let set = &state.record().option_sets["symptoms"];
        assert!(set.is_checked("fever"));
        assert!(!set.is_checked("cough"));
        assert!(state.is_dirty());
    }

    #[test]
    fn test_selecting_sentinel_marks_dirty() {
        let mut state = FormState::new(
            PatientRecord::default(),
            FacilitySelection::Facility("fac-1".into()),
        );
        state.select_facility(ALL_FACILITIES);
        assert!(state.is_dirty());
        assert_eq!(state.facility().facility_id(), None);
    }
}

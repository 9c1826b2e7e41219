//! Scalar fields of the patient form.

use crate::models::{PatientRecord, YesNo};

/// An editable scalar field of [`PatientRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientField {
    LookupId,
    FirstName,
    MiddleName,
    LastName,
    BirthDate,
    Race,
    Ethnicity,
    Gender,
    Role,
    Telephone,
    Email,
    Street,
    StreetTwo,
    City,
    County,
    State,
    ZipCode,
    ResidentCongregateSetting,
    EmployedInHealthcare,
}

/// Mutable storage behind a field.
pub enum FieldSlot<'a> {
    Text(&'a mut Option<String>),
    Flag(&'a mut Option<YesNo>),
}

impl PatientField {
    pub const ALL: &'static [PatientField] = &[
        PatientField::LookupId,
        PatientField::FirstName,
        PatientField::MiddleName,
        PatientField::LastName,
        PatientField::BirthDate,
        PatientField::Race,
        PatientField::Ethnicity,
        PatientField::Gender,
        PatientField::Role,
        PatientField::Telephone,
        PatientField::Email,
        PatientField::Street,
        PatientField::StreetTwo,
        PatientField::City,
        PatientField::County,
        PatientField::State,
        PatientField::ZipCode,
        PatientField::ResidentCongregateSetting,
        PatientField::EmployedInHealthcare,
    ];

    /// Widget name, identical to the network variable name.
    pub fn name(&self) -> &'static str {
        match self {
            PatientField::LookupId => "lookupId",
            PatientField::FirstName => "firstName",
            PatientField::MiddleName => "middleName",
            PatientField::LastName => "lastName",
            PatientField::BirthDate => "birthDate",
            PatientField::Race => "race",
            PatientField::Ethnicity => "ethnicity",
            PatientField::Gender => "gender",
            PatientField::Role => "role",
            PatientField::Telephone => "telephone",
            PatientField::Email => "email",
            PatientField::Street => "street",
            PatientField::StreetTwo => "streetTwo",
            PatientField::City => "city",
            PatientField::County => "county",
            PatientField::State => "state",
            PatientField::ZipCode => "zipCode",
            PatientField::ResidentCongregateSetting => "residentCongregateSetting",
            PatientField::EmployedInHealthcare => "employedInHealthcare",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Whether the widget marks the field as required. Display only.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            PatientField::FirstName
                | PatientField::LastName
                | PatientField::BirthDate
                | PatientField::Telephone
                | PatientField::Street
                | PatientField::State
                | PatientField::ZipCode
                | PatientField::ResidentCongregateSetting
                | PatientField::EmployedInHealthcare
        )
    }

    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            PatientField::ResidentCongregateSetting | PatientField::EmployedInHealthcare
        )
    }

    pub fn slot<'a>(&self, record: &'a mut PatientRecord) -> FieldSlot<'a> {
        match self {
            PatientField::LookupId => FieldSlot::Text(&mut record.lookup_id),
            PatientField::FirstName => FieldSlot::Text(&mut record.first_name),
            PatientField::MiddleName => FieldSlot::Text(&mut record.middle_name),
            PatientField::LastName => FieldSlot::Text(&mut record.last_name),
            PatientField::BirthDate => FieldSlot::Text(&mut record.birth_date),
            PatientField::Race => FieldSlot::Text(&mut record.race),
            PatientField::Ethnicity => FieldSlot::Text(&mut record.ethnicity),
            PatientField::Gender => FieldSlot::Text(&mut record.gender),
            PatientField::Role => FieldSlot::Text(&mut record.role),
            PatientField::Telephone => FieldSlot::Text(&mut record.telephone),
            PatientField::Email => FieldSlot::Text(&mut record.email),
            PatientField::Street => FieldSlot::Text(&mut record.street),
            PatientField::StreetTwo => FieldSlot::Text(&mut record.street_two),
            PatientField::City => FieldSlot::Text(&mut record.city),
            PatientField::County => FieldSlot::Text(&mut record.county),
            PatientField::State => FieldSlot::Text(&mut record.state),
            PatientField::ZipCode => FieldSlot::Text(&mut record.zip_code),
            PatientField::ResidentCongregateSetting => {
                FieldSlot::Flag(&mut record.resident_congregate_setting)
            }
            PatientField::EmployedInHealthcare => FieldSlot::Flag(&mut record.employed_in_healthcare),
        }
    }

    /// Current value in its widget encoding.
    pub fn value(&self, record: &PatientRecord) -> Option<String> {
        let value = match self {
            PatientField::LookupId => &record.lookup_id,
            PatientField::FirstName => &record.first_name,
            PatientField::MiddleName => &record.middle_name,
            PatientField::LastName => &record.last_name,
            PatientField::BirthDate => &record.birth_date,
            PatientField::Race => &record.race,
            PatientField::Ethnicity => &record.ethnicity,
            PatientField::Gender => &record.gender,
            PatientField::Role => &record.role,
            PatientField::Telephone => &record.telephone,
            PatientField::Email => &record.email,
            PatientField::Street => &record.street,
            PatientField::StreetTwo => &record.street_two,
            PatientField::City => &record.city,
            PatientField::County => &record.county,
            PatientField::State => &record.state,
            PatientField::ZipCode => &record.zip_code,
            PatientField::ResidentCongregateSetting => {
                return record.resident_congregate_setting.map(|f| f.as_str().to_string())
            }
            PatientField::EmployedInHealthcare => {
                return record.employed_in_healthcare.map(|f| f.as_str().to_string())
            }
        };
        value.clone()
    }
}

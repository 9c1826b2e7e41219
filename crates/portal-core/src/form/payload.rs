//! Network payload built from form state at save time.

use serde::{Deserialize, Serialize};

use super::state::FormState;
use crate::api::{ApiResult, PatientApi};
use crate::models::YesNo;

/// Variables shared by the create and update mutations.
///
/// `facility_id` always serializes, as `null` for the all-facilities
/// selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub facility_id: Option<String>,
    pub lookup_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub street: Option<String>,
    pub street_two: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub telephone: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub county: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub resident_congregate_setting: bool,
    pub employed_in_healthcare: bool,
}

impl PatientPayload {
    /// The single point where flags become booleans.
    pub fn from_state(state: &FormState) -> Self {
        let record = state.record();
        Self {
            facility_id: state.facility().facility_id(),
            lookup_id: record.lookup_id.clone(),
            first_name: record.first_name.clone(),
            middle_name: record.middle_name.clone(),
            last_name: record.last_name.clone(),
            birth_date: record.birth_date.clone(),
            street: record.street.clone(),
            street_two: record.street_two.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            zip_code: record.zip_code.clone(),
            telephone: record.telephone.clone(),
            role: record.role.clone(),
            email: record.email.clone(),
            county: record.county.clone(),
            race: record.race.clone(),
            ethnicity: record.ethnicity.clone(),
            gender: record.gender.clone(),
            resident_congregate_setting: YesNo::is_yes(record.resident_congregate_setting),
            employed_in_healthcare: YesNo::is_yes(record.employed_in_healthcare),
        }
    }
}

/// Which branch of the save protocol ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated,
}

/// The one network call a save performs.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(PatientPayload),
    Update {
        patient_id: String,
        payload: PatientPayload,
    },
}

impl SaveRequest {
    /// Build the request; the patient id alone decides create vs update.
    pub fn new(patient_id: Option<&str>, payload: PatientPayload) -> Self {
        match patient_id {
            Some(id) => SaveRequest::Update {
                patient_id: id.to_string(),
                payload,
            },
            None => SaveRequest::Create(payload),
        }
    }

    pub fn kind(&self) -> SaveKind {
        match self {
            SaveRequest::Create(_) => SaveKind::Created,
            SaveRequest::Update { .. } => SaveKind::Updated,
        }
    }

    pub fn payload(&self) -> &PatientPayload {
        match self {
            SaveRequest::Create(payload) => payload,
            SaveRequest::Update { payload, .. } => payload,
        }
    }

    /// Perform exactly one call: update when an id is present, otherwise create.
    pub fn dispatch<A: PatientApi + ?Sized>(&self, api: &A) -> ApiResult<()> {
        match self {
            SaveRequest::Create(payload) => api.create_patient(payload),
            SaveRequest::Update {
                patient_id,
                payload,
            } => api.update_patient(patient_id, payload),
        }
    }
}

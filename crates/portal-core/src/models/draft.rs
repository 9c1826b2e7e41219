//! Unsaved patient form staged for later resumption.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// A patient form draft (mutable staging area, never sent to the server).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientFormDraft {
    /// Unique draft ID
    pub draft_id: String,
    /// Server patient ID when editing an existing record
    pub patient_id: Option<String>,
    /// Facility context the form was opened from
    pub active_facility_id: String,
    /// Working copy of the record
    pub record: PatientRecord,
    /// Raw facility dropdown value
    pub facility_selection: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl PatientFormDraft {
    /// Create a new draft.
    pub fn new(
        patient_id: Option<String>,
        active_facility_id: String,
        record: PatientRecord,
        facility_selection: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            active_facility_id,
            record,
            facility_selection,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether the draft edits an existing record.
    pub fn is_update(&self) -> bool {
        self.patient_id.is_some()
    }
}

//! Patient edit/create screen and its save protocol.

use super::facility::{FacilityOption, FacilitySelector};
use super::field::PatientField;
use super::guard::{NavigationDecision, NavigationGuard};
use super::outcome::{Notifier, OutcomeHandler, Telemetry, PATIENT_TERM};
use super::payload::{PatientPayload, SaveKind, SaveRequest};
use super::state::FormState;
use super::{FormError, FormResult};
use crate::api::{ApiResult, PatientApi};
use crate::models::{Facility, FacilitySelection, PatientFormDraft, PatientRecord};

/// Lifecycle of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    Editing,
    /// One save request is in flight
    Saving,
    /// Terminal: the host should navigate to the redirect route
    Submitted,
}

/// Result of a completed save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { kind: SaveKind, redirect: String },
    Failed { kind: SaveKind, error: String },
}

/// A breadcrumb entry; an empty link marks the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub text: String,
    pub link: String,
}

/// The patient form screen: form state, facility options and save phase.
#[derive(Debug, Clone)]
pub struct PatientFormScreen {
    draft_id: String,
    patient_id: Option<String>,
    active_facility_id: String,
    selector: FacilitySelector,
    state: FormState,
    phase: ScreenPhase,
}

impl PatientFormScreen {
    /// Open the form on a loaded record. `patient_id` is fixed for the
    /// screen's lifetime and decides create vs update.
    pub fn open(
        record: PatientRecord,
        patient_id: Option<String>,
        active_facility_id: impl Into<String>,
        facilities: &[Facility],
    ) -> Self {
        let selection = FacilitySelector::initial_selection(&record);
        tracing::debug!(existing = patient_id.is_some(), "Opening patient form");
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            active_facility_id: active_facility_id.into(),
            selector: FacilitySelector::new(facilities),
            state: FormState::new(record, selection),
            phase: ScreenPhase::Editing,
        }
    }

    /// Reopen a staged draft. Its edits count as unsaved.
    pub fn resume(draft: PatientFormDraft, facilities: &[Facility]) -> Self {
        let selection = FacilitySelection::from_option_value(&draft.facility_selection);
        let mut state = FormState::new(draft.record, selection);
        state.set_dirty(true);
        tracing::debug!(draft_id = %draft.draft_id, "Resuming patient form draft");
        Self {
            draft_id: draft.draft_id,
            patient_id: draft.patient_id,
            active_facility_id: draft.active_facility_id,
            selector: FacilitySelector::new(facilities),
            state,
            phase: ScreenPhase::Editing,
        }
    }

    /// Snapshot for the draft store.
    pub fn to_draft(&self) -> PatientFormDraft {
        let mut draft = PatientFormDraft::new(
            self.patient_id.clone(),
            self.active_facility_id.clone(),
            self.state.record().clone(),
            self.state.facility().option_value().to_string(),
        );
        draft.draft_id = self.draft_id.clone();
        draft
    }

    pub fn draft_id(&self) -> &str {
        &self.draft_id
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    pub fn facility_options(&self) -> &[FacilityOption] {
        self.selector.options()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn set_field(&mut self, field: PatientField, raw: &str) -> FormResult<()> {
        self.ensure_editable()?;
        self.state.set_field(field, raw)
    }

    pub fn set_field_by_name(&mut self, name: &str, raw: &str) -> FormResult<()> {
        self.ensure_editable()?;
        self.state.set_field_by_name(name, raw)
    }

    pub fn set_sub_option(&mut self, group: &str, key: &str, checked: bool) -> FormResult<()> {
        self.ensure_editable()?;
        self.state.set_sub_option(group, key, checked);
        Ok(())
    }

    pub fn select_facility(&mut self, raw: &str) -> FormResult<()> {
        self.ensure_editable()?;
        self.state.select_facility(raw);
        Ok(())
    }

    /// The in-flight payload is already fixed, so edits wait for the result.
    fn ensure_editable(&self) -> FormResult<()> {
        match self.phase {
            ScreenPhase::Editing => Ok(()),
            ScreenPhase::Saving => Err(FormError::SaveInFlight),
            ScreenPhase::Submitted => Err(FormError::AlreadySubmitted),
        }
    }

    // =========================================================================
    // Save protocol
    // =========================================================================

    /// Whether the save button is actionable.
    pub fn can_save(&self) -> bool {
        self.phase == ScreenPhase::Editing && self.state.is_dirty()
    }

    /// Start a save: enter `Saving` and return the single request to send.
    pub fn begin_save(&mut self, telemetry: &dyn Telemetry) -> FormResult<SaveRequest> {
        match self.phase {
            ScreenPhase::Saving => return Err(FormError::SaveInFlight),
            ScreenPhase::Submitted => return Err(FormError::AlreadySubmitted),
            ScreenPhase::Editing => {}
        }
        if !self.state.is_dirty() {
            return Err(FormError::NoChanges);
        }

        let request = SaveRequest::new(
            self.patient_id.as_deref(),
            PatientPayload::from_state(&self.state),
        );
        telemetry.track_event(match request.kind() {
            SaveKind::Created => "Add Patient",
            SaveKind::Updated => "Update Patient",
        });

        self.phase = ScreenPhase::Saving;
        tracing::info!(kind = ?request.kind(), draft_id = %self.draft_id, "Saving patient record");
        Ok(request)
    }

    /// Apply the network result of the request returned by `begin_save`.
    ///
    /// The dirty flag is cleared only on success. A failure leaves every
    /// edit in place and the form dirty, so the guard keeps protecting it.
    pub fn finish_save(
        &mut self,
        kind: SaveKind,
        result: ApiResult<()>,
        notifier: &dyn Notifier,
        telemetry: &dyn Telemetry,
    ) -> FormResult<SaveOutcome> {
        if self.phase != ScreenPhase::Saving {
            return Err(FormError::NoSaveInFlight);
        }

        let handler = OutcomeHandler::new(notifier, telemetry);
        match result {
            Ok(()) => {
                self.state.set_dirty(false);
                self.phase = ScreenPhase::Submitted;
                handler.success(kind);
                tracing::info!(kind = ?kind, "Patient record saved");
                Ok(SaveOutcome::Saved {
                    kind,
                    redirect: self.listing_route(),
                })
            }
            Err(err) => {
                tracing::warn!(kind = ?kind, error = %err, "Patient save failed");
                handler.failure(&err);
                self.state.set_dirty(true);
                self.phase = ScreenPhase::Editing;
                Ok(SaveOutcome::Failed {
                    kind,
                    error: err.to_string(),
                })
            }
        }
    }

    /// Begin, dispatch and finish a save in one call. Never retries.
    pub fn save<A: PatientApi + ?Sized>(
        &mut self,
        api: &A,
        notifier: &dyn Notifier,
        telemetry: &dyn Telemetry,
    ) -> FormResult<SaveOutcome> {
        let request = self.begin_save(telemetry)?;
        let result = request.dispatch(api);
        self.finish_save(request.kind(), result, notifier, telemetry)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Listing page for the active facility.
    pub fn listing_route(&self) -> String {
        crate::route::with_query(
            "/patients/",
            &[("facility", self.active_facility_id.as_str())],
        )
    }

    /// Where the host must navigate once the record is submitted.
    pub fn redirect(&self) -> Option<String> {
        (self.phase == ScreenPhase::Submitted).then(|| self.listing_route())
    }

    pub fn navigation(&self) -> NavigationDecision {
        match self.phase {
            ScreenPhase::Submitted => NavigationDecision::Proceed,
            _ => NavigationGuard::check(self.state.is_dirty()),
        }
    }

    pub fn heading(&self) -> String {
        match self.patient_id {
            None => format!("Create New {}", PATIENT_TERM),
            Some(_) => self.state.record().full_name(),
        }
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        vec![
            Breadcrumb {
                text: format!("{}s", PATIENT_TERM),
                link: self.listing_route(),
            },
            Breadcrumb {
                text: self.heading(),
                link: String::new(),
            },
        ]
    }
}

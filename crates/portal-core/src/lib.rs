//! Testing Portal Core Library
//!
//! Headless engine behind the patient create/edit screen and the patient
//! experience (pxp) time-of-test flow of a COVID-19 testing portal.
//!
//! # Architecture
//!
//! ```text
//!   host UI (widgets, router, toasts)
//!          │ field changes / save / navigate
//!          ▼
//!   ┌──────────────────────────────┐        ┌──────────────────────┐
//!   │ PatientFormSession (FFI)     │───────▶│ patient_form_drafts  │
//!   │   PatientFormScreen          │ stage  │ (SQLite, local only) │
//!   │     FormState ── dirty       │        └──────────────────────┘
//!   │     FacilitySelector         │
//!   │     NavigationGuard          │
//!   └──────────────┬───────────────┘
//!                  │ SaveRequest: Create | Update (exactly one)
//!                  ▼
//!          GraphQL addPatient / updatePatient
//!                  │
//!          OutcomeHandler ──▶ notifications + telemetry
//!                  │
//!          redirect /patients/?facility={id}
//! ```
//!
//! # Core Principle
//!
//! **The dirty flag is cleared only by a confirmed save.** A failed save keeps
//! every edit and keeps the navigation guard armed.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, Facility, YesNo, AoeAnswers, drafts)
//! - [`form`]: Form state, facility selector, save protocol, navigation guard
//! - [`api`]: GraphQL and pxp REST clients behind the `PatientApi`/`PxpApi` traits
//! - [`pxp`]: Date-of-birth gate and time-of-test questionnaire
//! - [`db`]: SQLite draft staging store
//! - [`config`]: Runtime configuration and logging
//! - [`route`]: Host router paths

pub mod api;
pub mod config;
pub mod db;
pub mod form;
pub mod models;
pub mod pxp;
pub mod route;

// Re-export commonly used types
pub use api::{ApiError, GraphQlClient, PatientApi, PxpApi, PxpClient};
pub use config::PortalConfig;
pub use db::Database;
pub use form::{
    FormError, FormState, NavigationDecision, Notification, NotificationQueue, PatientField,
    PatientFormScreen, PatientPayload, SaveKind, SaveOutcome, SaveRequest, TracingTelemetry,
};
pub use models::{
    AoeAnswers, Facility, FacilitySelection, PatientFormDraft, PatientRecord, TestResult, YesNo,
    ALL_FACILITIES,
};
pub use pxp::{DobForm, PxpError, TimeOfTestFlow};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PortalError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Lock poisoned: {0}")]
    LockError(String),
}

impl From<api::ApiError> for PortalError {
    fn from(e: api::ApiError) -> Self {
        PortalError::NetworkError(e.to_string())
    }
}

impl From<form::FormError> for PortalError {
    fn from(e: form::FormError) -> Self {
        PortalError::InvalidInput(e.to_string())
    }
}

impl From<pxp::PxpError> for PortalError {
    fn from(e: pxp::PxpError) -> Self {
        PortalError::InvalidInput(e.to_string())
    }
}

impl From<db::DbError> for PortalError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => PortalError::NotFound(what),
            other => PortalError::DatabaseError(other.to_string()),
        }
    }
}

impl From<portal_content::CatalogError> for PortalError {
    fn from(e: portal_content::CatalogError) -> Self {
        PortalError::SerializationError(e.to_string())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PortalError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PortalError::LockError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber. Safe to call more than once.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    let filter = filter.unwrap_or_else(|| PortalConfig::from_env().log_filter);
    config::init_logging(&filter);
}

/// Open the patient form on a loaded record.
///
/// `config_json` overrides the environment configuration when given.
/// `patient_id` is present when editing an existing patient.
#[uniffi::export]
pub fn open_patient_form(
    config_json: Option<String>,
    record: FfiPatientRecord,
    patient_id: Option<String>,
    active_facility_id: String,
    facilities: Vec<FfiFacility>,
    drafts: Option<Arc<DraftStore>>,
) -> Result<Arc<PatientFormSession>, PortalError> {
    let config = load_config(config_json)?;
    let facilities: Vec<Facility> = facilities.into_iter().map(Into::into).collect();
    let screen = PatientFormScreen::open(
        record.try_into()?,
        patient_id,
        active_facility_id,
        &facilities,
    );
    PatientFormSession::new(&config, screen, drafts)
}

/// Open or create the draft store at the given path.
#[uniffi::export]
pub fn open_draft_store(path: String) -> Result<Arc<DraftStore>, PortalError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(DraftStore {
        db: Mutex::new(db),
    }))
}

/// Create an in-memory draft store (for testing).
#[uniffi::export]
pub fn open_draft_store_in_memory() -> Result<Arc<DraftStore>, PortalError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(DraftStore {
        db: Mutex::new(db),
    }))
}

/// Validate an `MMDDYYYY` birth date; returns it as `YYYY-MM-DD`.
#[uniffi::export]
pub fn parse_birth_date(raw: String) -> Result<String, PortalError> {
    let date = pxp::parse_birth_date(&raw)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Submit the time-of-test questionnaire for the patient link in
/// `portal_url`. `answers_json` is the camelCase answer object.
#[uniffi::export]
pub fn submit_time_of_test(
    config_json: Option<String>,
    portal_url: String,
    birth_date: String,
    answers_json: String,
) -> Result<FfiPxpOutcome, PortalError> {
    let config = load_config(config_json)?;
    let birth_date = pxp::parse_birth_date(&birth_date)?;
    let answers: AoeAnswers = serde_json::from_str(&answers_json)?;
    let client = PxpClient::from_config(&config)?;

    let mut flow = TimeOfTestFlow::from_url(&portal_url, birth_date)?;
    let queue = NotificationQueue::new();
    let accepted = flow.submit(&client, &answers, &queue);

    Ok(FfiPxpOutcome {
        accepted,
        redirect: flow.redirect(),
        notifications: queue.drain().into_iter().map(Into::into).collect(),
    })
}

/// Render the terms of service as Markdown from a translation file.
/// Keys missing from the catalog render as the key itself.
#[uniffi::export]
pub fn render_terms(catalog_json: String) -> Result<String, PortalError> {
    let catalog = portal_content::Catalog::from_json(&catalog_json)?;
    Ok(portal_content::render_markdown(&catalog))
}

fn load_config(config_json: Option<String>) -> Result<PortalConfig, PortalError> {
    match config_json {
        Some(json) => Ok(PortalConfig::from_json(&json)?),
        None => Ok(PortalConfig::from_env()),
    }
}

// =========================================================================
// Patient Form Session
// =========================================================================

/// Thread-safe patient form for FFI. One session per open screen.
#[derive(uniffi::Object)]
pub struct PatientFormSession {
    screen: Mutex<PatientFormScreen>,
    api: GraphQlClient,
    drafts: Option<Arc<DraftStore>>,
}

impl PatientFormSession {
    fn new(
        config: &PortalConfig,
        screen: PatientFormScreen,
        drafts: Option<Arc<DraftStore>>,
    ) -> Result<Arc<Self>, PortalError> {
        Ok(Arc::new(Self {
            screen: Mutex::new(screen),
            api: GraphQlClient::from_config(config)?,
            drafts,
        }))
    }
}

#[uniffi::export]
impl PatientFormSession {
    // =========================================================================
    // Edits
    // =========================================================================

    /// Apply a widget change by field name (`firstName`, `facilityId`, ...).
    pub fn set_field(&self, name: String, value: String) -> Result<(), PortalError> {
        let mut screen = self.screen.lock()?;
        screen.set_field_by_name(&name, &value)?;
        Ok(())
    }

    /// Tick or untick one key of a checkbox group.
    pub fn set_sub_option(
        &self,
        group: String,
        key: String,
        checked: bool,
    ) -> Result<(), PortalError> {
        let mut screen = self.screen.lock()?;
        screen.set_sub_option(&group, &key, checked)?;
        Ok(())
    }

    pub fn select_facility(&self, value: String) -> Result<(), PortalError> {
        let mut screen = self.screen.lock()?;
        screen.select_facility(&value)?;
        Ok(())
    }

    /// Current value of a field, as the widget should show it.
    pub fn field_value(&self, name: String) -> Result<Option<String>, PortalError> {
        let screen = self.screen.lock()?;
        if name == form::FACILITY_FIELD {
            return Ok(Some(screen.state().facility().option_value().to_string()));
        }
        let field = PatientField::from_name(&name)
            .ok_or(form::FormError::UnknownField(name))?;
        Ok(screen.state().value(field))
    }

    // =========================================================================
    // Screen State
    // =========================================================================

    pub fn facility_options(&self) -> Result<Vec<FfiFacilityOption>, PortalError> {
        let screen = self.screen.lock()?;
        Ok(screen
            .facility_options()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn is_dirty(&self) -> Result<bool, PortalError> {
        Ok(self.screen.lock()?.state().is_dirty())
    }

    pub fn can_save(&self) -> Result<bool, PortalError> {
        Ok(self.screen.lock()?.can_save())
    }

    /// Message to confirm before leaving, or `None` when navigation is free.
    pub fn navigation_prompt(&self) -> Result<Option<String>, PortalError> {
        let screen = self.screen.lock()?;
        Ok(match screen.navigation() {
            NavigationDecision::Proceed => None,
            NavigationDecision::Confirm { message } => Some(message.to_string()),
        })
    }

    /// Whether the host may navigate given the user's answer to the prompt.
    pub fn confirm_navigation(&self, discard: bool) -> Result<bool, PortalError> {
        let screen = self.screen.lock()?;
        let choice = if discard {
            form::PromptChoice::Discard
        } else {
            form::PromptChoice::Cancel
        };
        Ok(screen.navigation().allows(choice))
    }

    pub fn heading(&self) -> Result<String, PortalError> {
        Ok(self.screen.lock()?.heading())
    }

    pub fn breadcrumbs(&self) -> Result<Vec<FfiBreadcrumb>, PortalError> {
        let screen = self.screen.lock()?;
        Ok(screen.breadcrumbs().into_iter().map(Into::into).collect())
    }

    pub fn redirect(&self) -> Result<Option<String>, PortalError> {
        Ok(self.screen.lock()?.redirect())
    }

    /// Rows for the record's test history table.
    pub fn test_history(&self) -> Result<Vec<FfiTestHistoryEntry>, PortalError> {
        let screen = self.screen.lock()?;
        Ok(screen
            .state()
            .record()
            .test_results
            .iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Save the record. The screen lock is not held during the network call;
    /// a concurrent second save is refused while the first is in flight.
    pub fn save(&self) -> Result<FfiSaveOutcome, PortalError> {
        let telemetry = TracingTelemetry;
        let request = self.screen.lock()?.begin_save(&telemetry)?;

        let result = request.dispatch(&self.api);

        let queue = NotificationQueue::new();
        let (outcome, draft_id) = {
            let mut screen = self.screen.lock()?;
            let outcome = screen.finish_save(request.kind(), result, &queue, &telemetry)?;
            (outcome, screen.draft_id().to_string())
        };

        if let (SaveOutcome::Saved { .. }, Some(store)) = (&outcome, &self.drafts) {
            // The record is saved; a stale draft is not worth failing over.
            if let Err(e) = store.discard(&draft_id) {
                tracing::warn!(draft_id = %draft_id, error = %e, "Failed to delete saved draft");
            }
        }

        Ok(FfiSaveOutcome::new(outcome, queue.drain()))
    }

    /// Stage the current edits in the draft store. Returns the draft id.
    pub fn save_draft(&self) -> Result<String, PortalError> {
        let store = self
            .drafts
            .as_ref()
            .ok_or_else(|| PortalError::InvalidInput("No draft store attached".to_string()))?;
        let draft = self.screen.lock()?.to_draft();
        store.db.lock()?.save_form_draft(&draft)?;
        tracing::debug!(draft_id = %draft.draft_id, "Staged patient form draft");
        Ok(draft.draft_id)
    }
}

// =========================================================================
// Draft Store
// =========================================================================

/// Thread-safe draft database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DraftStore {
    db: Mutex<Database>,
}

impl DraftStore {
    fn discard(&self, draft_id: &str) -> Result<bool, PortalError> {
        Ok(self.db.lock()?.delete_form_draft(draft_id)?)
    }
}

#[uniffi::export]
impl DraftStore {
    /// All staged drafts, most recently updated first.
    pub fn list_drafts(&self) -> Result<Vec<FfiDraftSummary>, PortalError> {
        let db = self.db.lock()?;
        let drafts = db.list_form_drafts()?;
        Ok(drafts.into_iter().map(Into::into).collect())
    }

    /// Drafts staged for one existing patient.
    pub fn list_drafts_for_patient(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiDraftSummary>, PortalError> {
        let db = self.db.lock()?;
        let drafts = db.list_form_drafts_for_patient(&patient_id)?;
        Ok(drafts.into_iter().map(Into::into).collect())
    }

    pub fn delete_draft(&self, draft_id: String) -> Result<bool, PortalError> {
        self.discard(&draft_id)
    }

    /// Reopen a staged draft as a form session attached to this store.
    pub fn resume_form(
        self: Arc<Self>,
        config_json: Option<String>,
        draft_id: String,
        facilities: Vec<FfiFacility>,
    ) -> Result<Arc<PatientFormSession>, PortalError> {
        let config = load_config(config_json)?;
        let draft = self.db.lock()?.require_form_draft(&draft_id)?;
        let facilities: Vec<Facility> = facilities.into_iter().map(Into::into).collect();
        let screen = PatientFormScreen::resume(draft, &facilities);
        PatientFormSession::new(&config, screen, Some(self))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe facility.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFacility {
    pub id: String,
    pub name: String,
}

impl From<FfiFacility> for Facility {
    fn from(facility: FfiFacility) -> Self {
        Facility::new(facility.id, facility.name)
    }
}

impl From<Facility> for FfiFacility {
    fn from(facility: Facility) -> Self {
        Self {
            id: facility.id,
            name: facility.name,
        }
    }
}

/// FFI-safe facility dropdown entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFacilityOption {
    pub label: String,
    pub value: String,
}

impl From<form::FacilityOption> for FfiFacilityOption {
    fn from(option: form::FacilityOption) -> Self {
        Self {
            label: option.label,
            value: option.value,
        }
    }
}

/// FFI-safe patient record as loaded by the host. Flags are `"YES"`/`"NO"`.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientRecord {
    pub lookup_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub street_two: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub facility: Option<FfiFacility>,
    pub resident_congregate_setting: Option<String>,
    pub employed_in_healthcare: Option<String>,
    pub test_results: Vec<FfiTestResult>,
}

impl TryFrom<FfiPatientRecord> for PatientRecord {
    type Error = PortalError;

    fn try_from(record: FfiPatientRecord) -> Result<Self, Self::Error> {
        Ok(PatientRecord {
            lookup_id: record.lookup_id,
            first_name: record.first_name,
            middle_name: record.middle_name,
            last_name: record.last_name,
            birth_date: record.birth_date,
            race: record.race,
            ethnicity: record.ethnicity,
            gender: record.gender,
            role: record.role,
            telephone: record.telephone,
            email: record.email,
            street: record.street,
            street_two: record.street_two,
            city: record.city,
            county: record.county,
            state: record.state,
            zip_code: record.zip_code,
            facility: record.facility.map(Into::into),
            resident_congregate_setting: parse_flag(
                "residentCongregateSetting",
                record.resident_congregate_setting,
            )?,
            employed_in_healthcare: parse_flag(
                "employedInHealthcare",
                record.employed_in_healthcare,
            )?,
            test_results: record.test_results.into_iter().map(Into::into).collect(),
            ..Default::default()
        })
    }
}

fn parse_flag(field: &str, raw: Option<String>) -> Result<Option<YesNo>, PortalError> {
    match raw {
        None => Ok(None),
        Some(raw) => YesNo::parse(&raw).map(Some).ok_or_else(|| {
            PortalError::InvalidInput(format!("{}: expected YES or NO, got {:?}", field, raw))
        }),
    }
}

/// FFI-safe past test; `date_tested` is an RFC 3339 timestamp.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestResult {
    pub date_tested: String,
    pub result: String,
}

impl From<FfiTestResult> for TestResult {
    fn from(result: FfiTestResult) -> Self {
        Self {
            date_tested: result.date_tested,
            result: result.result,
        }
    }
}

/// Test history row with the date formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiTestHistoryEntry {
    pub display_date: String,
    pub result: String,
}

impl From<&TestResult> for FfiTestHistoryEntry {
    fn from(result: &TestResult) -> Self {
        Self {
            display_date: result.display_date(),
            result: result.result.clone(),
        }
    }
}

/// FFI-safe notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiNotificationKind {
    Success,
    Error,
}

/// FFI-safe toast.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub kind: FfiNotificationKind,
    pub title: String,
    pub body: String,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            kind: match notification.kind {
                form::NotificationKind::Success => FfiNotificationKind::Success,
                form::NotificationKind::Error => FfiNotificationKind::Error,
            },
            title: notification.title,
            body: notification.body,
        }
    }
}

/// FFI-safe save result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSaveOutcome {
    pub saved: bool,
    /// "created" or "updated"
    pub kind: String,
    pub redirect: Option<String>,
    pub error: Option<String>,
    pub notifications: Vec<FfiNotification>,
}

impl FfiSaveOutcome {
    fn new(outcome: SaveOutcome, notifications: Vec<Notification>) -> Self {
        let notifications = notifications.into_iter().map(Into::into).collect();
        match outcome {
            SaveOutcome::Saved { kind, redirect } => Self {
                saved: true,
                kind: save_kind_name(kind).to_string(),
                redirect: Some(redirect),
                error: None,
                notifications,
            },
            SaveOutcome::Failed { kind, error } => Self {
                saved: false,
                kind: save_kind_name(kind).to_string(),
                redirect: None,
                error: Some(error),
                notifications,
            },
        }
    }
}

fn save_kind_name(kind: SaveKind) -> &'static str {
    match kind {
        SaveKind::Created => "created",
        SaveKind::Updated => "updated",
    }
}

/// FFI-safe breadcrumb.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBreadcrumb {
    pub text: String,
    pub link: String,
}

impl From<form::Breadcrumb> for FfiBreadcrumb {
    fn from(crumb: form::Breadcrumb) -> Self {
        Self {
            text: crumb.text,
            link: crumb.link,
        }
    }
}

/// FFI-safe draft listing entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDraftSummary {
    pub draft_id: String,
    pub patient_id: Option<String>,
    pub active_facility_id: String,
    pub display_name: String,
    pub updated_at: String,
}

impl From<PatientFormDraft> for FfiDraftSummary {
    fn from(draft: PatientFormDraft) -> Self {
        Self {
            display_name: draft.record.full_name(),
            draft_id: draft.draft_id,
            patient_id: draft.patient_id,
            active_facility_id: draft.active_facility_id,
            updated_at: draft.updated_at,
        }
    }
}

/// FFI-safe time-of-test submission result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPxpOutcome {
    pub accepted: bool,
    pub redirect: Option<String>,
    pub notifications: Vec<FfiNotification>,
}

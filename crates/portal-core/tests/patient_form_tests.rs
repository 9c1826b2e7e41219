//! Patient form save protocol integration tests.

use std::sync::Mutex;

use portal_core::api::{ApiError, ApiResult, PatientApi};
use portal_core::form::{
    FormError, NavigationDecision, NotificationKind, NotificationQueue, PatientField,
    PatientFormScreen, PatientPayload, PromptChoice, SaveKind, SaveOutcome, ScreenPhase, Telemetry,
    TracingTelemetry, UNSAVED_CHANGES_PROMPT,
};
use portal_core::models::{Facility, PatientRecord, YesNo, ALL_FACILITIES};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(PatientPayload),
    Update(String, PatientPayload),
}

/// Records every call; optionally fails them all.
#[derive(Default)]
struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingApi {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn result(&self) -> ApiResult<()> {
        if self.fail {
            Err(ApiError::GraphQl(vec!["Invalid zip code".into()]))
        } else {
            Ok(())
        }
    }
}

impl PatientApi for RecordingApi {
    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()> {
        self.calls.lock().unwrap().push(Call::Create(payload.clone()));
        self.result()
    }

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(patient_id.to_string(), payload.clone()));
        self.result()
    }
}

#[derive(Default)]
struct RecordingTelemetry {
    events: Mutex<Vec<String>>,
    exceptions: Mutex<Vec<String>>,
}

impl Telemetry for RecordingTelemetry {
    fn track_event(&self, name: &str) {
        self.events.lock().unwrap().push(name.to_string());
    }

    fn track_exception(&self, error: &ApiError) {
        self.exceptions.lock().unwrap().push(error.to_string());
    }
}

fn facilities() -> Vec<Facility> {
    vec![
        Facility::new("fac-1", "Main Clinic"),
        Facility::new("fac-2", "Downtown Site"),
    ]
}

fn existing_record() -> PatientRecord {
    PatientRecord {
        lookup_id: Some("L-77".into()),
        first_name: Some("Ana".into()),
        last_name: Some("Ruiz".into()),
        birth_date: Some("1980-02-29".into()),
        telephone: Some("(555) 000-0000".into()),
        street: Some("1 Main St".into()),
        city: Some("Springfield".into()),
        state: Some("IL".into()),
        zip_code: Some("62701".into()),
        role: Some("STAFF".into()),
        facility: Some(Facility::new("fac-2", "Downtown Site")),
        resident_congregate_setting: Some(YesNo::No),
        employed_in_healthcare: Some(YesNo::Yes),
        ..Default::default()
    }
}

#[test]
fn test_new_patient_created_with_all_facilities() {
    let api = RecordingApi::default();
    let queue = NotificationQueue::new();
    let telemetry = RecordingTelemetry::default();
    let mut screen =
        PatientFormScreen::open(PatientRecord::default(), None, "fac-1", &facilities());

    let entries = [
        ("firstName", "Jane"),
        ("lastName", "Doe"),
        ("birthDate", "1990-01-01"),
        ("telephone", "5551234567"),
        ("street", "1 Main St"),
        ("state", "CA"),
        ("zipCode", "94110"),
        ("residentCongregateSetting", "NO"),
        ("employedInHealthcare", "YES"),
        ("facilityId", ALL_FACILITIES),
    ];
    for (name, value) in entries {
        screen.set_field_by_name(name, value).unwrap();
    }

    let outcome = screen.save(&api, &queue, &telemetry).unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Create(payload) = &calls[0] else {
        panic!("expected a create call, got {:?}", calls[0]);
    };
    let json = serde_json::to_value(payload).unwrap();
    assert!(json["facilityId"].is_null());
    assert_eq!(json["firstName"], "Jane");
    assert_eq!(json["lastName"], "Doe");
    assert_eq!(json["birthDate"], "1990-01-01");
    assert_eq!(json["telephone"], "5551234567");
    assert_eq!(json["street"], "1 Main St");
    assert_eq!(json["state"], "CA");
    assert_eq!(json["zipCode"], "94110");
    assert_eq!(json["residentCongregateSetting"], false);
    assert_eq!(json["employedInHealthcare"], true);
    for untouched in ["lookupId", "middleName", "streetTwo", "city", "county", "email", "role"] {
        assert!(json[untouched].is_null(), "{} should be null", untouched);
    }

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            kind: SaveKind::Created,
            redirect: "/patients/?facility=fac-1".into(),
        }
    );
    assert_eq!(*telemetry.events.lock().unwrap(), vec!["Add Patient"]);

    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Success);
    assert_eq!(notes[0].title, "Patient Record Created");
}

#[test]
fn test_existing_patient_updated_with_every_field_echoed() {
    let api = RecordingApi::default();
    let queue = NotificationQueue::new();
    let telemetry = RecordingTelemetry::default();
    let mut screen = PatientFormScreen::open(
        existing_record(),
        Some("abc123".into()),
        "fac-1",
        &facilities(),
    );
    assert_eq!(screen.heading(), "Ana Ruiz");

    screen
        .set_field(PatientField::Telephone, "(555) 123-4567")
        .unwrap();
    screen.save(&api, &queue, &telemetry).unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update(patient_id, payload) = &calls[0] else {
        panic!("expected an update call, got {:?}", calls[0]);
    };
    assert_eq!(patient_id, "abc123");
    assert_eq!(payload.telephone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(payload.facility_id.as_deref(), Some("fac-2"));
    assert_eq!(payload.lookup_id.as_deref(), Some("L-77"));
    assert_eq!(payload.first_name.as_deref(), Some("Ana"));
    assert_eq!(payload.birth_date.as_deref(), Some("1980-02-29"));
    assert_eq!(payload.zip_code.as_deref(), Some("62701"));
    assert_eq!(payload.role.as_deref(), Some("STAFF"));
    assert!(!payload.resident_congregate_setting);
    assert!(payload.employed_in_healthcare);

    assert_eq!(*telemetry.events.lock().unwrap(), vec!["Update Patient"]);
    assert_eq!(queue.drain()[0].title, "Patient Record Saved");
}

#[test]
fn test_concrete_facility_sent_by_id() {
    let api = RecordingApi::default();
    let mut screen =
        PatientFormScreen::open(PatientRecord::default(), None, "fac-1", &facilities());

    screen.select_facility("fac-2").unwrap();
    screen
        .save(&api, &NotificationQueue::new(), &TracingTelemetry)
        .unwrap();

    let Call::Create(payload) = &api.calls()[0] else {
        panic!("expected a create call");
    };
    assert_eq!(payload.facility_id.as_deref(), Some("fac-2"));
}

#[test]
fn test_success_releases_guard_and_redirects() {
    let api = RecordingApi::default();
    let mut screen =
        PatientFormScreen::open(PatientRecord::default(), None, "fac-9", &facilities());

    screen.set_field(PatientField::City, "Oakland").unwrap();
    let decision = screen.navigation();
    assert_eq!(
        decision,
        NavigationDecision::Confirm {
            message: UNSAVED_CHANGES_PROMPT
        }
    );
    assert!(!decision.allows(PromptChoice::Cancel));
    assert!(decision.allows(PromptChoice::Discard));

    screen
        .save(&api, &NotificationQueue::new(), &TracingTelemetry)
        .unwrap();

    assert_eq!(screen.phase(), ScreenPhase::Submitted);
    assert!(!screen.state().is_dirty());
    assert_eq!(screen.navigation(), NavigationDecision::Proceed);
    assert_eq!(screen.redirect().as_deref(), Some("/patients/?facility=fac-9"));
}

#[test]
fn test_failure_keeps_edits_and_allows_retry() {
    let failing = RecordingApi::failing();
    let queue = NotificationQueue::new();
    let telemetry = RecordingTelemetry::default();
    let mut screen = PatientFormScreen::open(
        existing_record(),
        Some("abc123".into()),
        "fac-1",
        &facilities(),
    );

    screen.set_field(PatientField::ZipCode, "0000").unwrap();
    let outcome = screen.save(&failing, &queue, &telemetry).unwrap();

    assert!(matches!(
        outcome,
        SaveOutcome::Failed {
            kind: SaveKind::Updated,
            ..
        }
    ));
    assert_eq!(failing.calls().len(), 1);
    assert_eq!(screen.phase(), ScreenPhase::Editing);
    assert!(screen.state().is_dirty());
    assert!(screen.navigation().is_blocking());
    assert_eq!(screen.redirect(), None);
    assert_eq!(screen.state().record().zip_code.as_deref(), Some("0000"));
    assert_eq!(screen.state().record().first_name.as_deref(), Some("Ana"));

    assert_eq!(telemetry.exceptions.lock().unwrap().len(), 1);
    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].title, "Patient Data Error");
    assert_eq!(notes[0].body, "Please check for missing data or typos.");

    // The user retries by hand after fixing the value.
    let api = RecordingApi::default();
    screen.set_field(PatientField::ZipCode, "62702").unwrap();
    screen.save(&api, &queue, &telemetry).unwrap();
    assert_eq!(screen.phase(), ScreenPhase::Submitted);
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn test_in_flight_save_blocks_second_request() {
    let api = RecordingApi::default();
    let queue = NotificationQueue::new();
    let mut screen =
        PatientFormScreen::open(PatientRecord::default(), None, "fac-1", &facilities());
    screen.set_field(PatientField::FirstName, "Jane").unwrap();

    let request = screen.begin_save(&TracingTelemetry).unwrap();
    assert_eq!(
        screen.begin_save(&TracingTelemetry).unwrap_err(),
        FormError::SaveInFlight
    );

    // The payload is fixed; an edit now could never reach the server.
    assert_eq!(
        screen.set_field(PatientField::LastName, "Doe").unwrap_err(),
        FormError::SaveInFlight
    );
    assert!(screen.set_field_by_name("city", "Oakland").is_err());

    let result = request.dispatch(&api);
    screen
        .finish_save(request.kind(), result, &queue, &TracingTelemetry)
        .unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Create(sent) = &calls[0] else {
        panic!("expected a create call");
    };
    // Everything the user typed was sent; nothing is left unsaved.
    assert_eq!(sent, &PatientPayload::from_state(screen.state()));
    assert_eq!(screen.state().record().last_name, None);
    assert!(!screen.state().is_dirty());
    assert_eq!(screen.navigation(), NavigationDecision::Proceed);
}

#[test]
fn test_invalid_flag_rejected_without_side_effects() {
    let mut screen =
        PatientFormScreen::open(existing_record(), Some("abc123".into()), "fac-1", &[]);
    let before = screen.state().clone();

    assert!(screen
        .set_field(PatientField::EmployedInHealthcare, "maybe")
        .is_err());
    assert_eq!(screen.state(), &before);
    assert!(!screen.state().is_dirty());
}

#[test]
fn test_facility_options_in_source_order() {
    let screen = PatientFormScreen::open(PatientRecord::default(), None, "fac-1", &facilities());
    let labels: Vec<&str> = screen
        .facility_options()
        .iter()
        .map(|o| o.label.as_str())
        .collect();

    assert_eq!(
        labels,
        vec!["-Select-", "All facilities", "Main Clinic", "Downtown Site"]
    );
}

fn text_field() -> impl Strategy<Value = PatientField> {
    prop::sample::select(
        PatientField::ALL
            .iter()
            .copied()
            .filter(|f| !f.is_flag())
            .collect::<Vec<_>>(),
    )
}

proptest! {
    #[test]
    fn prop_set_field_leaves_other_fields_unchanged(
        field in text_field(),
        value in "[A-Za-z0-9 ]{0,24}",
    ) {
        let mut screen = PatientFormScreen::open(
            existing_record(),
            Some("abc123".into()),
            "fac-1",
            &facilities(),
        );
        let before = screen.state().clone();

        screen.set_field(field, &value).unwrap();

        prop_assert!(screen.state().is_dirty());
        prop_assert_eq!(screen.state().value(field), Some(value.clone()));
        prop_assert_eq!(screen.state().facility(), before.facility());
        for other in PatientField::ALL.iter().copied().filter(|f| *f != field) {
            prop_assert_eq!(screen.state().value(other), before.value(other));
        }
    }

    #[test]
    fn prop_flag_translation(raw in prop::sample::select(vec!["YES", "NO"])) {
        let mut screen =
            PatientFormScreen::open(PatientRecord::default(), None, "fac-1", &[]);
        screen.set_field(PatientField::ResidentCongregateSetting, raw).unwrap();

        let api = RecordingApi::default();
        screen.save(&api, &NotificationQueue::new(), &TracingTelemetry).unwrap();

        let Call::Create(payload) = &api.calls()[0] else {
            panic!("expected a create call");
        };
        prop_assert_eq!(payload.resident_congregate_setting, raw == "YES");
    }
}

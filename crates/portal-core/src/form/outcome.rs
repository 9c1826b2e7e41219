//! Save outcome reporting: toasts and telemetry.

use std::sync::Mutex;

use super::payload::SaveKind;
use crate::api::ApiError;

pub const PATIENT_TERM: &str = "Patient";

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient notification for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Toast presenter.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Usage and exception collector. Calls are fire-and-forget.
pub trait Telemetry {
    fn track_event(&self, name: &str);

    fn track_exception(&self, error: &ApiError);
}

/// Notifier that queues notifications for the host to drain.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Telemetry that writes to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn track_event(&self, name: &str) {
        tracing::info!(event = name, "Telemetry event");
    }

    fn track_exception(&self, error: &ApiError) {
        tracing::error!(error = %error, "Telemetry exception");
    }
}

/// Turns a save result into notifications and telemetry.
pub struct OutcomeHandler<'a> {
    notifier: &'a dyn Notifier,
    telemetry: &'a dyn Telemetry,
}

impl<'a> OutcomeHandler<'a> {
    pub fn new(notifier: &'a dyn Notifier, telemetry: &'a dyn Telemetry) -> Self {
        Self {
            notifier,
            telemetry,
        }
    }

    pub fn success(&self, kind: SaveKind) {
        let notification = match kind {
            SaveKind::Created => Notification::success(
                format!("{} Record Created", PATIENT_TERM),
                "New information record has been created.",
            ),
            SaveKind::Updated => Notification::success(
                format!("{} Record Saved", PATIENT_TERM),
                "Information record has been updated.",
            ),
        };
        self.notifier.notify(notification);
    }

    /// Report first, then show the generic message. Error kinds are not
    /// distinguished for the user.
    pub fn failure(&self, error: &ApiError) {
        self.telemetry.track_exception(error);
        self.notifier.notify(Notification::error(
            format!("{} Data Error", PATIENT_TERM),
            "Please check for missing data or typos.",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingTelemetry {
        exceptions: Mutex<Vec<String>>,
    }

    impl Telemetry for RecordingTelemetry {
        fn track_event(&self, _name: &str) {}

        fn track_exception(&self, error: &ApiError) {
            self.exceptions.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn test_success_messages() {
        let queue = NotificationQueue::new();
        let telemetry = RecordingTelemetry::default();
        let handler = OutcomeHandler::new(&queue, &telemetry);

        handler.success(SaveKind::Created);
        handler.success(SaveKind::Updated);

        let notes = queue.drain();
        assert_eq!(notes[0].title, "Patient Record Created");
        assert_eq!(notes[0].body, "New information record has been created.");
        assert_eq!(notes[1].title, "Patient Record Saved");
        assert_eq!(notes[1].body, "Information record has been updated.");
        assert!(notes.iter().all(|n| n.kind == NotificationKind::Success));
        assert!(telemetry.exceptions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failure_reports_then_notifies() {
        let queue = NotificationQueue::new();
        let telemetry = RecordingTelemetry::default();
        let handler = OutcomeHandler::new(&queue, &telemetry);

        handler.failure(&ApiError::Connection("http://localhost".into()));

        let notes = queue.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].title, "Patient Data Error");
        assert_eq!(notes[0].body, "Please check for missing data or typos.");
        assert_eq!(telemetry.exceptions.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_queue_drain_empties() {
        let queue = NotificationQueue::new();
        queue.notify(Notification::success("a", "b"));
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }
}

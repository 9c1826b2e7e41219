//! SQLite schema definition.

/// Complete database schema for the portal core.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patient Form Drafts (Staging Area - Mutable, never synced)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient_form_drafts (
    draft_id TEXT PRIMARY KEY,
    patient_id TEXT,                             -- NULL for a new record
    active_facility_id TEXT NOT NULL,
    record TEXT NOT NULL DEFAULT '{}',           -- JSON PatientRecord
    facility_selection TEXT NOT NULL DEFAULT '', -- raw dropdown value
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_form_drafts_patient ON patient_form_drafts(patient_id);
CREATE INDEX IF NOT EXISTS idx_form_drafts_updated ON patient_form_drafts(updated_at);
"#;

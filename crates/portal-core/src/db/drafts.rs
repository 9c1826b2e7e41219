//! Patient form draft database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{PatientFormDraft, PatientRecord};

const DRAFT_COLUMNS: &str = "draft_id, patient_id, active_facility_id, record, \
                             facility_selection, created_at, updated_at";

impl Database {
    /// Insert a draft, or replace its contents if it already exists.
    ///
    /// `created_at` of an existing draft is preserved.
    pub fn save_form_draft(&self, draft: &PatientFormDraft) -> DbResult<()> {
        let record_json = serde_json::to_string(&draft.record)?;

        self.conn.execute(
            r#"
            INSERT INTO patient_form_drafts (
                draft_id, patient_id, active_facility_id, record,
                facility_selection, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(draft_id) DO UPDATE SET
                record = excluded.record,
                facility_selection = excluded.facility_selection,
                updated_at = excluded.updated_at
            "#,
            params![
                draft.draft_id,
                draft.patient_id,
                draft.active_facility_id,
                record_json,
                draft.facility_selection,
                draft.created_at,
                draft.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a draft by ID.
    pub fn get_form_draft(&self, draft_id: &str) -> DbResult<Option<PatientFormDraft>> {
        self.conn
            .query_row(
                &format!("SELECT {DRAFT_COLUMNS} FROM patient_form_drafts WHERE draft_id = ?"),
                [draft_id],
                DraftRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a draft by ID, failing if it does not exist.
    pub fn require_form_draft(&self, draft_id: &str) -> DbResult<PatientFormDraft> {
        self.get_form_draft(draft_id)?
            .ok_or_else(|| DbError::NotFound(format!("draft {}", draft_id)))
    }

    /// List all drafts, most recently updated first.
    pub fn list_form_drafts(&self) -> DbResult<Vec<PatientFormDraft>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DRAFT_COLUMNS} FROM patient_form_drafts ORDER BY updated_at DESC"
        ))?;

        let rows = stmt.query_map([], DraftRow::from_row)?;

        let mut drafts = Vec::new();
        for row in rows {
            drafts.push(row?.try_into()?);
        }
        Ok(drafts)
    }

    /// List drafts editing one existing patient.
    pub fn list_form_drafts_for_patient(&self, patient_id: &str) -> DbResult<Vec<PatientFormDraft>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DRAFT_COLUMNS} FROM patient_form_drafts \
             WHERE patient_id = ? ORDER BY updated_at DESC"
        ))?;

        let rows = stmt.query_map([patient_id], DraftRow::from_row)?;

        let mut drafts = Vec::new();
        for row in rows {
            drafts.push(row?.try_into()?);
        }
        Ok(drafts)
    }

    /// Delete a draft.
    pub fn delete_form_draft(&self, draft_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patient_form_drafts WHERE draft_id = ?", [draft_id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct DraftRow {
    draft_id: String,
    patient_id: Option<String>,
    active_facility_id: String,
    record: String,
    facility_selection: String,
    created_at: String,
    updated_at: String,
}

impl DraftRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(DraftRow {
            draft_id: row.get(0)?,
            patient_id: row.get(1)?,
            active_facility_id: row.get(2)?,
            record: row.get(3)?,
            facility_selection: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<DraftRow> for PatientFormDraft {
    type Error = DbError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        let record: PatientRecord = serde_json::from_str(&row.record)?;

        Ok(PatientFormDraft {
            draft_id: row.draft_id,
            patient_id: row.patient_id,
            active_facility_id: row.active_facility_id,
            record,
            facility_selection: row.facility_selection,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{YesNo, ALL_FACILITIES};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_draft(patient_id: Option<&str>, updated_at: &str) -> PatientFormDraft {
        let record = PatientRecord {
            first_name: Some("Jane".into()),
            employed_in_healthcare: Some(YesNo::Yes),
            ..Default::default()
        };
        let mut draft = PatientFormDraft::new(
            patient_id.map(String::from),
            "fac-1".into(),
            record,
            ALL_FACILITIES.into(),
        );
        draft.updated_at = updated_at.to_string();
        draft
    }

    #[test]
    fn test_save_and_get_draft() {
        let db = setup_db();
        let draft = make_draft(None, "2024-01-15T10:00:00Z");
        db.save_form_draft(&draft).unwrap();

        let retrieved = db.get_form_draft(&draft.draft_id).unwrap().unwrap();
        assert_eq!(retrieved, draft);
        assert_eq!(retrieved.record.employed_in_healthcare, Some(YesNo::Yes));
    }

    #[test]
    fn test_save_replaces_contents_keeps_created_at() {
        let db = setup_db();
        let mut draft = make_draft(None, "2024-01-15T10:00:00Z");
        db.save_form_draft(&draft).unwrap();
        let created_at = draft.created_at.clone();

        draft.record.city = Some("Oakland".into());
        draft.facility_selection = "fac-2".into();
        draft.created_at = "2099-01-01T00:00:00Z".into();
        draft.updated_at = "2024-01-15T11:00:00Z".into();
        db.save_form_draft(&draft).unwrap();

        let retrieved = db.require_form_draft(&draft.draft_id).unwrap();
        assert_eq!(retrieved.record.city.as_deref(), Some("Oakland"));
        assert_eq!(retrieved.facility_selection, "fac-2");
        assert_eq!(retrieved.created_at, created_at);
        assert_eq!(retrieved.updated_at, "2024-01-15T11:00:00Z");
        assert_eq!(db.list_form_drafts().unwrap().len(), 1);
    }

    #[test]
    fn test_list_most_recent_first() {
        let db = setup_db();
        let older = make_draft(None, "2024-01-15T10:00:00Z");
        let newer = make_draft(Some("abc123"), "2024-01-16T10:00:00Z");
        db.save_form_draft(&older).unwrap();
        db.save_form_draft(&newer).unwrap();

        let drafts = db.list_form_drafts().unwrap();
        assert_eq!(drafts[0].draft_id, newer.draft_id);
        assert_eq!(drafts[1].draft_id, older.draft_id);
    }

    #[test]
    fn test_list_for_patient() {
        let db = setup_db();
        db.save_form_draft(&make_draft(None, "2024-01-15T10:00:00Z"))
            .unwrap();
        let existing = make_draft(Some("abc123"), "2024-01-15T10:00:00Z");
        db.save_form_draft(&existing).unwrap();

        let drafts = db.list_form_drafts_for_patient("abc123").unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].draft_id, existing.draft_id);
    }

    #[test]
    fn test_delete_draft() {
        let db = setup_db();
        let draft = make_draft(None, "2024-01-15T10:00:00Z");
        db.save_form_draft(&draft).unwrap();

        assert!(db.delete_form_draft(&draft.draft_id).unwrap());
        assert!(!db.delete_form_draft(&draft.draft_id).unwrap());
        assert!(db.get_form_draft(&draft.draft_id).unwrap().is_none());
        assert!(matches!(
            db.require_form_draft(&draft.draft_id),
            Err(DbError::NotFound(_))
        ));
    }
}

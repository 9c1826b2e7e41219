//! Date-of-birth gate in front of the patient portal.

use chrono::NaiveDate;

use super::{PxpError, PxpResult};

pub const DOB_PROMPT: &str = "Enter your date of birth to access your COVID-19 Testing Portal.";
pub const DOB_LABEL: &str = "Date of Birth (MMDDYYYY)";
pub const DOB_LENGTH: usize = 8;

/// Single text input holding the birth date as `MMDDYYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DobForm {
    input: String,
}

impl DobForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &'static str {
        DOB_PROMPT
    }

    pub fn label(&self) -> &'static str {
        DOB_LABEL
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, raw: &str) {
        self.input = raw.trim().to_string();
    }

    /// Whether the input matches the `[0-9]{8}` pattern. Does not check the
    /// calendar.
    pub fn matches_pattern(&self) -> bool {
        self.input.len() == DOB_LENGTH && self.input.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn submit(&self) -> PxpResult<NaiveDate> {
        parse_birth_date(&self.input)
    }
}

/// Parse `MMDDYYYY` into a calendar date.
pub fn parse_birth_date(raw: &str) -> PxpResult<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != DOB_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PxpError::InvalidBirthDate(format!(
            "expected {} digits (MMDDYYYY)",
            DOB_LENGTH
        )));
    }

    NaiveDate::parse_from_str(raw, "%m%d%Y")
        .map_err(|_| PxpError::InvalidBirthDate("not a calendar date".to_string()))
}

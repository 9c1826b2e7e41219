//! Patient experience (pxp) flows: the patient identifies themself by date
//! of birth, then answers the time-of-test questionnaire.

mod dob;
mod questionnaire;

pub use dob::*;
pub use questionnaire::*;

use thiserror::Error;

/// Patient experience errors.
#[derive(Error, Debug, PartialEq)]
pub enum PxpError {
    #[error("Invalid date of birth: {0}")]
    InvalidBirthDate(String),

    #[error("Missing patient link id")]
    MissingPatientLink,

    #[error("Invalid portal URL: {0}")]
    InvalidUrl(String),
}

pub type PxpResult<T> = Result<T, PxpError>;

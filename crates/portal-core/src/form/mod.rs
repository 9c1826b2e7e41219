//! Patient form engine.
//!
//! ```text
//! widget change ──▶ FormState (dirty = true)
//!                        │
//!                  user presses save
//!                        │
//!              PatientFormScreen::begin_save ──▶ SaveRequest (Create | Update)
//!                        │
//!                 PatientApi (exactly one call)
//!                        │
//!              PatientFormScreen::finish_save
//!                 ┌──────┴───────┐
//!              success         failure
//!        notify + Submitted   report + notify, stay Editing (dirty restored)
//!        redirect to listing
//! ```

mod facility;
mod field;
mod guard;
mod outcome;
mod payload;
mod screen;
mod state;

pub use facility::*;
pub use field::*;
pub use guard::*;
pub use outcome::*;
pub use payload::*;
pub use screen::*;
pub use state::*;

use thiserror::Error;

/// Form errors.
#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: expected YES or NO, got {value:?}")]
    InvalidFlagValue { field: &'static str, value: String },

    #[error("No unsaved changes")]
    NoChanges,

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("No save is in progress")]
    NoSaveInFlight,

    #[error("Record already submitted")]
    AlreadySubmitted,
}

pub type FormResult<T> = Result<T, FormError>;

//! Domain models for the testing portal.

mod choices;
mod draft;
mod facility;
mod patient;
mod questionnaire;

pub use choices::*;
pub use draft::*;
pub use facility::*;
pub use patient::*;
pub use questionnaire::*;

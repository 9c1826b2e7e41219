//! Time-of-test questionnaire container.
//!
//! Submits the patient's answers once and, on success, hands the host the
//! confirmation route. A failure leaves the patient on the page with their
//! answers intact.

use chrono::NaiveDate;
use reqwest::Url;

use super::{PxpError, PxpResult};
use crate::api::PxpApi;
use crate::form::{Notification, Notifier};
use crate::models::AoeAnswers;

/// Progress marker for the host's step indicator.
pub const SYMPTOMS_PAGE: &str = "symptoms";

pub const SUBMIT_ERROR_MESSAGE: &str = "There was an error submitting your responses";

const PATIENT_LINK_PARAM: &str = "plid";

/// Extract the patient link id (`plid`) from a portal URL. Relative URLs
/// such as `/pxp/questions?plid=...` are accepted.
pub fn patient_link_id_from_url(url: &str) -> PxpResult<String> {
    let base =
        Url::parse("http://localhost/").map_err(|e| PxpError::InvalidUrl(e.to_string()))?;
    let parsed = Url::options()
        .base_url(Some(&base))
        .parse(url)
        .map_err(|e| PxpError::InvalidUrl(e.to_string()))?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == PATIENT_LINK_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(PxpError::MissingPatientLink)
}

/// One questionnaire visit for a verified patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfTestFlow {
    patient_link_id: String,
    birth_date: NaiveDate,
    next_page: bool,
}

impl TimeOfTestFlow {
    pub fn new(patient_link_id: impl Into<String>, birth_date: NaiveDate) -> PxpResult<Self> {
        let patient_link_id = patient_link_id.into();
        if patient_link_id.is_empty() {
            return Err(PxpError::MissingPatientLink);
        }
        Ok(Self {
            patient_link_id,
            birth_date,
            next_page: false,
        })
    }

    pub fn from_url(url: &str, birth_date: NaiveDate) -> PxpResult<Self> {
        Self::new(patient_link_id_from_url(url)?, birth_date)
    }

    pub fn patient_link_id(&self) -> &str {
        &self.patient_link_id
    }

    pub fn current_page(&self) -> &'static str {
        SYMPTOMS_PAGE
    }

    pub fn is_complete(&self) -> bool {
        self.next_page
    }

    /// Confirmation route, available once the answers are accepted.
    pub fn redirect(&self) -> Option<String> {
        self.next_page.then(|| {
            crate::route::with_query(
                "/pxp/success",
                &[(PATIENT_LINK_PARAM, self.patient_link_id.as_str())],
            )
        })
    }

    /// Send the answers. Returns whether they were accepted.
    pub fn submit(
        &mut self,
        api: &dyn PxpApi,
        answers: &AoeAnswers,
        notifier: &dyn Notifier,
    ) -> bool {
        match api.submit_questions(&self.patient_link_id, self.birth_date, answers) {
            Ok(()) => {
                tracing::info!(plid = %self.patient_link_id, "Time-of-test answers accepted");
                self.next_page = true;
                true
            }
            Err(e) => {
                tracing::warn!(
                    plid = %self.patient_link_id,
                    error = %e,
                    "Time-of-test submission failed"
                );
                notifier.notify(Notification::error(SUBMIT_ERROR_MESSAGE, ""));
                false
            }
        }
    }
}

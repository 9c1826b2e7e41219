//! REST client for the patient experience endpoints.

use chrono::NaiveDate;
use serde::Serialize;

use super::{build_http_client, transport_error, ApiError, ApiResult, PxpApi};
use crate::config::PortalConfig;
use crate::models::AoeAnswers;

/// Request body for `POST {base}/questions`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitQuestionsRequest<'a> {
    patient_link_id: &'a str,
    date_of_birth: String,
    data: &'a AoeAnswers,
}

/// Blocking client for the pxp API.
pub struct PxpClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl PxpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ApiResult<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_http_client(timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn from_config(config: &PortalConfig) -> ApiResult<Self> {
        Self::new(&config.pxp_url, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PxpApi for PxpClient {
    fn submit_questions(
        &self,
        patient_link_id: &str,
        birth_date: NaiveDate,
        answers: &AoeAnswers,
    ) -> ApiResult<()> {
        let url = format!("{}/questions", self.base_url);
        let body = SubmitQuestionsRequest {
            patient_link_id,
            date_of_birth: birth_date.format("%Y-%m-%d").to_string(),
            data: answers,
        };

        tracing::debug!("Submitting time-of-test answers");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| transport_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

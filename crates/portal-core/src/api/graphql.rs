//! GraphQL client for the patient mutations.

use serde::{Deserialize, Serialize};

use super::{build_http_client, transport_error, ApiError, ApiResult, PatientApi};
use crate::config::PortalConfig;
use crate::form::PatientPayload;

/// Create mutation. Variables are exactly the payload fields.
pub const ADD_PATIENT: &str = r#"
mutation AddPatient(
  $facilityId: String
  $lookupId: String
  $firstName: String!
  $middleName: String
  $lastName: String!
  $birthDate: LocalDate!
  $street: String!
  $streetTwo: String
  $city: String
  $state: String!
  $zipCode: String!
  $telephone: String!
  $role: String
  $email: String
  $county: String
  $race: String
  $ethnicity: String
  $gender: String
  $residentCongregateSetting: Boolean!
  $employedInHealthcare: Boolean!
) {
  addPatient(
    facilityId: $facilityId
    lookupId: $lookupId
    firstName: $firstName
    middleName: $middleName
    lastName: $lastName
    birthDate: $birthDate
    street: $street
    streetTwo: $streetTwo
    city: $city
    state: $state
    zipCode: $zipCode
    telephone: $telephone
    role: $role
    email: $email
    county: $county
    race: $race
    ethnicity: $ethnicity
    gender: $gender
    residentCongregateSetting: $residentCongregateSetting
    employedInHealthcare: $employedInHealthcare
  )
}
"#;

/// Update mutation. Same variables plus the mandatory `patientId`.
pub const UPDATE_PATIENT: &str = r#"
mutation UpdatePatient(
  $facilityId: String
  $patientId: String!
  $lookupId: String
  $firstName: String!
  $middleName: String
  $lastName: String!
  $birthDate: LocalDate!
  $street: String!
  $streetTwo: String
  $city: String
  $state: String!
  $zipCode: String!
  $telephone: String!
  $role: String
  $email: String
  $county: String
  $race: String
  $ethnicity: String
  $gender: String
  $residentCongregateSetting: Boolean!
  $employedInHealthcare: Boolean!
) {
  updatePatient(
    facilityId: $facilityId
    patientId: $patientId
    lookupId: $lookupId
    firstName: $firstName
    middleName: $middleName
    lastName: $lastName
    birthDate: $birthDate
    street: $street
    streetTwo: $streetTwo
    city: $city
    state: $state
    zipCode: $zipCode
    telephone: $telephone
    role: $role
    email: $email
    county: $county
    race: $race
    ethnicity: $ethnicity
    gender: $gender
    residentCongregateSetting: $residentCongregateSetting
    employedInHealthcare: $employedInHealthcare
  )
}
"#;

/// Request body for a GraphQL POST.
#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: V,
}

/// Update variables: the payload with `patientId` alongside.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientVariables<'a> {
    pub patient_id: &'a str,
    #[serde(flatten)]
    pub payload: &'a PatientPayload,
}

/// Response envelope. `data` is not consumed.
#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// Blocking GraphQL client.
pub struct GraphQlClient {
    endpoint: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
    auth_token: Option<String>,
}

impl GraphQlClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: &str, timeout_secs: u64) -> ApiResult<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: build_http_client(timeout_secs)?,
            timeout_secs,
            auth_token: None,
        })
    }

    /// Create a client from portal configuration.
    pub fn from_config(config: &PortalConfig) -> ApiResult<Self> {
        let client = Self::new(&config.graphql_url, config.timeout_secs)?;
        Ok(match &config.auth_token {
            Some(token) => client.with_auth_token(token.clone()),
            None => client,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_auth_token(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn execute<V: Serialize>(
        &self,
        operation_name: &str,
        query: &str,
        variables: V,
    ) -> ApiResult<()> {
        let body = GraphQlRequest {
            query,
            operation_name,
            variables,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(operation = operation_name, "Sending GraphQL mutation");
        let response = request
            .send()
            .map_err(|e| transport_error(e, &self.endpoint, self.timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ApiError::ResponseParsing(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        check_response(&text)
    }
}

impl PatientApi for GraphQlClient {
    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()> {
        self.execute("AddPatient", ADD_PATIENT, payload)
    }

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<()> {
        self.execute(
            "UpdatePatient",
            UPDATE_PATIENT,
            UpdatePatientVariables {
                patient_id,
                payload,
            },
        )
    }
}

/// Treat a 2xx body carrying a non-empty `errors` array as a failure.
pub(crate) fn check_response(body: &str) -> ApiResult<()> {
    let parsed: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| ApiError::ResponseParsing(e.to_string()))?;

    match parsed.errors {
        Some(errors) if !errors.is_empty() => Err(ApiError::GraphQl(
            errors.into_iter().map(|e| e.message).collect(),
        )),
        _ => Ok(()),
    }
}

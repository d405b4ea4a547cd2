//! Records API HTTP client
//!
//! Talks JSON over HTTP to the records service. Every call is a single GET;
//! the dashboard never writes.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::{Patient, PatientPage, RecordList, StatsSummary, TransactionList};

/// Default request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(endpoint: String) -> Self {
        Self::with_timeouts(endpoint, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(endpoint: String, timeout: Duration, connect_timeout: Duration) -> Self {
        let base_url = normalize_endpoint(endpoint);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("HTTP client builder failed ({}), using defaults", e);
                Client::new()
            });

        log::info!("📡 Records API client initialized: {}", base_url);

        Self { base_url, client }
    }

    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        log::debug!("→ GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Get one page of patients, optionally filtered by a search term.
    pub async fn get_patients(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<PatientPage, ClientError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }

        let result: PatientPage = self.get_json(self.url(&["patients"])?, &query).await?;
        log::info!(
            "✅ Retrieved {} patients (page {})",
            result.patients.len(),
            page
        );
        Ok(result)
    }

    /// Get a single patient. A JSON `null` body resolves to `None`.
    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, ClientError> {
        self.get_json(self.url(&["patients", patient_id])?, &[]).await
    }

    /// Get all medical records for a patient.
    pub async fn get_patient_records(&self, patient_id: &str) -> Result<RecordList, ClientError> {
        let result: RecordList = self
            .get_json(self.url(&["patients", patient_id, "records"])?, &[])
            .await?;
        log::info!(
            "✅ Retrieved {} records for patient {}",
            result.records.len(),
            patient_id
        );
        Ok(result)
    }

    /// Get the most recent transactions, optionally for one wallet address.
    pub async fn get_transactions(
        &self,
        wallet_address: Option<&str>,
        limit: u32,
    ) -> Result<TransactionList, ClientError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(address) = wallet_address {
            query.push(("walletAddress", address.to_string()));
        }

        let result: TransactionList = self.get_json(self.url(&["transactions"])?, &query).await?;
        log::info!("✅ Retrieved {} transactions", result.transactions.len());
        Ok(result)
    }

    /// Get platform-wide aggregate statistics.
    pub async fn get_stats(&self) -> Result<StatsSummary, ClientError> {
        self.get_json(self.url(&["stats"])?, &[]).await
    }
}

/// Ensure the endpoint is an HTTP URL without a trailing slash.
fn normalize_endpoint(endpoint: String) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/').to_string();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint
    } else {
        format!("http://{}", endpoint)
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    /// Non-success status whose body carried a readable message.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn http(status: u16) -> Self {
        let message = match status {
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown Error",
        };
        Self::Http(status, message.to_string())
    }

    /// Build an error from a failed response body, preferring the server's
    /// own `error` or `message` field when the body is JSON.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["error", "message"].iter().find_map(|key| {
                    value
                        .get(*key)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| s.to_string())
                })
            });

        match message {
            Some(message) => Self::Api { status, message },
            None => Self::http(status),
        }
    }
}

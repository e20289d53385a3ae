//! HTTP warehouse client.
//!
//! Executes SQL over the warehouse's HTTP query endpoint and returns rows
//! as name→value maps. One bounded request per call — the pipeline attempts
//! each section exactly once per run, so there is no retry or backoff here.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::source::{QuerySource, Row, SourceError};

/// Query endpoint response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    rows: Option<Vec<Row>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Client for the warehouse query endpoint.
pub struct WarehouseClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    project_id: String,
    token: Option<String>,
    timeout_secs: u64,
}

impl WarehouseClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            token,
            timeout_secs,
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }

    /// Unpack the response envelope into rows.
    fn parse_response(resp: QueryResponse) -> Result<Vec<Row>, SourceError> {
        if let Some(err) = resp.error {
            return Err(SourceError::QueryFailed(format!(
                "{}: {}",
                err.code, err.message
            )));
        }
        Ok(resp.rows.unwrap_or_default())
    }
}

impl QuerySource for WarehouseClient {
    fn name(&self) -> &str {
        "warehouse"
    }

    fn query(&self, sql: &str) -> Result<Vec<Row>, SourceError> {
        let mut req = self
            .client
            .post(self.query_url())
            .json(&json!({ "query": sql }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else if e.is_connect() {
                SourceError::NetworkUnreachable(e.to_string())
            } else {
                SourceError::Other(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SourceError::AuthenticationRejected(format!(
                "HTTP {status}"
            )));
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SourceError::QueryFailed(format!(
                "HTTP {status}: {}",
                truncate(&body, 200)
            )));
        }

        let parsed: QueryResponse = resp
            .json()
            .map_err(|e| SourceError::ResponseFormatChanged(e.to_string()))?;
        Self::parse_response(parsed)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

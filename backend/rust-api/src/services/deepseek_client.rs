use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::models::ParseRequest;

/// Upper bound for one call to the parsing service. There is no retry.
pub const PARSE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to parsing service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("parsing service returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("parsing service returned a null body")]
    NullBody,
}

#[derive(Debug)]
pub enum RemoteReply {
    Success(Value),
    Rejected { status: StatusCode, body: String },
}

/// Client for the remote structured-parsing endpoint.
pub struct DeepSeekClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl DeepSeekClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: PARSE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn parse(&self, req: &ParseRequest) -> Result<RemoteReply, RemoteError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Ok(RemoteReply::Rejected { status, body });
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice(&bytes)? {
            Value::Null => Err(RemoteError::NullBody),
            data => Ok(RemoteReply::Success(data)),
        }
    }
}

/// The body's `parsed` member when it carries a value, otherwise the whole body.
pub fn extract_parsed(mut data: Value) -> Value {
    if data.get("parsed").is_some_and(is_truthy) {
        data["parsed"].take()
    } else {
        data
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

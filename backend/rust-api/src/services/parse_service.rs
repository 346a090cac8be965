use crate::config::Config;
use crate::metrics::{self, PARSE_REQUESTS_TOTAL};
use crate::models::{ParseRequest, ParseResponse, ParseSource};
use crate::services::classifier;
use crate::services::deepseek_client::{extract_parsed, DeepSeekClient, RemoteReply};

pub struct ParseService {
    remote: Option<DeepSeekClient>,
}

impl ParseService {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let remote = config
            .deepseek_target()
            .map(|(api_key, endpoint)| DeepSeekClient::new(http, endpoint, api_key));
        Self { remote }
    }

    pub fn with_remote(remote: DeepSeekClient) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// Never fails: remote problems are folded into a fallback result and
    /// reported through `used`.
    pub async fn handle_parse(&self, req: ParseRequest) -> ParseResponse {
        let response = self.resolve(&req).await;

        PARSE_REQUESTS_TOTAL
            .with_label_values(&[response.used.as_str()])
            .inc();

        response
    }

    async fn resolve(&self, req: &ParseRequest) -> ParseResponse {
        let Some(remote) = &self.remote else {
            tracing::debug!("DeepSeek not configured, using fallback parser");
            return fallback(req, ParseSource::Fallback);
        };

        let outcome = metrics::track_remote_call_with("parse", remote.parse(req), |r| {
            matches!(r, Ok(RemoteReply::Success(_)))
        })
        .await;

        match outcome {
            Ok(RemoteReply::Success(data)) => {
                tracing::debug!("DeepSeek parse succeeded");
                ParseResponse::remote(extract_parsed(data))
            }
            Ok(RemoteReply::Rejected { status, body }) => {
                tracing::error!(
                    status = status.as_u16(),
                    body = %body,
                    "DeepSeek error response from {}",
                    remote.endpoint()
                );
                let mut response = fallback(req, ParseSource::FallbackDueToDeepseekError);
                response.deepseek_status = Some(status.as_u16());
                response
            }
            Err(e) => {
                tracing::error!("Parse error: {}", e);
                let mut response = fallback(req, ParseSource::FallbackDueToException);
                response.error = Some(e.to_string());
                response
            }
        }
    }
}

fn fallback(req: &ParseRequest, used: ParseSource) -> ParseResponse {
    let parsed = classifier::classify(req.text.as_deref().unwrap_or(""), req.has_image());
    ParseResponse::fallback(parsed, used)
}

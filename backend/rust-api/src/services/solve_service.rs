use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;
use crate::metrics;
use crate::models::SolveRequest;

const SOLVE_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.3;

const PROMPT_TEMPLATE: &str = r#"You are a high school math coach. Solve the problem below and output exactly one JSON object and nothing else.
The JSON must have exactly this shape:
{
  "problem": "<the original problem text>",
  "final_answer": "<the final answer or conclusion>",
  "steps": [
    {"step": "1", "content": "what is done or computed", "explain": "why it is done"},
    {"step": "2", "content": "...", "explain": "..."}
  ],
  "why": "<2-3 sentences summarising the strategy>",
  "similar": ["similar problem 1", "similar problem 2"]
}
Problem: {problem}
Level: {level}
"#;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("DEEPSEEK_API_KEY is not configured")]
    MissingApiKey,

    #[error("model call failed: {status}, {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model response has no message content")]
    EmptyContent,

    #[error("model answer is not valid JSON: {0}")]
    InvalidAnswer(#[from] serde_json::Error),
}

/// Asks the chat-completion endpoint for a worked solution.
pub struct SolveService {
    http: reqwest::Client,
    api_key: Option<String>,
    chat_url: String,
    model: String,
}

impl SolveService {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.deepseek_api_key.clone(),
            chat_url: config.deepseek_chat_url.clone(),
            model: config.deepseek_model.clone(),
        }
    }

    pub async fn solve(&self, req: &SolveRequest) -> Result<Value, SolveError> {
        let api_key = self.api_key.as_deref().ok_or(SolveError::MissingApiKey)?;

        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": build_prompt(req)}],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let data = metrics::track_remote_call("solve", async {
            let response = self
                .http
                .post(&self.chat_url)
                .bearer_auth(api_key)
                .timeout(SOLVE_TIMEOUT)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                return Err(SolveError::Upstream { status, body });
            }

            Ok::<Value, SolveError>(response.json::<Value>().await?)
        })
        .await?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(SolveError::EmptyContent)?;

        Ok(serde_json::from_str(strip_code_fence(content))?)
    }
}

pub fn build_prompt(req: &SolveRequest) -> String {
    PROMPT_TEMPLATE
        .replace("{problem}", &req.problem)
        .replace("{level}", &req.level)
}

/// Models like to wrap JSON in a markdown fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

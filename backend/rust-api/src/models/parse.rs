use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /parse`. Both fields are optional and otherwise unchecked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

impl ParseRequest {
    /// Lenient decode: a missing, empty or malformed body yields empty fields,
    /// and so does a field of the wrong JSON type.
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(_) => return Self::default(),
        };

        Self {
            text: string_field(&value, "text"),
            image_base64: string_field(&value, "image_base64"),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_base64.as_deref().is_some_and(|s| !s.is_empty())
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProblem {
    pub question: String,
    pub equations: Vec<String>,
    pub diagram_desc: Option<String>,
    pub knowledge_tags: Vec<String>,
    pub summary: String,
}

/// Either our own fallback result or whatever the remote service sent back.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParsedPayload {
    Fallback(ParsedProblem),
    Remote(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    Fallback,
    Deepseek,
    FallbackDueToDeepseekError,
    FallbackDueToException,
}

impl ParseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseSource::Fallback => "fallback",
            ParseSource::Deepseek => "deepseek",
            ParseSource::FallbackDueToDeepseekError => "fallback_due_to_deepseek_error",
            ParseSource::FallbackDueToException => "fallback_due_to_exception",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub parsed: ParsedPayload,
    pub used: ParseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepseek_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResponse {
    pub fn fallback(parsed: ParsedProblem, used: ParseSource) -> Self {
        Self {
            success: true,
            parsed: ParsedPayload::Fallback(parsed),
            used,
            deepseek_status: None,
            error: None,
        }
    }

    pub fn remote(parsed: Value) -> Self {
        Self {
            success: true,
            parsed: ParsedPayload::Remote(parsed),
            used: ParseSource::Deepseek,
            deepseek_status: None,
            error: None,
        }
    }
}

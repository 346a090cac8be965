use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /save_wrong`. A missing body, or one not sent as JSON, is an
/// empty record; a JSON body must be an object.
pub fn record_from_body(
    body: &[u8],
    is_json: bool,
) -> Result<Map<String, Value>, serde_json::Error> {
    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    serde_json::from_slice(body)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWrongResponse {
    pub success: bool,
    pub message: String,
    pub record_count: usize,
}

impl SaveWrongResponse {
    pub fn saved(record_count: usize) -> Self {
        Self {
            success: true,
            message: "saved".to_string(),
            record_count,
        }
    }
}

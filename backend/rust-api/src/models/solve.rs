use serde::{Deserialize, Serialize};

pub const DEFAULT_LEVEL: &str = "high school";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub problem: String,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CHAT_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub deepseek_endpoint: Option<String>,
    pub deepseek_chat_url: String,
    pub deepseek_model: String,
    pub port: u16,
    pub wrong_book_path: PathBuf,
    pub static_dir: PathBuf,
    pub metrics_auth: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            deepseek_endpoint: None,
            deepseek_chat_url: DEFAULT_CHAT_URL.to_string(),
            deepseek_model: DEFAULT_MODEL.to_string(),
            port: DEFAULT_PORT,
            wrong_book_path: PathBuf::from("wrong_book.json"),
            static_dir: PathBuf::from("static"),
            metrics_auth: "admin:changeme".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first (two levels up), then the local one
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml + APP__ overrides, plain env vars as the last resort
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let defaults = Config::default();

        let deepseek_api_key = non_empty(
            settings
                .get_string("deepseek.api_key")
                .or_else(|_| env::var("DEEPSEEK_API_KEY"))
                .ok(),
        );

        let deepseek_endpoint = non_empty(
            settings
                .get_string("deepseek.endpoint")
                .or_else(|_| env::var("DEEPSEEK_ENDPOINT"))
                .ok(),
        );

        let deepseek_chat_url = settings
            .get_string("deepseek.chat_url")
            .or_else(|_| env::var("DEEPSEEK_URL"))
            .unwrap_or(defaults.deepseek_chat_url);

        let deepseek_model = settings
            .get_string("deepseek.model")
            .or_else(|_| env::var("DEEPSEEK_MODEL"))
            .unwrap_or(defaults.deepseek_model);

        let port = match settings.get_int("server.port") {
            Ok(port) => u16::try_from(port).map_err(|_| {
                config::ConfigError::Message(format!("server.port out of range: {}", port))
            })?,
            Err(_) => match env::var("PORT") {
                Ok(raw) => raw.parse().map_err(|_| {
                    config::ConfigError::Message(format!("PORT is not a valid port: {}", raw))
                })?,
                Err(_) => DEFAULT_PORT,
            },
        };

        let wrong_book_path = settings
            .get_string("storage.wrong_book_path")
            .or_else(|_| env::var("WRONG_BOOK_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.wrong_book_path);

        let static_dir = settings
            .get_string("server.static_dir")
            .or_else(|_| env::var("STATIC_DIR"))
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or(defaults.metrics_auth);

        Ok(Config {
            deepseek_api_key,
            deepseek_endpoint,
            deepseek_chat_url,
            deepseek_model,
            port,
            wrong_book_path,
            static_dir,
            metrics_auth,
        })
    }

    /// Key and endpoint, only when both are set.
    pub fn deepseek_target(&self) -> Option<(&str, &str)> {
        match (&self.deepseek_api_key, &self.deepseek_endpoint) {
            (Some(key), Some(endpoint)) => Some((key.as_str(), endpoint.as_str())),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

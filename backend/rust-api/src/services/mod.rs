use crate::config::Config;

pub mod classifier;
pub mod deepseek_client;
pub mod parse_service;
pub mod solve_service;
pub mod wrong_book;

use wrong_book::WrongBook;

pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub wrong_book: WrongBook,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mathocr-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let wrong_book = WrongBook::new(config.wrong_book_path.clone());
        tracing::info!("Wrong answers stored at {}", wrong_book.path().display());

        Ok(Self {
            config,
            http,
            wrong_book,
        })
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::path::PathBuf;

/// Root directory of the static site.
#[derive(Debug, Clone)]
pub struct StaticSite {
    pub root: PathBuf,
}

impl StaticSite {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read_page(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// GET / : `index.html`, or `ocr.html` when there is no index page.
pub async fn index_page(State(site): State<StaticSite>) -> Response {
    for name in ["index.html", "ocr.html"] {
        if let Some(body) = site.read_page(name).await {
            return Html(body).into_response();
        }
    }
    not_found("index.html")
}

/// GET /ocr.html
pub async fn ocr_page(State(site): State<StaticSite>) -> Response {
    match site.read_page("ocr.html").await {
        Some(body) => Html(body).into_response(),
        None => not_found("ocr.html"),
    }
}

fn not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(format!("<h3>Cannot find static/{}</h3>", name)),
    )
        .into_response()
}

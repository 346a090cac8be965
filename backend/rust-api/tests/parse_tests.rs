mod common;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use mathocr_api::{
    config::Config,
    metrics::REMOTE_CALLS_TOTAL,
    models::{ParseRequest, ParseSource},
    services::{deepseek_client::DeepSeekClient, parse_service::ParseService},
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn remote_config(base_url: &str) -> Config {
    Config {
        deepseek_api_key: Some("test-key".to_string()),
        deepseek_endpoint: Some(format!("{}/parse", base_url)),
        ..common::test_config()
    }
}

async fn echo_remote(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    Json(json!({
        "parsed": {
            "received": body,
            "authorization": authorization,
        },
        "model": "fake",
    }))
}

#[tokio::test]
async fn test_parse_without_remote_uses_fallback() {
    let app = common::create_test_app(common::test_config());

    let cases = [
        (
            "已知 f(x)=x^2-3x+2, 求单调区间",
            json!(["function-monotonicity", "quadratic-function"]),
        ),
        (
            "求导 y = x ln x",
            json!(["derivative-rules", "derivative-extrema-discussion"]),
        ),
        ("x ≥ 5", json!(["inequality-basic"])),
        ("hello", json!(["basic-reading-comprehension"])),
        ("", json!([])),
    ];

    for (text, expected_tags) in cases {
        let (status, json) = common::post_json(&app, "/parse", &json!({ "text": text })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["used"], "fallback", "text: {text}");
        assert_eq!(json["parsed"]["knowledge_tags"], expected_tags, "text: {text}");
        assert!(json["parsed"]["diagram_desc"].is_null());
        assert!(json.get("deepseek_status").is_none());
        assert!(json.get("error").is_none());
    }
}

#[tokio::test]
async fn test_parse_fallback_shape() {
    let app = common::create_test_app(common::test_config());

    let (_, json) = common::post_json(&app, "/parse", &json!({ "text": "  f(x) = 2x + 1  " })).await;

    assert_eq!(json["parsed"]["question"], "f(x) = 2x + 1");
    assert_eq!(json["parsed"]["equations"], json!(["f(x) = 2x + 1"]));
    assert_eq!(json["parsed"]["summary"], "Fallback parse: found 2 tags.");
}

#[tokio::test]
async fn test_parse_empty_request_has_no_tags() {
    let app = common::create_test_app(common::test_config());

    let (status, json) = common::post_json(&app, "/parse", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["used"], "fallback");
    assert_eq!(json["parsed"]["question"], "");
    assert_eq!(json["parsed"]["knowledge_tags"], json!([]));
    assert_eq!(json["parsed"]["equations"], json!([]));
    assert!(json["parsed"]["diagram_desc"].is_null());
}

#[tokio::test]
async fn test_parse_image_only_uses_placeholder() {
    let app = common::create_test_app(common::test_config());

    let (_, json) =
        common::post_json(&app, "/parse", &json!({ "image_base64": "iVBORw0KGgo=" })).await;

    assert_eq!(json["parsed"]["question"], "(question derived from image)");
    assert_eq!(json["parsed"]["knowledge_tags"], json!([]));
}

#[tokio::test]
async fn test_parse_tolerates_malformed_body() {
    let app = common::create_test_app(common::test_config());

    for body in ["{not json", "", "[1, 2, 3]", "null"] {
        let response = common::post_raw(&app, "/parse", body).await;
        assert_eq!(response.status(), StatusCode::OK, "body: {body}");

        let json = common::read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["used"], "fallback");
        assert_eq!(json["parsed"]["question"], "");
    }
}

#[tokio::test]
async fn test_parse_remote_success_unwraps_parsed() {
    let base_url = common::spawn_fake_remote(Router::new().route("/parse", post(echo_remote))).await;
    let app = common::create_test_app(remote_config(&base_url));

    let (status, json) =
        common::post_json(&app, "/parse", &json!({ "text": "x ≥ 5" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["used"], "deepseek");
    assert_eq!(json["parsed"]["authorization"], "Bearer test-key");
    assert_eq!(json["parsed"]["received"], json!({ "text": "x ≥ 5" }));
    assert!(json["parsed"].get("model").is_none());
}

#[tokio::test]
async fn test_parse_remote_body_without_parsed_is_passed_through() {
    let remote = Router::new().route(
        "/parse",
        post(|| async { Json(json!({ "question": "remote q", "knowledge_tags": ["t"] })) }),
    );
    let base_url = common::spawn_fake_remote(remote).await;
    let app = common::create_test_app(remote_config(&base_url));

    let (_, json) = common::post_json(&app, "/parse", &json!({ "text": "hello" })).await;

    assert_eq!(json["used"], "deepseek");
    assert_eq!(
        json["parsed"],
        json!({ "question": "remote q", "knowledge_tags": ["t"] })
    );
}

#[tokio::test]
async fn test_parse_remote_error_status_falls_back() {
    let remote = Router::new().route(
        "/parse",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let base_url = common::spawn_fake_remote(remote).await;
    let app = common::create_test_app(remote_config(&base_url));
    let failed_calls = || {
        REMOTE_CALLS_TOTAL
            .with_label_values(&["parse", "error"])
            .get()
    };
    let before = failed_calls();

    let (status, json) = common::post_json(&app, "/parse", &json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(failed_calls() > before);
    assert_eq!(json["success"], true);
    assert_eq!(json["used"], "fallback_due_to_deepseek_error");
    assert_eq!(json["deepseek_status"], 502);
    assert_eq!(
        json["parsed"]["knowledge_tags"],
        json!(["basic-reading-comprehension"])
    );
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_parse_remote_invalid_json_falls_back_with_error() {
    let remote = Router::new().route("/parse", post(|| async { "definitely not json" }));
    let base_url = common::spawn_fake_remote(remote).await;
    let app = common::create_test_app(remote_config(&base_url));

    let (status, json) = common::post_json(&app, "/parse", &json!({ "text": "x < 3" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["used"], "fallback_due_to_exception");
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert_eq!(json["parsed"]["knowledge_tags"], json!(["inequality-basic"]));
}

#[tokio::test]
async fn test_parse_unreachable_remote_falls_back_with_error() {
    let config = Config {
        deepseek_api_key: Some("test-key".to_string()),
        deepseek_endpoint: Some(common::closed_port_url().await),
        ..common::test_config()
    };
    let app = common::create_test_app(config);

    let (status, json) =
        common::post_json(&app, "/parse", &json!({ "image_base64": "abc" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["used"], "fallback_due_to_exception");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("request to parsing service failed"));
    assert_eq!(json["parsed"]["question"], "(question derived from image)");
}

#[tokio::test]
async fn test_parse_remote_null_body_falls_back_with_error() {
    let remote = Router::new().route("/parse", post(|| async { Json(Value::Null) }));
    let base_url = common::spawn_fake_remote(remote).await;
    let app = common::create_test_app(remote_config(&base_url));

    let (status, json) = common::post_json(&app, "/parse", &json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["used"], "fallback_due_to_exception");
    assert!(json["error"].as_str().unwrap().contains("null body"));
    assert_eq!(
        json["parsed"]["knowledge_tags"],
        json!(["basic-reading-comprehension"])
    );
}

#[tokio::test]
async fn test_parse_remote_timeout_falls_back_with_error() {
    let remote = Router::new().route(
        "/parse",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "parsed": { "question": "too late" } }))
        }),
    );
    let base_url = common::spawn_fake_remote(remote).await;
    let client = DeepSeekClient::new(
        reqwest::Client::new(),
        format!("{}/parse", base_url),
        "test-key",
    )
    .with_timeout(Duration::from_millis(200));
    let service = ParseService::with_remote(client);

    let response = service
        .handle_parse(ParseRequest {
            text: Some("x ≥ 5".to_string()),
            image_base64: None,
        })
        .await;

    assert!(response.success);
    assert_eq!(response.used, ParseSource::FallbackDueToException);
    assert!(response
        .error
        .as_deref()
        .unwrap()
        .contains("request to parsing service failed"));
    assert!(response.deepseek_status.is_none());
}

#[tokio::test]
async fn test_parse_remote_truncated_error_body_falls_back_with_error() {
    // Promises more body than it sends, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 100\r\n\r\nshort")
                .await;
            let _ = socket.shutdown().await;
        }
    });
    let app = common::create_test_app(remote_config(&format!("http://{}", addr)));

    let (status, json) = common::post_json(&app, "/parse", &json!({ "text": "hello" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["used"], "fallback_due_to_exception");
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(json.get("deepseek_status").is_none());
}

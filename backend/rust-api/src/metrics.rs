use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Upstream DeepSeek calls
    pub static ref REMOTE_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "remote_calls_total",
        "Total number of calls to the remote model service",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref REMOTE_CALL_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "remote_call_duration_seconds",
        "Remote model service call duration in seconds",
        &["operation"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0, 60.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref PARSE_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "parse_requests_total",
        "Total number of parse requests by result source",
        &["used"]
    )
    .unwrap();

    pub static ref WRONG_ANSWERS_SAVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wrong_answers_saved_total",
        "Total number of save_wrong calls",
        &["status"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a remote model call with metrics
pub async fn track_remote_call<F, T, E>(operation: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    track_remote_call_with(operation, future, Result::is_ok).await
}

/// Like `track_remote_call`, for calls where an `Ok` value can still be a
/// failed call (an error status from the service).
pub async fn track_remote_call_with<F, T, E>(
    operation: &str,
    future: F,
    succeeded: impl Fn(&Result<T, E>) -> bool,
) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if succeeded(&result) { "success" } else { "error" };

    REMOTE_CALLS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    REMOTE_CALL_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

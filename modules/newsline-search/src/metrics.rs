use std::sync::OnceLock;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusHandle;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the process-wide Prometheus recorder. Must be called once at
/// startup before any `metrics::counter!`/`histogram!` call.
pub fn install() -> PrometheusHandle {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");
    let _ = HANDLE.set(handle.clone());
    handle
}

/// Render the current metrics snapshot as Prometheus text exposition
/// format, served from `GET /metrics`.
pub fn render() -> String {
    HANDLE.get().map(|h| h.render()).unwrap_or_default()
}

/// Request-counter and latency-histogram middleware, applied to every
/// route (spec §4.4/§6: "request counters (labelled by method, path,
/// status) and latency histograms (labelled by path)"). Uses the route's
/// matched pattern rather than the raw URI so per-id paths like
/// `/click/{user_id}/{doc_id}` don't blow up label cardinality.
pub async fn track_request(matched_path: Option<MatchedPath>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "newsline_http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!("newsline_http_request_duration_seconds", "path" => path).record(elapsed);

    response
}

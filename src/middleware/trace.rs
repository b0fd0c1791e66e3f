//! Per-request span with method, path, status and latency.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, error, info, info_span, warn};

use crate::response::Response;

/// Runs `fut` inside a `request` span and logs its outcome.
///
/// 5xx responses log at `error`, 4xx at `warn`, everything else at `info`.
pub(crate) async fn trace<F>(method: &http::Method, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", method = %method, path = %path);
    let started = Instant::now();

    let res = fut.instrument(span.clone()).await;

    let status = res.status_code().code();
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    span.in_scope(|| match status {
        500.. => error!(status, latency_ms, "request failed"),
        400..=499 => warn!(status, latency_ms, "request rejected"),
        _ => info!(status, latency_ms, "request completed"),
    });
    res
}

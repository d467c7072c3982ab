use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and register the client counters.
/// `PrometheusHandle::render()` produces the text exposition payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("predictions_submitted_total").absolute(0);
    counter!("api_errors_total", "kind" => "network").absolute(0);
    counter!("api_errors_total", "kind" => "api").absolute(0);

    Ok(handle)
}

pub(crate) fn record_request(path: &str) {
    counter!("api_requests_total", "path" => path.to_string()).increment(1);
}

pub(crate) fn record_error(kind: &'static str) {
    counter!("api_errors_total", "kind" => kind).increment(1);
}

pub(crate) fn record_prediction_submitted() {
    counter!("predictions_submitted_total").increment(1);
}

pub(crate) fn record_slice_failure(slice: &'static str) {
    counter!("portfolio_slice_failures_total", "slice" => slice).increment(1);
}

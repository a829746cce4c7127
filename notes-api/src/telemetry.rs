use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{ApiError, ApiResult};

pub struct Telemetry;

impl Telemetry {
    pub fn record_note_created(mode: &'static str) {
        counter!("notes_created_total", "mode" => mode).increment(1);
    }

    /// `outcome` is an `Outcome` label on success or an error kind on failure.
    pub fn record_inference(operation: &'static str, outcome: &'static str) {
        counter!(
            "inference_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
    }

    pub fn record_fail_open() {
        counter!("action_items_fail_open_total").increment(1);
    }
}

/// Installs the global Prometheus recorder and returns its render handle.
pub fn install_recorder() -> ApiResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Configuration(format!("Failed to install metrics recorder: {e}")))
}

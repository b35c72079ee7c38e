//! Metrics collection for preference-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static OVERRIDE_READS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static OVERRIDE_WRITES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let reads_counter = IntCounterVec::new(
        Opts::new(
            "override_reads_total",
            "Total notification override reads by context type",
        ),
        &["context_type"],
    )
    .expect("Failed to create override_reads_total metric");

    let writes_counter = IntCounterVec::new(
        Opts::new(
            "override_writes_total",
            "Total notification override writes by context type and value",
        ),
        &["context_type", "enabled"],
    )
    .expect("Failed to create override_writes_total metric");

    registry
        .register(Box::new(reads_counter.clone()))
        .expect("Failed to register override_reads_total");
    registry
        .register(Box::new(writes_counter.clone()))
        .expect("Failed to register override_writes_total");

    if PROMETHEUS_REGISTRY.set(registry).is_err() {
        panic!("failed to set prometheus registry: already initialized");
    }
    if OVERRIDE_READS_TOTAL.set(reads_counter).is_err() {
        panic!("failed to set override_reads_total: already initialized");
    }
    if OVERRIDE_WRITES_TOTAL.set(writes_counter).is_err() {
        panic!("failed to set override_writes_total: already initialized");
    }
}

/// Record a served read of a (user, context) override value.
pub fn record_override_read(context_type: &str) {
    if let Some(counter) = OVERRIDE_READS_TOTAL.get() {
        counter.with_label_values(&[context_type]).inc();
    }
}

/// Record a persisted override write.
pub fn record_override_write(context_type: &str, enabled: bool) {
    if let Some(counter) = OVERRIDE_WRITES_TOTAL.get() {
        counter
            .with_label_values(&[context_type, if enabled { "true" } else { "false" }])
            .inc();
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

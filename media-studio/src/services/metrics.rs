use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub fn init_metrics() {
    let registry = Registry::new();

    let generations_total = IntCounterVec::new(
        Opts::new(
            "generations_total",
            "Total generation requests by kind and outcome",
        ),
        &["kind", "outcome"],
    )
    .expect("metric can be created");

    registry
        .register(Box::new(generations_total.clone()))
        .expect("collector can be registered");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = GENERATIONS_TOTAL.set(generations_total);
}

pub fn record_generation(kind: &str, success: bool) {
    if let Some(counter) = GENERATIONS_TOTAL.get() {
        let outcome = if success { "ok" } else { "error" };
        counter.with_label_values(&[kind, outcome]).inc();
    }
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let registry = REGISTRY.get().expect("metrics registry not initialized");
    let metric_families = registry.gather();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

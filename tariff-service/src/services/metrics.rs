//! Metrics module for tariff-service.
//! Provides Prometheus metrics for fee calculations and catalog operations.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_counter_vec, register_histogram_vec, register_int_counter_vec,
    CounterVec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Catalog operation duration histogram
pub static CATALOG_OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "tariff_catalog_operation_duration_seconds",
            "Catalog operation duration",
            vec![0.00001, 0.0001, 0.001, 0.01, 0.1]
        ),
        &["operation"]
    )
    .expect("Failed to register CATALOG_OPERATION_DURATION")
});

/// Fee calculations counter
pub static FEE_CALCULATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Catalog operations counter
pub static CATALOG_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Quoted fee amount by currency
pub static FEE_AMOUNT_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    FEE_CALCULATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "tariff_fee_calculations_total",
                "Total fee calculations by tariff type and applied clamp"
            ),
            &["tariff_type", "clamp"]
        )
        .expect("Failed to register FEE_CALCULATIONS_TOTAL")
    });

    CATALOG_OPERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "tariff_catalog_operations_total",
                "Total catalog operations by operation type"
            ),
            &["operation"]
        )
        .expect("Failed to register CATALOG_OPERATIONS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("tariff_errors_total", "Total errors by type for alerting"),
            &["error_type", "operation"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    FEE_AMOUNT_TOTAL.get_or_init(|| {
        register_counter_vec!(
            opts!("tariff_fee_amount_total", "Total quoted fee amount by currency"),
            &["currency"]
        )
        .expect("Failed to register FEE_AMOUNT_TOTAL")
    });

    let _ = &*CATALOG_OPERATION_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a fee calculation.
pub fn record_fee_calculation(tariff_type: &str, clamp: &str) {
    if let Some(counter) = FEE_CALCULATIONS_TOTAL.get() {
        counter.with_label_values(&[tariff_type, clamp]).inc();
    }
}

/// Record a catalog operation.
pub fn record_catalog_operation(operation: &str) {
    if let Some(counter) = CATALOG_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation]).inc();
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, operation: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, operation]).inc();
    }
}

/// Record a quoted fee amount.
pub fn record_fee_amount(currency: &str, amount: f64) {
    if let Some(counter) = FEE_AMOUNT_TOTAL.get() {
        counter.with_label_values(&[currency]).inc_by(amount.abs());
    }
}

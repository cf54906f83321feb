//! Prometheus metrics for the property registry.
//!
//! All metrics follow the naming convention: `pr_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., properties_registered_total)
//! - **Gauge**: Value that can go up or down (e.g., relevant_properties)
//! - **Histogram**: Distribution of values (e.g., operation_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Successful registrations (including idempotent re-registrations)
    pub static ref PROPERTIES_REGISTERED: Counter = Counter::new(
        "pr_lifecycle_properties_registered_total",
        "Total number of successful register calls"
    ).expect("metric creation failed");

    /// Successful removals, split by whether the property was migrated
    pub static ref PROPERTIES_REMOVED: CounterVec = CounterVec::new(
        Opts::new("pr_lifecycle_properties_removed_total", "Total number of successful remove calls"),
        &["migrated"]  // "true" | "false"
    ).expect("metric creation failed");

    /// Current size of the relevant set
    pub static ref RELEVANT_PROPERTIES: Gauge = Gauge::new(
        "pr_lifecycle_relevant_properties",
        "Number of properties currently relevant"
    ).expect("metric creation failed");

    /// Current size of the obsolete set
    pub static ref OBSOLETE_PROPERTIES: Gauge = Gauge::new(
        "pr_lifecycle_obsolete_properties",
        "Number of properties retired via migration"
    ).expect("metric creation failed");

    // =========================================================================
    // ACCESS CONTROL METRICS
    // =========================================================================

    /// Controller reassignments
    pub static ref CONTROLLER_CHANGES: Counter = Counter::new(
        "pr_roles_controller_changes_total",
        "Total number of successful controller reassignments"
    ).expect("metric creation failed");

    /// Rejected callers by operation
    pub static ref UNAUTHORIZED_ATTEMPTS: CounterVec = CounterVec::new(
        Opts::new("pr_access_unauthorized_attempts_total", "Rejected callers by operation"),
        &["operation"]  // set_controller | register | remove
    ).expect("metric creation failed");

    /// Zero-address inputs by operation
    pub static ref INVALID_INPUTS: CounterVec = CounterVec::new(
        Opts::new("pr_access_invalid_inputs_total", "Zero-address arguments by operation"),
        &["operation"]
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT LOG METRICS
    // =========================================================================

    /// Events forwarded to the event log by kind
    pub static ref EVENTS_EMITTED: CounterVec = CounterVec::new(
        Opts::new("pr_events_emitted_total", "Events forwarded to the event log"),
        &["event"]
    ).expect("metric creation failed");

    // =========================================================================
    // LATENCY METRICS
    // =========================================================================

    /// Mutation latency including event forwarding
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "pr_operation_duration_seconds",
            "Time spent in registry mutations"
        ).buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["operation"]
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Number of metric families currently gathered.
    pub fn families(&self) -> usize {
        self.registry.gather().len()
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Lifecycle
        Box::new(PROPERTIES_REGISTERED.clone()),
        Box::new(PROPERTIES_REMOVED.clone()),
        Box::new(RELEVANT_PROPERTIES.clone()),
        Box::new(OBSOLETE_PROPERTIES.clone()),
        // Access control
        Box::new(CONTROLLER_CHANGES.clone()),
        Box::new(UNAUTHORIZED_ATTEMPTS.clone()),
        Box::new(INVALID_INPUTS.clone()),
        // Event log
        Box::new(EVENTS_EMITTED.clone()),
        // Latency
        Box::new(OPERATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing a labelled operation. Observation happens on drop.
#[macro_export]
macro_rules! time_operation {
    ($operation:expr) => {
        $crate::metrics::HistogramTimer::new(
            &$crate::metrics::OPERATION_DURATION.with_label_values(&[$operation]),
        )
    };
}

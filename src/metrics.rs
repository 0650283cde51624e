//! Prometheus metrics describing how polling is going.

use std::sync::atomic::AtomicU64;

use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue},
    metrics::{counter::Counter, family::Family, gauge::Gauge},
    registry::{Registry, Unit},
};

use crate::status::PrinterStatus;

/// Which of the two status queries a sample belongs to.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Query {
    /// Current job query.
    Job,
    /// Printer temperature and state query.
    Printer,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct QueryLabels {
    query: Query,
}

/// Counters and gauges updated by [crate::Monitor].
///
/// Cloning is cheap and clones share their values, so a copy can be
/// registered with a [Registry] while another is handed to the monitor.
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    updates: Counter,
    fetch_failures: Family<QueryLabels, Counter>,
    malformed_responses: Family<QueryLabels, Counter>,
    tool0: Gauge<f64, AtomicU64>,
    tool0_target: Gauge<f64, AtomicU64>,
    bed: Gauge<f64, AtomicU64>,
    bed_target: Gauge<f64, AtomicU64>,
}

impl Metrics {
    /// Create a set of metrics registered under `printer_monitor` in `registry`.
    pub fn register(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        let registry = registry.sub_registry_with_prefix("printer_monitor");

        registry.register("updates", "Completed update cycles", metrics.updates.clone());
        registry.register(
            "fetch_failures",
            "Status queries that did not return 200 OK",
            metrics.fetch_failures.clone(),
        );
        registry.register(
            "malformed_responses",
            "Status bodies that were not valid JSON",
            metrics.malformed_responses.clone(),
        );
        registry.register_with_unit("tool0", "Extruder temperature", Unit::Celsius, metrics.tool0.clone());
        registry.register_with_unit(
            "tool0_target",
            "Extruder target temperature",
            Unit::Celsius,
            metrics.tool0_target.clone(),
        );
        registry.register_with_unit("bed", "Bed temperature", Unit::Celsius, metrics.bed.clone());
        registry.register_with_unit(
            "bed_target",
            "Bed target temperature",
            Unit::Celsius,
            metrics.bed_target.clone(),
        );

        metrics
    }

    pub(crate) fn record_update(&self) {
        self.updates.inc();
    }

    pub(crate) fn record_fetch_failure(&self, query: Query) {
        self.fetch_failures.get_or_create(&QueryLabels { query }).inc();
    }

    pub(crate) fn record_malformed(&self, query: Query) {
        self.malformed_responses.get_or_create(&QueryLabels { query }).inc();
    }

    pub(crate) fn record_temperatures(&self, printer: &PrinterStatus) {
        self.tool0.set(printer.tool0_temp);
        self.tool0_target.set(printer.tool0_target);
        self.bed.set(printer.bed_temp);
        self.bed_target.set(printer.bed_target);
    }

    /// Zero the temperature gauges while the printer is unreachable.
    pub(crate) fn clear_temperatures(&self) {
        self.record_temperatures(&PrinterStatus::default());
    }

    /// Number of completed update cycles.
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }

    /// Number of failed fetches for `query`.
    pub fn fetch_failures(&self, query: Query) -> u64 {
        self.fetch_failures.get_or_create(&QueryLabels { query }).get()
    }

    /// Number of bodies for `query` that were not valid JSON.
    pub fn malformed_responses(&self, query: Query) -> u64 {
        self.malformed_responses.get_or_create(&QueryLabels { query }).get()
    }
}

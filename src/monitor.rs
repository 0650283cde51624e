//! Polls a printer server and keeps the latest normalized status.

use serde_json::Value;

use crate::{
    metrics::{Metrics, Query},
    transport::{HttpTransport, Transport, TransportError},
    value, JobStatus, PrinterEndpoint, PrinterStatus, Status,
};

/// Owner of the status record for one printer server.
///
/// Each call to [Monitor::update] performs two sequential GETs, one for the
/// job and one for the printer, and overwrites the matching half of the
/// record. A failed GET only clears that half's `valid` flag. Nothing is
/// retried; calling `update` again on the next polling cycle is the
/// recovery path.
pub struct Monitor<T = HttpTransport> {
    endpoint: PrinterEndpoint,
    transport: T,
    status: Status,
    metrics: Metrics,
}

impl Monitor<HttpTransport> {
    /// Create a monitor talking HTTP to `endpoint`.
    pub fn new(endpoint: PrinterEndpoint) -> Result<Self, TransportError> {
        Ok(Self::with_transport(endpoint, HttpTransport::new()?))
    }
}

impl<T: Transport> Monitor<T> {
    /// Create a monitor using a specific [Transport].
    pub fn with_transport(endpoint: PrinterEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
            status: Status::default(),
            metrics: Metrics::default(),
        }
    }

    /// Record into `metrics` instead of a private, unregistered set.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The endpoint currently polled.
    pub fn endpoint(&self) -> &PrinterEndpoint {
        &self.endpoint
    }

    /// Point the monitor at a different server. The previous status belongs
    /// to the old server, so it is discarded.
    pub fn set_endpoint(&mut self, endpoint: PrinterEndpoint) {
        tracing::info!(host = %endpoint.host, port = endpoint.port, dialect = %endpoint.dialect, "endpoint replaced");
        self.endpoint = endpoint;
        self.status = Status::default();
    }

    /// Metrics this monitor records into.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The status as of the last update.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// An owned copy of the status, safe to hand to other tasks.
    pub fn snapshot(&self) -> Status {
        self.status.clone()
    }

    /// Refresh the job status, then the printer status.
    pub async fn update(&mut self) {
        self.update_job_status().await;
        self.update_printer_status().await;
        self.metrics.record_update();
    }

    /// Refresh only the job status.
    pub async fn update_job_status(&mut self) {
        match self.fetch_document(Query::Job).await {
            Fetched::Document(doc) => {
                self.status.job = JobStatus {
                    valid: true,
                    ..self.endpoint.dialect.parse_job(&doc)
                };
            }
            Fetched::Malformed => {
                self.status.job = JobStatus {
                    valid: true,
                    ..Default::default()
                };
            }
            Fetched::Failed => self.status.job.valid = false,
        }
    }

    /// Refresh only the printer status.
    pub async fn update_printer_status(&mut self) {
        match self.fetch_document(Query::Printer).await {
            Fetched::Document(doc) => {
                self.status.printer = PrinterStatus {
                    valid: true,
                    ..self.endpoint.dialect.parse_printer(&doc)
                };
                self.metrics.record_temperatures(&self.status.printer);
            }
            Fetched::Malformed => {
                self.status.printer = PrinterStatus {
                    valid: true,
                    ..Default::default()
                };
                self.metrics.record_temperatures(&self.status.printer);
            }
            Fetched::Failed => {
                self.status.printer.valid = false;
                self.metrics.clear_temperatures();
            }
        }
    }

    /// GET the document for `query`.
    async fn fetch_document(&self, query: Query) -> Fetched {
        let path = match query {
            Query::Job => self.endpoint.dialect.job_path(),
            Query::Printer => self.endpoint.dialect.printer_path(),
        };

        let response = match self.transport.fetch(&self.endpoint, path).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, query = ?query, "failed to fetch status");
                self.metrics.record_fetch_failure(query);
                return Fetched::Failed;
            }
        };

        if !response.is_ok() {
            tracing::warn!(status = response.status, query = ?query, "unexpected status code");
            self.metrics.record_fetch_failure(query);
            return Fetched::Failed;
        }

        match value::parse_body(&response.body) {
            Ok(doc) => Fetched::Document(doc),
            Err(err) => {
                tracing::warn!(error = %err, query = ?query, "malformed status body");
                self.metrics.record_malformed(query);
                Fetched::Malformed
            }
        }
    }
}

/// Outcome of a single status query.
enum Fetched {
    /// `200 OK` with a JSON body.
    Document(Value),
    /// `200 OK`, but the body is not JSON. Every field reads as its default.
    Malformed,
    /// Transport error or any status other than `200 OK`.
    Failed,
}

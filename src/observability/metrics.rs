//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upload_requests_total` (counter): requests by outcome
//! - `upload_files_total` (counter): files stored
//! - `upload_bytes_total` (counter): bytes stored
//! - `upload_request_duration_seconds` (histogram): latency by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("upload_requests_total", "Upload requests by outcome");
    describe_counter!("upload_files_total", "Files stored");
    describe_counter!("upload_bytes_total", Unit::Bytes, "Bytes stored");
    describe_histogram!(
        "upload_request_duration_seconds",
        Unit::Seconds,
        "Upload request latency"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished upload request.
pub fn record_upload(outcome: &'static str, files: usize, bytes: u64, started: Instant) {
    counter!("upload_requests_total", "outcome" => outcome).increment(1);
    counter!("upload_files_total").increment(files as u64);
    counter!("upload_bytes_total").increment(bytes);
    histogram!("upload_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

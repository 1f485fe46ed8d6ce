//! Prometheus-compatible metrics for the skill server.
//!
//! Tracks traffic, processing time, and rejected envelopes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Shared counters; clones observe the same values.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    requests_received_total: AtomicU64,
    responses_sent_total: AtomicU64,
    processing_time_microseconds_total: AtomicU64,
    /// Bodies or query strings that failed to decode.
    malformed_requests_total: AtomicU64,
    signature_failures_total: AtomicU64,
    decrypt_failures_total: AtomicU64,
    /// Handler panics turned into 500 responses.
    panics_total: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_received_total: AtomicU64::new(0),
                responses_sent_total: AtomicU64::new(0),
                processing_time_microseconds_total: AtomicU64::new(0),
                malformed_requests_total: AtomicU64::new(0),
                signature_failures_total: AtomicU64::new(0),
                decrypt_failures_total: AtomicU64::new(0),
                panics_total: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn inc_requests_received(&self) {
        self.inner
            .requests_received_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Count a finished response and the time spent producing it.
    pub fn record_response(&self, elapsed: Duration) {
        self.inner
            .responses_sent_total
            .fetch_add(1, Ordering::Relaxed);
        self.inner
            .processing_time_microseconds_total
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn inc_malformed_requests(&self) {
        self.inner
            .malformed_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_signature_failures(&self) {
        self.inner
            .signature_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_decrypt_failures(&self) {
        self.inner
            .decrypt_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_panics(&self) {
        self.inner.panics_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_received(&self) -> u64 {
        self.inner.requests_received_total.load(Ordering::Relaxed)
    }

    pub fn signature_failures(&self) -> u64 {
        self.inner.signature_failures_total.load(Ordering::Relaxed)
    }

    pub fn decrypt_failures(&self) -> u64 {
        self.inner.decrypt_failures_total.load(Ordering::Relaxed)
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let m = &self.inner;
        let uptime = m.started_at.elapsed().as_secs();

        format!(
            r#"# HELP wxa_uptime_seconds Time since the server started.
# TYPE wxa_uptime_seconds gauge
wxa_uptime_seconds {}

# HELP wxa_requests_received_total The total number of received requests.
# TYPE wxa_requests_received_total counter
wxa_requests_received_total {}

# HELP wxa_responses_sent_total The total number of sent responses.
# TYPE wxa_responses_sent_total counter
wxa_responses_sent_total {}

# HELP wxa_processing_time_microseconds_total The total processing time in microseconds.
# TYPE wxa_processing_time_microseconds_total counter
wxa_processing_time_microseconds_total {}

# HELP wxa_malformed_requests_total Requests rejected before signature verification.
# TYPE wxa_malformed_requests_total counter
wxa_malformed_requests_total {}

# HELP wxa_signature_failures_total Requests with an invalid signature.
# TYPE wxa_signature_failures_total counter
wxa_signature_failures_total {}

# HELP wxa_decrypt_failures_total Envelopes that failed to decrypt.
# TYPE wxa_decrypt_failures_total counter
wxa_decrypt_failures_total {}

# HELP wxa_panics_total Handler panics recovered as 500 responses.
# TYPE wxa_panics_total counter
wxa_panics_total {}
"#,
            uptime,
            m.requests_received_total.load(Ordering::Relaxed),
            m.responses_sent_total.load(Ordering::Relaxed),
            m.processing_time_microseconds_total.load(Ordering::Relaxed),
            m.malformed_requests_total.load(Ordering::Relaxed),
            m.signature_failures_total.load(Ordering::Relaxed),
            m.decrypt_failures_total.load(Ordering::Relaxed),
            m.panics_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counter_increments() {
        let m = Metrics::new();
        m.inc_requests_received();
        m.inc_requests_received();
        m.inc_signature_failures();
        let output = m.render_prometheus();
        assert!(output.contains("wxa_requests_received_total 2"));
        assert!(output.contains("wxa_signature_failures_total 1"));
        assert!(output.contains("wxa_decrypt_failures_total 0"));
    }

    #[test]
    fn test_metrics_processing_time() {
        let m = Metrics::new();
        m.record_response(Duration::from_micros(150));
        m.record_response(Duration::from_micros(50));
        let output = m.render_prometheus();
        assert!(output.contains("wxa_responses_sent_total 2"));
        assert!(output.contains("wxa_processing_time_microseconds_total 200"));
    }

    #[test]
    fn test_metrics_clones_share_counters() {
        let m = Metrics::new();
        let c = m.clone();
        c.inc_decrypt_failures();
        assert_eq!(m.decrypt_failures(), 1);
    }

    #[test]
    fn test_metrics_prometheus_format() {
        let m = Metrics::new();
        let output = m.render_prometheus();
        assert!(output.contains("# HELP wxa_uptime_seconds"));
        assert!(output.contains("# TYPE wxa_uptime_seconds gauge"));
        assert!(output.contains("# TYPE wxa_requests_received_total counter"));
    }
}

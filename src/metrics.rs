//! Prometheus metrics and tracing spans.
//!
//! Metrics are registered in a dedicated registry on first use and rendered
//! in the Prometheus text format by `GET /metrics`.

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<UserpatchMetrics> = Lazy::new(UserpatchMetrics::init);

#[cfg(feature = "metrics")]
pub struct UserpatchMetrics {
    pub registry: Registry,
    pub requests_total: IntCounterVec,
    pub query_duration: Histogram,
    pub query_errors_total: IntCounter,
}

#[cfg(feature = "metrics")]
impl UserpatchMetrics {
    pub fn init() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("userpatch_requests_total", "Handled requests by operation and outcome"),
            &["operation", "outcome"],
        )
        .expect("valid requests_total definition");
        let query_duration = Histogram::with_opts(HistogramOpts::new(
            "userpatch_query_duration_seconds",
            "Duration of database queries",
        ))
        .expect("valid query_duration definition");
        let query_errors_total =
            IntCounter::new("userpatch_query_errors_total", "Failed database queries")
                .expect("valid query_errors_total definition");

        for collector in [
            Box::new(requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(query_duration.clone()),
            Box::new(query_errors_total.clone()),
        ] {
            registry
                .register(collector)
                .expect("metric names are unique");
        }

        Self {
            registry,
            requests_total,
            query_duration,
            query_errors_total,
        }
    }

    pub fn record_request(&self, operation: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn record_query_duration(&self, elapsed: std::time::Duration) {
        self.query_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_query_error(&self) {
        self.query_errors_total.inc();
    }

    /// Current values in the Prometheus text exposition format
    ///
    /// # Errors
    ///
    /// Returns the encoder error.
    pub fn render(&self) -> Result<Vec<u8>, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

/// Spans wrapped around storage calls
#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    pub fn execute_query_span(query: &str) -> Span {
        tracing::debug_span!("userpatch.query", db.statement = %query)
    }

    pub fn acquire_connection_span() -> Span {
        tracing::debug_span!("userpatch.connect")
    }

    pub fn request_span(method: &str, path: &str) -> Span {
        tracing::info_span!("userpatch.request", http.method = %method, http.path = %path)
    }
}

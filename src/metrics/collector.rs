// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Inbound
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,

    // Onionoo
    pub upstream_requests_total: IntCounterVec,
    pub upstream_duration_seconds: Histogram,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("tor_status_requests_total", "Total number of inbound requests"),
            &["route", "status_code"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "tor_status_request_duration_seconds",
                "Inbound request duration in seconds",
            ),
            &["route"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let upstream_requests_total = IntCounterVec::new(
            Opts::new(
                "tor_status_upstream_requests_total",
                "Onionoo requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(upstream_requests_total.clone()))?;

        let upstream_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "tor_status_upstream_duration_seconds",
                "Onionoo request duration in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]),
        )?;
        registry.register(Box::new(upstream_duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            upstream_requests_total,
            upstream_duration_seconds,
        })
    }

    pub fn record_request(&self, route: &str, status_code: u16, duration: Duration) {
        let status = status_code.to_string();
        self.requests_total
            .with_label_values(&[route, &status])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[route])
            .observe(duration.as_secs_f64());
    }

    pub fn record_upstream(&self, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "failure" };
        self.upstream_requests_total
            .with_label_values(&[outcome])
            .inc();

        self.upstream_duration_seconds
            .observe(duration.as_secs_f64());
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathered_text_contains_recorded_series() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();

        metrics.record_request("/tor_network_status", 503, Duration::from_millis(12));
        metrics.record_upstream(false, Duration::from_millis(10));

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains(
            r#"tor_status_requests_total{route="/tor_network_status",status_code="503"} 1"#
        ));
        assert!(text.contains(r#"tor_status_upstream_requests_total{outcome="failure"} 1"#));
    }
}

use std::sync::Arc;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, proto::MetricFamily};
use skiff_core::{CallOutcome, MetricsBackend};

const NAMESPACE: &str = "skiff";

/// Prometheus metrics for client construction and backend calls.
///
/// Label values are bounded: `backend` is a backend tag, `op` a fixed operation
/// name and `outcome` one of the [`CallOutcome`] or negotiation labels.
#[derive(Clone)]
pub struct PrometheusMetrics {
    negotiations: CounterVec,
    calls: CounterVec,
    call_duration: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let negotiations = CounterVec::new(
            Opts::new("negotiations_total", "Client constructions by negotiation outcome")
                .namespace(NAMESPACE),
            &["backend", "outcome"],
        )?;
        registry.register(Box::new(negotiations.clone()))?;

        let calls = CounterVec::new(
            Opts::new("backend_calls_total", "Backend calls by operation and outcome")
                .namespace(NAMESPACE),
            &["backend", "op", "outcome"],
        )?;
        registry.register(Box::new(calls.clone()))?;

        let call_duration = HistogramVec::new(
            HistogramOpts::new("backend_call_duration_seconds", "Backend call wall time")
                .namespace(NAMESPACE)
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["backend", "op"],
        )?;
        registry.register(Box::new(call_duration.clone()))?;

        Ok(Self {
            negotiations,
            calls,
            call_duration,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_negotiation(&self, backend: &str, outcome: &str) {
        self.negotiations
            .with_label_values(&[backend, outcome])
            .inc();
    }

    fn record_call(&self, backend: &str, op: &str, outcome: CallOutcome, duration_ms: u64) {
        self.calls
            .with_label_values(&[backend, op, outcome.as_label()])
            .inc();
        self.call_duration
            .with_label_values(&[backend, op])
            .observe(duration_ms as f64 / 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use prometheus::{Encoder, TextEncoder};

    use super::*;

    fn encode(families: &[MetricFamily]) -> String {
        let mut buf = Vec::new();
        TextEncoder::new().encode(families, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("{name} not exported"))
    }

    #[test]
    fn negotiations_are_counted_per_outcome() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_negotiation("DOCKER", "determined");
        metrics.record_negotiation("DOCKER", "determined");
        metrics.record_negotiation("KUBERNETES", "failed");

        let families = metrics.gather();
        assert_eq!(family(&families, "skiff_negotiations_total").get_metric().len(), 2);

        let text = encode(&families);
        assert!(
            text.contains(r#"skiff_negotiations_total{backend="DOCKER",outcome="determined"} 2"#),
            "{text}"
        );
    }

    #[test]
    fn calls_feed_counter_and_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_call("KUBERNETES", "create_pod", CallOutcome::Success, 120);
        metrics.record_call("KUBERNETES", "create_pod", CallOutcome::Rejected, 30);

        let families = metrics.gather();
        assert_eq!(family(&families, "skiff_backend_calls_total").get_metric().len(), 2);

        let hist = family(&families, "skiff_backend_call_duration_seconds");
        assert_eq!(hist.get_metric().len(), 1);

        let text = encode(&families);
        assert!(
            text.contains(
                r#"skiff_backend_call_duration_seconds_count{backend="KUBERNETES",op="create_pod"} 2"#
            ),
            "{text}"
        );
    }

    #[test]
    fn shares_a_custom_registry() {
        let registry = Arc::new(Registry::new());
        let metrics = PrometheusMetrics::new_with_registry(Arc::clone(&registry)).unwrap();
        metrics.record_negotiation("DOCKER", "default");
        assert!(!registry.gather().is_empty());

        // same names cannot be registered twice in one registry
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}

//! Prometheus metrics for the inference service

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, HistogramTimer, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Request latency buckets (seconds)
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0];

/// Confidence buckets
const CONFIDENCE_BUCKETS: &[f64] = &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Outcome label on the request counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }
}

/// Service metrics, registered on a registry owned by this struct
pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: Histogram,
    confidence: Histogram,
    model_version: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("inference_requests_total", "Total inference requests"),
            &["status", "endpoint"],
        )?;
        let latency = Histogram::with_opts(
            HistogramOpts::new("inference_request_duration_seconds", "Inference request latency")
                .buckets(LATENCY_BUCKETS.to_vec()),
        )?;
        let confidence = Histogram::with_opts(
            HistogramOpts::new("prediction_value_distribution", "Distribution of prediction values")
                .buckets(CONFIDENCE_BUCKETS.to_vec()),
        )?;
        let model_version = Gauge::new("model_version_info", "Model version information")?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency.clone()))?;
        registry.register(Box::new(confidence.clone()))?;
        registry.register(Box::new(model_version.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency,
            confidence,
            model_version,
        })
    }

    /// Count one request on `endpoint`
    pub fn record_request(&self, endpoint: &str, outcome: Outcome) {
        self.requests
            .with_label_values(&[outcome.as_str(), endpoint])
            .inc();
    }

    /// Track one request on `endpoint`.
    ///
    /// Latency and the request count are both recorded when the returned
    /// guard drops. A request dropped before [`RequestTracker::succeed`] is
    /// counted as an error.
    pub fn track_request<'a>(&'a self, endpoint: &'a str) -> RequestTracker<'a> {
        RequestTracker {
            metrics: self,
            endpoint,
            outcome: Outcome::Error,
            _timer: self.latency.start_timer(),
        }
    }

    pub fn observe_confidence(&self, confidence: f64) {
        self.confidence.observe(confidence);
    }

    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_version.set(if loaded { 1.0 } else { 0.0 });
    }

    pub fn request_count(&self, endpoint: &str, outcome: Outcome) -> u64 {
        self.requests
            .with_label_values(&[outcome.as_str(), endpoint])
            .get()
    }

    pub fn latency_sample_count(&self) -> u64 {
        self.latency.get_sample_count()
    }

    pub fn confidence_sample_count(&self) -> u64 {
        self.confidence.get_sample_count()
    }

    pub fn confidence_sample_sum(&self) -> f64 {
        self.confidence.get_sample_sum()
    }

    /// Render every registered metric in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Per-request guard returned by [`Metrics::track_request`]
pub struct RequestTracker<'a> {
    metrics: &'a Metrics,
    endpoint: &'a str,
    outcome: Outcome,
    _timer: HistogramTimer,
}

impl RequestTracker<'_> {
    pub fn succeed(&mut self) {
        self.outcome = Outcome::Success;
    }
}

impl Drop for RequestTracker<'_> {
    fn drop(&mut self) {
        self.metrics.record_request(self.endpoint, self.outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_label() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("predict", Outcome::Success);
        metrics.record_request("predict", Outcome::Success);
        metrics.record_request("predict", Outcome::Error);

        assert_eq!(metrics.request_count("predict", Outcome::Success), 2);
        assert_eq!(metrics.request_count("predict", Outcome::Error), 1);
        assert_eq!(metrics.request_count("ready", Outcome::Error), 0);
    }

    #[test]
    fn test_tracker_counts_once_on_drop() {
        let metrics = Metrics::new().unwrap();
        {
            let mut tracker = metrics.track_request("predict");
            tracker.succeed();
        }
        {
            let _tracker = metrics.track_request("predict");
        }

        assert_eq!(metrics.request_count("predict", Outcome::Success), 1);
        assert_eq!(metrics.request_count("predict", Outcome::Error), 1);
        assert_eq!(metrics.latency_sample_count(), 2);
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("health", Outcome::Success);
        metrics.observe_confidence(0.9);
        metrics.set_model_loaded(true);

        let text = metrics.render().unwrap();
        let line = text
            .lines()
            .find(|l| l.starts_with("inference_requests_total{"))
            .unwrap();
        assert!(line.contains("endpoint=\"health\""));
        assert!(line.contains("status=\"success\""));
        assert!(line.ends_with(" 1"));
        assert!(text.contains("prediction_value_distribution_count 1"));
        assert!(text.contains("model_version_info 1"));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.observe_confidence(0.5);
        assert_eq!(a.confidence_sample_count(), 1);
        assert_eq!(b.confidence_sample_count(), 0);
    }
}

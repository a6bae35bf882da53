use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::resolver::{Mode, Outcome};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Fails if a recorder is already set.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("chat_requests_total", "Chat messages received, by mode.");
        describe_counter!("chat_replies_total", "Replies sent, by how they were produced.");
        describe_histogram!("chat_generation_ms", "Generator call latency in milliseconds.");
    });
}

pub(crate) fn record_request(mode: Mode) {
    counter!("chat_requests_total", "mode" => mode.as_str()).increment(1);
}

pub(crate) fn record_reply(outcome: Outcome) {
    counter!("chat_replies_total", "outcome" => outcome.label()).increment(1);
}

pub(crate) fn record_generation_ms(ms: f64) {
    histogram!("chat_generation_ms").record(ms);
}

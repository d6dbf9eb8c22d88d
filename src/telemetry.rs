//! Pipeline OTLP/HTTP (traces + métricas) para binários que embutem o AMM.
//! Só existe com a feature `otlp`; a biblioteca em si só emite `tracing`.

use anyhow::Result;
use std::time::Duration;

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter, MeterProvider},
    trace::TracerProvider as _,
    KeyValue,
};
use opentelemetry_otlp::{MetricExporter, Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{PeriodicReader, SdkMeterProvider},
    resource::Resource,
    trace::SdkTracerProvider,
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, Registry};

use crate::amm::swap::SwapOutcome;
use crate::obs::filter_from_env;

pub const ENV_COMMIT_SHA: &str = "AMM_COMMIT_SHA";

pub struct Telemetry {
    pub tracer_provider: SdkTracerProvider,
    pub meter_provider: SdkMeterProvider,
    pub meter: Meter,
    pub swap_latency_ms: Histogram<f64>,
    /// `Δk/k` por swap; nunca negativo.
    pub k_growth_rel: Histogram<f64>,
    pub rejected_transitions: Counter<u64>,
}

impl Telemetry {
    /// Registra o crescimento de k de um swap já liquidado.
    pub fn record_swap(&self, outcome: &SwapOutcome, reserve_in: u128, reserve_out: u128, elapsed: Duration) {
        let attrs = [KeyValue::new("pair", outcome.pair.to_string())];
        self.swap_latency_ms.record(elapsed.as_secs_f64() * 1000.0, &attrs);

        let k0 = reserve_in as f64 * reserve_out as f64;
        if k0 > 0.0 {
            let k1 = reserve_in.saturating_add(outcome.amount_in) as f64 * reserve_out.saturating_sub(outcome.amount_out) as f64;
            self.k_growth_rel.record(((k1 - k0) / k0).max(0.0), &attrs);
        }
    }

    pub fn record_rejection(&self, op: &'static str, code: &'static str) {
        self.rejected_transitions
            .add(1, &[KeyValue::new("op", op), KeyValue::new("code", code)]);
    }

    pub fn shutdown(&self) {
        let _ = self.meter_provider.force_flush();
        let _ = self.tracer_provider.shutdown();
    }
}

fn endpoint(signal_var: &str, base: &str, path: &str) -> String {
    std::env::var(signal_var).unwrap_or_else(|_| format!("{}/{}", base.trim_end_matches('/'), path))
}

pub fn init(service_name: &str) -> Result<Telemetry> {
    let base = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4318".to_string());
    let commit = std::env::var(ENV_COMMIT_SHA).unwrap_or_else(|_| "unknown".into());

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", service_name.to_string()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("git.commit.sha", commit),
        ])
        .build();

    // ---- Traces (OTLP/HTTP) ----
    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT", &base, "v1/traces"))
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource.clone())
        .with_batch_exporter(span_exporter)
        .build();

    let tracer = tracer_provider.tracer("cpamm_core");

    // ---- Métricas (OTLP/HTTP) ----
    let metric_exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint("OTEL_EXPORTER_OTLP_METRICS_ENDPOINT", &base, "v1/metrics"))
        .build()?;

    let reader = PeriodicReader::builder(metric_exporter)
        .with_interval(Duration::from_secs(10))
        .build();

    let meter_provider = SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    // tracing -> OTel
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let subscriber = Registry::default()
        .with(filter_from_env())
        .with(fmt_layer)
        .with(otel_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);

    let meter = meter_provider.meter("cpamm_core");
    let swap_latency_ms = meter
        .f64_histogram("swap_latency_ms")
        .with_unit("ms")
        .with_description("Latency of swap transitions in ms")
        .build();
    let k_growth_rel = meter
        .f64_histogram("k_growth_rel")
        .with_unit("1")
        .with_description("Relative growth of reserve0*reserve1 per swap")
        .build();
    let rejected_transitions = meter
        .u64_counter("rejected_transitions")
        .with_description("Transitions rejected, by error code")
        .build();

    Ok(Telemetry { tracer_provider, meter_provider, meter, swap_latency_ms, k_growth_rel, rejected_transitions })
}

/// Cria um `Span` INFO com nome **estático** (exigência do tracing) e
/// coloca o nome dinâmico em `span_name`. Inclui `git_commit_sha`.
pub fn make_info_span(name: &str, op_id: u32, component: &str) -> tracing::Span {
    let commit = std::env::var(ENV_COMMIT_SHA).unwrap_or_else(|_| "unknown".into());
    tracing::span!(
        target: "amm",
        Level::INFO,
        "op",
        git_commit_sha = %commit,
        span_name = %name,
        op_id = op_id,
        component = component
    )
}

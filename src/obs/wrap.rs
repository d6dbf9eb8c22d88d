use once_cell::sync::OnceCell;
use opentelemetry::metrics::Histogram;
use opentelemetry::{global, KeyValue};
use std::time::Instant;

use crate::amm::error::Result;

static HIST: OnceCell<Histogram<f64>> = OnceCell::new();

fn histogram() -> Histogram<f64> {
    HIST.get_or_init(|| {
        let meter = global::meter("cpamm_core");
        meter
            .f64_histogram("amm_op_duration_seconds")
            .with_unit("s")
            .with_description("AMM transition duration")
            .build()
    })
    .clone()
}

/// Mede `f` e registra no histograma com o atributo `op`.
pub fn time<F, T>(op: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    histogram().record(start.elapsed().as_secs_f64(), &[KeyValue::new("op", op)]);
    out
}

/// Como [`time`], com `outcome` = `ok` ou o código do erro.
pub fn time_result<F, T>(op: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let start = Instant::now();
    let out = f();
    let outcome = match &out {
        Ok(_) => "ok",
        Err(err) => err.code.code(),
    };
    histogram().record(
        start.elapsed().as_secs_f64(),
        &[KeyValue::new("op", op), KeyValue::new("outcome", outcome)],
    );
    out
}

//! Logs (`tracing`) e a métrica de duração das transições.

pub mod tracingx;
pub mod wrap;

pub use tracingx::{filter_from_env, init_fmt};

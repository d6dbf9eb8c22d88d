use tracing_subscriber::EnvFilter;

/// `RUST_LOG` ou `info`.
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Subscriber `fmt` sem exportação; chamar de novo não faz nada.
pub fn init_fmt() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_target(true)
        .try_init();
}

pub mod entities;

// Re-export tracing for use in this crate
pub use tracing;

// Installs the global subscriber; panics if one is already set, so call it once at startup
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    // The log level can be controlled via the RUST_LOG environment variable,
    // defaulting to info when it is unset.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr so stdout stays clean for report tables.
///
/// The level can be overridden per module via the `RUST_LOG` environment
/// variable; otherwise the CLI flag sets the binary's level and the core
/// library logs warnings only.
pub fn init(level: &str) {
    let default_filter = format!("wealthdist={level},wealthdist_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

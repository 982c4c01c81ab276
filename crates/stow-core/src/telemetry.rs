use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: our own crates at `info`, everything
/// else (the AWS SDK and its HTTP stack) at `warn`.
pub const DEFAULT_FILTER: &str = "warn,stow_core=info,stow_aws=info,stow=info";

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
///
/// Debug builds log human-readable lines, release builds log JSON. Output
/// goes to stderr so command output on stdout stays machine-readable.
/// Invalid `RUST_LOG` values fall back to [`DEFAULT_FILTER`].
pub fn init_tracing() {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());

    if cfg!(debug_assertions) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    }
}

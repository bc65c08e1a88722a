use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "auth_service=info,info";

/// Install the JSON tracing subscriber
///
/// `RUST_LOG` overrides the default `auth_service=info,info` filter.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .init();
}

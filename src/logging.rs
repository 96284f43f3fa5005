//! Logging setup.
//!
//! Log output goes to stderr; stdout carries the rendered conversation.

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Default filter when nothing is configured.
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter: explicit value, then `BIOCHAT_LOG`, then `RUST_LOG`,
/// then [`DEFAULT_FILTER`]. Invalid directives fall through to the next source.
pub fn resolve_env_filter(explicit: Option<&str>) -> EnvFilter {
    let from_biochat = std::env::var("BIOCHAT_LOG").ok();
    let candidates = [explicit, from_biochat.as_deref()];

    for directive in candidates.into_iter().flatten() {
        if let Ok(filter) = EnvFilter::try_new(directive) {
            return filter;
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber once per process; later calls do nothing.
pub fn init_logging(filter: Option<&str>) {
    INIT.get_or_init(|| {
        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(resolve_env_filter(filter))
            .with(layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_filter_wins() {
        std::env::set_var("BIOCHAT_LOG", "warn");
        let filter = resolve_env_filter(Some("biochat=trace"));
        std::env::remove_var("BIOCHAT_LOG");
        assert_eq!(filter.to_string(), "biochat=trace");
    }

    #[test]
    #[serial]
    fn test_biochat_log_used() {
        std::env::set_var("BIOCHAT_LOG", "warn");
        let filter = resolve_env_filter(None);
        std::env::remove_var("BIOCHAT_LOG");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    #[serial]
    fn test_default_filter() {
        std::env::remove_var("BIOCHAT_LOG");
        std::env::remove_var("RUST_LOG");
        assert_eq!(resolve_env_filter(None).to_string(), "info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Some("off"));
        init_logging(Some("debug"));
    }
}

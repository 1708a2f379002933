//! Logging setup utilities for the group-messaging coordinator.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for both the application crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The name of the calling crate (e.g., "tamariba-server")
/// * `binary_name` - The name of the binary (e.g., "tamariba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default filter directive covering the crate and binary targets.
///
/// Tracing targets use underscores where crate names use hyphens.
fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={}",
        crate_name.replace("-", "_"),
        default_log_level,
        binary_name.replace("-", "_"),
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_caller_crate_and_binary() {
        // given:
        let crate_name = "tamariba-server";
        let binary_name = "tamariba-server";

        // when:
        let filter = default_filter(crate_name, binary_name, "debug");

        // then: the filter enables the caller's lib crate, not this crate
        assert_eq!(filter, "tamariba_server=debug,tamariba_server=debug");
        assert!(!filter.contains("tamariba_shared"));
    }

    #[test]
    fn test_default_filter_converts_hyphens_to_underscores() {
        // given / when:
        let filter = default_filter("my-app", "my-app-cli", "info");

        // then:
        assert_eq!(filter, "my_app=info,my_app_cli=info");
    }
}

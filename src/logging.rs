//! Tracing setup.
//!
//! Structured logging over `tracing` + `tracing-subscriber`: an `EnvFilter`
//! honoring `RUST_LOG` with the configured level as fallback, and a compact
//! fmt layer. Embedding applications that install their own subscriber can
//! skip this entirely; `try_init` failing because a global subscriber
//! already exists is reported, not panicked on.

use crate::config::Settings;
use crate::error::{ZnError, ZnResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter built from the configured level, used when `RUST_LOG` is unset.
fn fallback_filter(default_level: &str) -> ZnResult<EnvFilter> {
    EnvFilter::try_new(default_level)
        .map_err(|e| ZnError::Configuration(format!("invalid log filter: {e}")))
}

/// Install a global subscriber filtered at `default_level` (overridable via
/// `RUST_LOG`).
pub fn init(default_level: &str) -> ZnResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => fallback_filter(default_level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| ZnError::Configuration(format!("failed to install subscriber: {e}")))
}

/// Install a global subscriber using the configured log level.
pub fn init_from_settings(settings: &Settings) -> ZnResult<()> {
    init(&settings.log_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_accepts_plain_levels() {
        assert!(fallback_filter("info").is_ok());
        assert!(fallback_filter("zntest=debug,warn").is_ok());
    }

    #[test]
    fn fallback_rejects_garbage_directives() {
        let err = fallback_filter("not==a==filter");
        assert!(matches!(err, Err(ZnError::Configuration(_))));
    }
}

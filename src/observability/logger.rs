//! Tracing Setup
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`, falling
//! back to the given directive.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "sales_pipeline=info";

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install the subscriber with `DEFAULT_DIRECTIVE`.
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_refused() {
        init_default_tracing();
        assert!(!init_tracing("sales_pipeline=debug"));
    }
}

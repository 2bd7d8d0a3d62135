//! Logging utilities and structured logging support
//!
//! Pool diagnostics go through the `log` facade; applications pick the
//! backend. These helpers wire up `env_logger` the way the demo does.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with an explicit filter such as
/// `"info"` or `"prefab_pool=debug"`
///
/// `RUST_LOG` still takes precedence when it is set. Returns `false` if a
/// logger was already installed.
pub fn init_with_filter(filter: &str) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_filter);
    }
    builder.try_init().is_ok()
}

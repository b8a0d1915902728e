//! Diagnostic tracing, written to stderr so stdout only carries the
//! confirmation line of each deleted branch.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Reads `RUST_LOG`, defaulting to `warn`.
///
/// ```bash
/// RUST_LOG=git_delete_squashed=debug git-delete-squashed main
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

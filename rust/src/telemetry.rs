use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install the stderr subscriber. `RUST_LOG` overrides the level from the CLI.
pub fn init_tracing(level: LogLevel) {
    let Some(directive) = level.directive() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

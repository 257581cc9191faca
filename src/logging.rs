use std::io;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global `tracing` subscriber, writing to stderr so stdout only
/// carries the paths `fmtwrite write` prints.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let subscriber = Registry::default()
            .with(filter(verbose))
            .with(fmt::layer().with_target(false).with_writer(io::stderr));
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::new(if verbose { "debug" } else { "info" })
}

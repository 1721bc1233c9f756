use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Installs the global subscriber, with the default filter taken from a `-v`
/// style flag. `RUST_LOG` takes precedence when set.
///
/// Does nothing if a subscriber is already installed.
pub fn init_with_verbosity(verbosity: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let res = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(e) = res {
        tracing::debug!("log subscriber already installed: {e}");
    }
}

/// Turns a verbosity flag into a filter directive.
///
/// Numeric levels follow the glog convention used by the other edge
/// components (`0`/`1` normal, `2`/`3` debug, `4+` trace). Anything else is
/// passed through as a directive.
pub fn filter_directive(verbosity: &str) -> &str {
    match verbosity.trim().parse::<u8>() {
        Ok(0 | 1) => "info",
        Ok(2 | 3) => "debug",
        Ok(_) => "trace",
        Err(_) => verbosity.trim(),
    }
}

use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use tracing::{instrument, trace};

const FALLBACK_FILTER: &str = "guessle=info";

/// Logs go to stderr so they don't mix with the game on stdout. `RUST_LOG` takes
/// precedence over `filter`.
#[instrument]
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|err| {
            eprintln!("invalid log filter `{filter}`: {err}");
            EnvFilter::try_new(FALLBACK_FILTER).expect("hard-coded env filter should be valid")
        });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    trace!("finished");
}

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "tokenswap";

fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean; `RUST_LOG` overrides the defaults.
pub fn init_logging(verbose: bool) {
    let level = app_level(verbose);
    let app_filter = Targets::new().with_target(APP_TARGET, level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}

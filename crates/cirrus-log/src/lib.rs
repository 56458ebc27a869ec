//! Structured logging for the Cirrus editor.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The level comes from `RUST_LOG`, then the config's
//! `debug.log_level`, then a quiet default for the GPU stack.

use cirrus_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directives: `info` everywhere, `warn` for wgpu and naga.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "cirrus.log";

/// Build the filter directive string for a config.
///
/// A bare level such as `"debug"` keeps the GPU crates at `warn`; anything
/// containing `=` or `,` is taken verbatim as a full directive list.
pub fn filter_directives(config: Option<&Config>) -> String {
    let Some(level) = config
        .map(|c| c.debug.log_level.trim())
        .filter(|l| !l.is_empty())
    else {
        return DEFAULT_FILTER.to_string();
    };

    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables the file layer
/// * `config` - source of the `debug.log_level` override
///
/// ```no_run
/// use cirrus_config::Config;
/// use cirrus_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // rayon workers show up in march spans
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

//! Cirrus scene editor.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p cirrus-app -- --render-scale 0.25` for a faster march.

use clap::Parser;
use tracing::{info, warn};
use winit::event_loop::EventLoop;

use cirrus_app::app::App;
use cirrus_app::platform::PlatformDirs;
use cirrus_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    // --config replaces the whole directory layout
    let dirs = match &args.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve().unwrap_or_else(|e| {
            eprintln!("{e}, using the working directory");
            PlatformDirs::resolve_with_root(std::path::Path::new("."))
        }),
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    cirrus_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Cirrus editor starting");

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.render.march_threads)
        .thread_name(|i| format!("march-{i}"))
        .build_global()
    {
        warn!("Raymarch thread pool unavailable, using default: {e}");
    }
    info!(threads = rayon::current_num_threads(), "Raymarch pool ready");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(config, args.import.clone(), args.play);
    event_loop.run_app(&mut app).expect("Event loop failed");
}

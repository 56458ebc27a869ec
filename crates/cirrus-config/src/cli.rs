//! Command-line argument parsing for the Cirrus editor.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cirrus editor command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cirrus", about = "Raymarched terrain and cloud scene editor")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Raymarch resolution as a fraction of the window (0.1 - 1.0).
    #[arg(long)]
    pub render_scale: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start in Play mode instead of Edit mode.
    #[arg(long)]
    pub play: bool,

    /// Import a mesh file into the scene at startup.
    #[arg(long)]
    pub import: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(scale) = args.render_scale {
            self.render.render_scale = scale;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            render_scale: Some(0.25),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.render.render_scale, 0.25);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "cirrus",
            "--play",
            "--import",
            "models/rock.glb",
            "--log-level",
            "debug",
        ]);
        assert!(args.play);
        assert_eq!(args.import, Some(PathBuf::from("models/rock.glb")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}

//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Raymarch and raster settings.
    pub render: RenderConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Initial scene parameters (terrain, clouds, light, camera).
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Fraction of the viewport resolution the CPU raymarcher renders at.
    pub render_scale: f32,
    /// Worker threads for the raymarch kernel (0 = one per logical core).
    pub march_threads: usize,
    /// Draw imported assets and physics proxies with the discovered texture.
    pub textured_proxies: bool,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of camera rotation per pixel of mouse travel.
    pub mouse_sensitivity: f32,
    /// Camera movement speed in units per second.
    pub move_speed: f32,
    /// Invert Y axis for camera.
    pub invert_y: bool,
    /// Capture the cursor when entering Play mode.
    pub lock_mouse_in_play: bool,
}

/// Initial scene parameters. Edited live in the UI, never written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub clouds: CloudConfig,
    pub light: LightConfig,
    pub camera: CameraConfig,
}

/// Height field generator parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub base_frequency: f32,
    pub base_amplitude: f32,
    pub persistence: f32,
    pub octaves: u32,
    pub flatten_power: f32,
    pub final_scale: f32,
}

/// Cloud layer parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudConfig {
    pub base_height: f32,
    pub thickness: f32,
    pub noise_scale: f32,
    pub coverage_min: f32,
    pub coverage_max: f32,
    pub density_factor: f32,
}

/// Directional light parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    /// Direction towards the light. Normalized when loaded into the scene.
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub ambient_strength: f32,
}

/// Editor camera starting state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Yaw in degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the stats window on startup.
    pub show_stats: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Cirrus Editor".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_scale: 0.5,
            march_threads: 0,
            textured_proxies: true,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            move_speed: 2.5,
            invert_y: false,
            lock_mouse_in_play: true,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_frequency: 0.2,
            base_amplitude: 1.5,
            persistence: 0.45,
            octaves: 5,
            flatten_power: 1.8,
            final_scale: 2.5,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_height: 10.0,
            thickness: 12.0,
            noise_scale: 0.4,
            coverage_min: 0.6,
            coverage_max: 0.75,
            density_factor: 1.0,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.8, 0.7, -0.5],
            color: [1.0, 0.95, 0.85],
            ambient_strength: 0.15,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 10.0],
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_stats: true,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that would leave the editor without a usable frame.
    ///
    /// Out-of-range but meaningful scene values are clamped later by the
    /// scene store; only values with no sensible interpretation fail here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.render.render_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "render.render_scale",
                reason: format!("{scale} is not a positive number"),
            });
        }
        if self.scene.terrain.octaves == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scene.terrain.octaves",
                reason: "at least one octave is required".to_string(),
            });
        }
        if self.scene.light.direction.iter().all(|c| *c == 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "scene.light.direction",
                reason: "direction must not be the zero vector".to_string(),
            });
        }
        Ok(())
    }
}

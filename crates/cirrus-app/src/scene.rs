//! Live scene state edited by the UI.
//!
//! [`SceneSettings`] is the only mutable copy of the terrain, cloud and light
//! parameters. The frame orchestrator freezes it into a
//! [`FrameParams`] after the UI has run, so no edit ever lands mid-march.

use glam::Vec3;
use tracing::{debug, info};

use cirrus_assets::ImportedAsset;
use cirrus_config::SceneConfig;
use cirrus_march::{CameraBlock, CloudLayer, FrameParams, HeightfieldParams, Light};

/// Largest persistence the UI may set. Octave amplitudes must strictly decay.
pub const MAX_PERSISTENCE: f32 = 0.99;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub terrain: HeightfieldParams,
    pub clouds: CloudLayer,
    pub light: Light,
    initial: (HeightfieldParams, CloudLayer, Light),
}

impl SceneSettings {
    pub fn from_config(config: &SceneConfig) -> Self {
        let t = &config.terrain;
        let terrain = HeightfieldParams {
            base_frequency: t.base_frequency,
            base_amplitude: t.base_amplitude,
            persistence: t.persistence.min(MAX_PERSISTENCE),
            octaves: t.octaves,
            flatten_power: t.flatten_power,
            final_scale: t.final_scale,
        }
        .sanitized();

        let c = &config.clouds;
        let clouds = CloudLayer::new(
            c.base_height,
            c.thickness,
            c.noise_scale,
            c.coverage_min,
            c.coverage_max,
            c.density_factor,
        );

        let l = &config.light;
        let light = Light::new(
            Vec3::from_array(l.direction),
            Vec3::from_array(l.color),
            l.ambient_strength,
        );

        Self {
            terrain,
            clouds,
            light,
            initial: (terrain, clouds, light),
        }
    }

    /// Pull UI-edited values back into range. Run after every UI pass.
    pub fn enforce_limits(&mut self) {
        self.terrain.persistence = self.terrain.persistence.min(MAX_PERSISTENCE);
        self.terrain = self.terrain.sanitized();
        let min = self.clouds.coverage_min();
        self.clouds.set_coverage_min(min);
    }

    pub fn reset_terrain(&mut self) {
        self.terrain = self.initial.0;
    }

    pub fn reset_clouds(&mut self) {
        self.clouds = self.initial.1;
    }

    pub fn reset_light(&mut self) {
        self.light = self.initial.2;
    }

    /// Immutable snapshot for this frame's march.
    pub fn frame_params(&self, camera: CameraBlock) -> FrameParams {
        FrameParams {
            camera,
            terrain: self.terrain,
            clouds: self.clouds,
            light: self.light,
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

/// Everything the editor shows besides physics.
#[derive(Debug, Default)]
pub struct EditorScene {
    pub settings: SceneSettings,
    pub assets: Vec<ImportedAsset>,
    selected: Option<usize>,
}

impl EditorScene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            assets: Vec::new(),
            selected: None,
        }
    }

    /// Append an asset without changing the selection. Returns its index.
    pub fn add_asset(&mut self, asset: ImportedAsset) -> usize {
        info!(
            name = %asset.name,
            triangles = asset.mesh.triangle_count(),
            "Asset imported"
        );
        self.assets.push(asset);
        self.assets.len() - 1
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select an asset by index; out-of-range indices clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.assets.len());
        debug!(selected = ?self.selected, "Selection changed");
    }

    pub fn selected_asset(&self) -> Option<&ImportedAsset> {
        self.selected.and_then(|i| self.assets.get(i))
    }

    /// Orbit target for the controller.
    pub fn selected_position(&self) -> Option<Vec3> {
        self.selected_asset().map(|a| a.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_assets::unit_cube;
    use glam::Mat4;
    use std::path::PathBuf;

    fn asset(name: &str, position: Vec3) -> ImportedAsset {
        ImportedAsset {
            name: name.to_string(),
            source: PathBuf::from(name),
            position,
            mesh: unit_cube(),
        }
    }

    #[test]
    fn test_settings_from_default_config() {
        let settings = SceneSettings::default();
        assert_eq!(settings.terrain, HeightfieldParams::default());
        assert_eq!(settings.clouds, CloudLayer::default());
        assert!((settings.light.direction().length() - 1.0).abs() < 1e-5);
        assert_eq!(settings.light.ambient_strength, 0.15);
    }

    #[test]
    fn test_config_values_are_repaired() {
        let mut config = SceneConfig::default();
        config.terrain.persistence = 1.0;
        config.terrain.octaves = 40;
        config.clouds.coverage_min = 0.8;
        config.clouds.coverage_max = 0.2;
        config.light.direction = [0.0, 0.0, 0.0];

        let settings = SceneSettings::from_config(&config);
        assert!(settings.terrain.persistence <= MAX_PERSISTENCE);
        assert_eq!(settings.terrain.octaves, 8);
        assert!((settings.clouds.coverage_max() - 0.81).abs() < 1e-5);
        assert_eq!(settings.light.direction(), Light::default().direction());
    }

    #[test]
    fn test_enforce_limits_after_ui_edit() {
        let mut settings = SceneSettings::default();
        settings.terrain.persistence = 1.0;
        settings.terrain.octaves = 0;
        settings.enforce_limits();
        assert_eq!(settings.terrain.persistence, MAX_PERSISTENCE);
        assert_eq!(settings.terrain.octaves, 1);
        assert!(settings.clouds.coverage_max() >= settings.clouds.coverage_min() + 0.01 - 1e-6);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut settings = SceneSettings::default();
        settings.terrain.final_scale = 9.0;
        settings.clouds.density_factor = 4.0;
        settings.light.ambient_strength = 1.0;

        settings.reset_terrain();
        settings.reset_clouds();
        settings.reset_light();
        assert_eq!(settings, SceneSettings::default());
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let mut settings = SceneSettings::default();
        let camera = CameraBlock::new(Vec3::ZERO, Mat4::IDENTITY, Mat4::IDENTITY, 0.0);
        let params = settings.frame_params(camera);

        settings.clouds.density_factor = 3.0;
        assert_eq!(params.clouds.density_factor, 1.0);
        assert_eq!(params.terrain, settings.terrain);
    }

    #[test]
    fn test_import_does_not_select() {
        let mut scene = EditorScene::default();
        let index = scene.add_asset(asset("crate.glb", Vec3::ZERO));
        assert_eq!(index, 0);
        assert_eq!(scene.selected(), None);
        assert_eq!(scene.selected_position(), None);
    }

    #[test]
    fn test_selection_tracks_position() {
        let mut scene = EditorScene::default();
        scene.add_asset(asset("a.glb", Vec3::ZERO));
        scene.add_asset(asset("b.glb", Vec3::new(1.0, 2.0, 3.0)));

        scene.select(Some(1));
        assert_eq!(scene.selected_position(), Some(Vec3::new(1.0, 2.0, 3.0)));

        scene.select(Some(7));
        assert_eq!(scene.selected(), None);
    }
}

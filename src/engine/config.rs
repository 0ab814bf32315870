use std::fs;
use std::path::{ Path, PathBuf };

use log::info;
use serde::Deserialize;

use crate::engine::components::{
    Camera,
    InputSettings,
    InteractionState,
    Light,
    Material,
};
use crate::engine::error::{ RenderError, RenderResult };
use crate::engine::loaders::LayoutChoice;

/// Viewer settings, read from a TOML file. Every section and field is
/// optional and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub assets: AssetsConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "mesh-viewer".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub mesh: PathBuf,
    /// Lit meshes without a texture get a 1x1 white one.
    pub texture: Option<PathBuf>,
    pub layout: LayoutChoice,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("assets/meshes/cube.obj"),
            texture: None,
            layout: LayoutChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            fov_y_degrees: camera.fov_y_degrees,
            near: camera.near,
            far: camera.far,
            distance: camera.distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub color: [f32; 3],
    /// `w = 0` for a direction, `w = 1` for a world-space position.
    pub direction_or_position: [f32; 4],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            direction_or_position: [1.0, 0.0, 0.5, 0.0],
            intensity: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialConfig {
    pub base_color: [f32; 4],
    pub ambient_intensity: f32,
    pub specular_color: [f32; 3],
    pub specular_intensity: f32,
    pub flare_exponent: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            ambient_intensity: 0.15,
            specular_color: [1.0, 1.0, 1.0],
            specular_intensity: 0.08,
            flare_exponent: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    pub drag_sensitivity: f32,
    pub zoom_step: f32,
    pub animate: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let settings = InputSettings::default();
        Self {
            drag_sensitivity: settings.drag_sensitivity,
            zoom_step: settings.zoom_step,
            animate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub depth_test: bool,
    pub culling: bool,
    pub wireframe: bool,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth_test: true,
            culling: true,
            wireframe: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(source: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> RenderResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source).map_err(|e| match e {
            RenderError::Config(msg) => RenderError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        info!("loaded config {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> RenderResult<()> {
        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(
                RenderError::Config(
                    format!("camera planes must satisfy 0 < near < far, got near {} far {}", camera.near, camera.far)
                )
            );
        }
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(
                RenderError::Config(format!("camera fov must be in (0, 180), got {}", camera.fov_y_degrees))
            );
        }
        let w = self.light.direction_or_position[3];
        if w != 0.0 && w != 1.0 {
            return Err(RenderError::Config(format!("light w must be 0 or 1, got {w}")));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(RenderError::Config("window size must be non-zero".into()));
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.camera.fov_y_degrees, self.camera.near, self.camera.far, self.camera.distance)
    }

    pub fn light(&self) -> Light {
        Light::new(self.light.color, self.light.direction_or_position, self.light.intensity)
    }

    pub fn material(&self) -> Material {
        let m = &self.material;
        Material::new(m.base_color, m.ambient_intensity, m.specular_color, m.specular_intensity, m.flare_exponent)
    }

    pub fn input_settings(&self) -> InputSettings {
        InputSettings {
            drag_sensitivity: self.interaction.drag_sensitivity,
            zoom_step: self.interaction.zoom_step,
        }
    }

    pub fn initial_state(&self) -> InteractionState {
        InteractionState {
            animating: self.interaction.animate,
            wireframe: self.render.wireframe,
            culling_enabled: self.render.culling,
            depth_test_enabled: self.render.depth_test,
            ..InteractionState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.light(), Light::default());
        assert_eq!(config.material(), Material::default());
        assert_eq!(config.camera(), Camera::default());
        assert_eq!(config.initial_state(), InteractionState::default());
    }

    #[test]
    fn bundled_config_spells_out_the_defaults() {
        let config = ViewerConfig::from_toml_str(include_str!("../../assets/viewer.toml")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [assets]
            mesh = "models/suzanne.obj"
            texture = "models/uvmap.png"
            layout = "t2f_n3f_v3f"

            [light]
            direction_or_position = [0.0, 4.0, 0.0, 1.0]

            [render]
            wireframe = true
            "#
        ).unwrap();

        assert_eq!(config.assets.mesh, PathBuf::from("models/suzanne.obj"));
        assert_eq!(config.assets.layout, LayoutChoice::T2fN3fV3f);
        assert!(!config.light().is_directional());
        assert_eq!(config.light.intensity, 1.6);
        assert!(config.initial_state().wireframe);
        assert!(config.initial_state().culling_enabled);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(ViewerConfig::from_toml_str("[camera]\nzoom = 3"), Err(RenderError::Config(_))));
        assert!(matches!(ViewerConfig::from_toml_str("[camera]\nnear = 0.0"), Err(RenderError::Config(_))));
        assert!(
            matches!(
                ViewerConfig::from_toml_str("[light]\ndirection_or_position = [0.0, 1.0, 0.0, 0.5]"),
                Err(RenderError::Config(_))
            )
        );
        assert!(matches!(ViewerConfig::from_toml_str("window = 3"), Err(RenderError::Config(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ViewerConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}

//! JSON scene files: a board, its features and the render settings.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pcbtex_core::{Board, LayerFeature, LayerVisibility};
use pcbtex_renderer::{BoardTextures, Compositor, RenderConfig};
use serde::{Deserialize, Serialize};

use crate::error::IoError;

fn default_resolution() -> f64 {
    40.0
}

/// Everything needed to render one board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub name: String,
    pub board: Board,
    #[serde(default)]
    pub features: Vec<LayerFeature>,
    #[serde(default)]
    pub visibility: LayerVisibility,
    /// Pixels per millimeter.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default)]
    pub config: RenderConfig,
}

impl Scene {
    pub fn new(name: &str, board: Board) -> Self {
        Self {
            name: name.to_string(),
            board,
            features: Vec::new(),
            visibility: LayerVisibility::default(),
            resolution: default_resolution(),
            config: RenderConfig::default(),
        }
    }

    pub fn with_features(mut self, features: Vec<LayerFeature>) -> Self {
        self.features = features;
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, IoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Composite and finalize both sides with the scene's own settings.
    pub fn render(&self) -> Result<BoardTextures, IoError> {
        let compositor = Compositor::new(self.config.clone());
        let textures = compositor.render_board_textures(
            &self.board,
            &self.features,
            &self.visibility,
            self.resolution,
        )?;
        Ok(textures)
    }
}

/// Reads a [`Scene`] from any JSON byte stream.
pub struct SceneReader<R: Read> {
    reader: R,
}

impl<R: Read> SceneReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn read(self) -> Result<Scene, IoError> {
        let scene: Scene = serde_json::from_reader(self.reader)?;
        log::info!(
            "Scene '{}': {} features, {:.1} px/mm",
            scene.name,
            scene.features.len(),
            scene.resolution
        );
        if !scene.resolution.is_finite() || scene.resolution <= 0.0 {
            log::warn!(
                "Scene '{}' has unusable resolution {}; nothing will render",
                scene.name,
                scene.resolution
            );
        }
        Ok(scene)
    }
}

/// Load a scene file from disk.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, IoError> {
    let path = path.as_ref();
    log::info!("Loading scene {}", path.display());
    SceneReader::new(BufReader::new(File::open(path)?)).read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcbtex_core::{Point, Side};
    use std::io::Cursor;

    const SCENE: &str = r#"{
        "name": "blinky",
        "board": {"center": {"x": 0.0, "y": 0.0}, "width": 10.0, "height": 10.0},
        "features": [
            {"type": "pad", "side": "top", "position": {"x": 0.0, "y": 0.0},
             "shape": "rect", "width": 2.0, "height": 1.0},
            {"type": "silkscreen_text", "side": "bottom", "text": "R1",
             "anchor": {"x": 1.0, "y": 1.0}, "font_size": 1.0},
            {"type": "trace", "route": [
                {"route_type": "wire", "x": -3.0, "y": 2.0, "width": 0.2, "layer": "top"},
                {"route_type": "via", "x": 0.0, "y": 2.0, "from_layer": "top", "to_layer": "bottom"},
                {"route_type": "wire", "x": 0.0, "y": 2.0, "width": 0.2, "layer": "bottom"},
                {"route_type": "wire", "x": 3.0, "y": 2.0, "width": 0.2, "layer": "bottom"}
            ]}
        ],
        "resolution": 10,
        "config": {"knockout_padding": 0.3}
    }"#;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_read_scene() {
        init();
        let scene = SceneReader::new(Cursor::new(SCENE)).read().unwrap();
        assert_eq!(scene.name, "blinky");
        assert_eq!(scene.features.len(), 3);
        assert!((scene.resolution - 10.0).abs() < 1e-10);
        assert!((scene.config.knockout_padding - 0.3).abs() < 1e-10);
        assert!((scene.config.silkscreen_text_scale - 0.57).abs() < 1e-10);
        assert!(!scene.visibility.fabrication_notes);
        assert!((scene.board.thickness - 1.6).abs() < 1e-10);
    }

    #[test]
    fn test_defaults_for_minimal_scene() {
        init();
        let scene = Scene::from_json(
            r#"{"board": {"center": {"x": 0.0, "y": 0.0}, "width": 5.0, "height": 5.0}}"#,
        )
        .unwrap();
        assert!(scene.features.is_empty());
        assert!((scene.resolution - 40.0).abs() < 1e-10);
        assert!(scene.render().unwrap().is_empty());
    }

    #[test]
    fn test_render_scene() {
        init();
        let scene = Scene::from_json(SCENE).unwrap();
        let textures = scene.render().unwrap();
        let top = textures.get(Side::Top).unwrap();
        assert_eq!((top.width(), top.height()), (100, 100));
        let bottom = textures.get(Side::Bottom).unwrap();
        assert!(bottom.layers.contains(&pcbtex_renderer::LayerKind::Silkscreen));
        assert!(bottom.layers.contains(&pcbtex_renderer::LayerKind::Trace));
    }

    #[test]
    fn test_scene_cannot_change_sampling() {
        init();
        let scene = Scene::from_json(
            r#"{
                "board": {"center": {"x": 0.0, "y": 0.0}, "width": 4.0, "height": 4.0},
                "features": [{"type": "pad", "side": "top", "position": {"x": 0.0, "y": 0.0},
                              "shape": "circle", "radius": 1.0}],
                "resolution": 10,
                "config": {"texture": {"anisotropy": 1, "generate_mipmaps": false}}
            }"#,
        )
        .unwrap();
        let textures = scene.render().unwrap();
        let top = textures.get(Side::Top).unwrap();
        assert_eq!(top.settings, pcbtex_renderer::TEXTURE_SETTINGS);
        assert_eq!(top.settings.anisotropy, 16);
    }

    #[test]
    fn test_json_roundtrip_keeps_features() {
        init();
        let scene = Scene::new("copy", Board::new(Point::new(1.0, 1.0), 4.0, 3.0))
            .with_resolution(20.0)
            .with_features(Scene::from_json(SCENE).unwrap().features);
        let back = Scene::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(back.features, scene.features);
        assert_eq!(back.board, scene.board);
        assert!((back.resolution - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        init();
        let err = SceneReader::new(Cursor::new("{\"board\": 3}")).read().unwrap_err();
        assert!(matches!(err, IoError::Json(_)));
        assert!(matches!(
            load_scene("/nonexistent/scene.json").unwrap_err(),
            IoError::Io(_)
        ));
    }
}

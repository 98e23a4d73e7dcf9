use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{GridLayer, GridWorld};

/// Errors raised while building a world from a level description.
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    #[error("level JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("layer `{layer}` row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        layer: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("layer `{layer}` row {row} col {col}: unknown tile glyph {ch:?}")]
    BadTile {
        layer: String,
        row: usize,
        col: usize,
        ch: char,
    },

    #[error("level has no layers")]
    NoLayers,

    #[error("tile size must be positive and finite, got {0}")]
    BadTileSize(f32),
}

/// Where the player starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    /// Degrees.
    #[serde(default)]
    pub facing: f32,
}

impl SpawnPoint {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// One layer as written in level JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDesc {
    pub name: String,
    /// Text rows, top row is y = 0. See [`GridLayer::from_rows`] for glyphs.
    pub rows: Vec<String>,
    #[serde(default = "default_wall_height")]
    pub wall_height: f32,
}

/// A level loaded at runtime from JSON.
///
/// ```json
/// {
///   "tile_size": 1.0,
///   "layers": [{ "name": "walls", "rows": ["###", "#.#", "###"] }],
///   "spawn": { "x": 1.5, "y": 1.5, "facing": 90 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub origin: [f32; 2],
    pub layers: Vec<LayerDesc>,
    #[serde(default)]
    pub spawn: Option<SpawnPoint>,
}

fn default_tile_size() -> f32 {
    1.0
}

fn default_wall_height() -> f32 {
    1.0
}

impl LevelDesc {
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and build the collision world.
    pub fn build(&self) -> Result<GridWorld, WorldError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(WorldError::BadTileSize(self.tile_size));
        }
        if self.layers.is_empty() {
            return Err(WorldError::NoLayers);
        }

        let mut world = GridWorld::new(self.tile_size).with_origin(Vec2::from(self.origin));
        for desc in &self.layers {
            let layer = GridLayer::from_rows(desc.name.clone(), desc.rows.as_slice())?
                .with_wall_height(desc.wall_height);
            world.push_layer(layer);
        }
        Ok(world)
    }
}

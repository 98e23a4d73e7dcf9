use glam::Vec2;
use crate::api::types::EntityId;

/// Fat Entity — a single struct carrying the pose behaviours act on.
/// Behaviours live beside the scene in `BehaviourState`, keyed by `EntityId`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped by dispatch).
    pub active: bool,
    /// Position in world space (grid units when tile_size is 1).
    pub pos: Vec2,
    /// Orientation in degrees. Never wrapped; trig handles any value.
    pub facing: f32,
}

impl Entity {
    /// Create a new entity with the given ID at the origin, facing +X.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            facing: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = facing;
        self
    }

    /// Unit vector pointing along `facing`.
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.facing.to_radians())
    }
}

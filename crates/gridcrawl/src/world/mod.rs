//! Grid collision world.
//!
//! The world is the outbound seam of the behaviour system: behaviours never
//! see tiles directly, they ask a [`CollisionWorld`] whether a point is
//! occupied.

pub mod grid;
pub mod level;

pub use grid::{Collision, CollisionKind, CollisionWorld, GridLayer, GridWorld, ProbeFn};
pub use level::{LayerDesc, LevelDesc, SpawnPoint, WorldError};

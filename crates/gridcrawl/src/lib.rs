pub mod api;
pub mod behaviour;
pub mod bridge;
pub mod components;
pub mod core;
pub mod input;
pub mod world;

// Re-export key types at crate root for convenience
pub use api::game::{ConfigError, EngineContext, Game, GameConfig};
pub use api::types::{BehaviourId, EntityId, Pose};
pub use behaviour::{
    AttachedBehaviour, Behaviour, BehaviourContext, BehaviourError, BehaviourState,
    ControllerConfig, InputController, KeyBindings, LifecycleEvent,
};
pub use bridge::poses::PoseBuffer;
pub use components::entity::Entity;
pub use crate::core::scene::Scene;
pub use crate::core::time::FixedTimestep;
pub use input::keys::{KeyState, KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};
pub use input::queue::{InputEvent, InputQueue};
pub use world::{
    Collision, CollisionKind, CollisionWorld, GridLayer, GridWorld, LevelDesc, ProbeFn,
    SpawnPoint, WorldError,
};

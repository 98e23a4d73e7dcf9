use serde::{Deserialize, Serialize};

use crate::api::types::{BehaviourId, EntityId};
use crate::behaviour::{Behaviour, BehaviourState, ControllerConfig, LifecycleEvent};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::input::keys::KeyState;
use crate::input::queue::InputQueue;
use crate::world::grid::GridWorld;
use crate::world::level::{LevelDesc, SpawnPoint, WorldError};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixed_dt must be a positive number of seconds, got {0}")]
    BadFixedDt(f32),
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Cap on fixed steps run for one host frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Maximum number of poses exported to the host per frame (default: 256).
    pub max_poses: usize,
    /// Defaults for input controllers the game spawns.
    pub controller: ControllerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            max_poses: 256,
            controller: ControllerConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a timestep the fixed-step loop can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::BadFixedDt(self.fixed_dt));
        }
        Ok(())
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state: load a level, spawn entities, attach behaviours.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Per-step game logic, run before behaviours receive `Update`.
    /// `input` holds this frame's raw events; `ctx.keys` already reflects them.
    fn update(&mut self, _ctx: &mut EngineContext, _input: &InputQueue) {}

    /// Called after the host swaps in a new level, with the level's spawn
    /// point if it declares one.
    fn level_loaded(&mut self, _ctx: &mut EngineContext, _spawn: Option<SpawnPoint>) {}
}

/// Mutable engine state, passed to Game::init and Game::update.
/// This is the host capability behaviours see through their context.
pub struct EngineContext {
    pub scene: Scene,
    pub behaviours: BehaviourState,
    pub keys: KeyState,
    pub world: GridWorld,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            behaviours: BehaviourState::new(),
            keys: KeyState::new(),
            world: GridWorld::default(),
            next_id: 1,
        }
    }

    /// Create a context around an existing world.
    pub fn with_world(world: GridWorld) -> Self {
        Self {
            world,
            ..Self::new()
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene. Returns its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        id
    }

    /// Attach a behaviour to an entity. It receives `Initialize` on the
    /// next step (or immediately via `initialize_pending`).
    pub fn attach(&mut self, entity: EntityId, behaviour: impl Behaviour + 'static) -> BehaviourId {
        if !self.scene.contains(entity) {
            log::warn!("attaching behaviour to {:?}, which is not in the scene", entity);
        }
        self.behaviours.attach(entity, behaviour)
    }

    /// Despawn an entity, sending `Destroy` to its behaviours first.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self
            .behaviours
            .remove_entity(id, &mut self.scene, &self.keys, &self.world);
        if removed > 0 {
            log::debug!("despawn {:?}: destroyed {} behaviours", id, removed);
        }
        self.scene.despawn(id)
    }

    /// Run `Initialize` for behaviours that haven't had it yet.
    pub fn initialize_pending(&mut self) -> usize {
        self.behaviours
            .initialize_pending(&mut self.scene, &self.keys, &self.world)
    }

    /// Send a lifecycle event to all live behaviours.
    pub fn dispatch(&mut self, event: LifecycleEvent) -> usize {
        self.behaviours
            .dispatch(event, &mut self.scene, &self.keys, &self.world)
    }

    /// Replace the world with a level parsed from JSON.
    /// On error the current world is left untouched.
    pub fn load_level(&mut self, json: &str) -> Result<Option<SpawnPoint>, WorldError> {
        let level = LevelDesc::from_json(json)?;
        self.world = level.build()?;
        log::info!(
            "loaded level: {} layers, tile size {}",
            self.world.layer_count(),
            self.world.tile_size
        );
        Ok(level.spawn)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

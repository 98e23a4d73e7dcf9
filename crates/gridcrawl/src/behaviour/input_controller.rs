//! Arrow-key movement with wall avoidance.
//!
//! Left/right turn the parent in place; up/down walk along the facing
//! direction. Before each axis of a step is committed, a point further out
//! along that axis is probed, which keeps the player a short distance off
//! walls and lets them slide along a wall they hit at an angle.

use serde::{Deserialize, Serialize};

use super::{Behaviour, BehaviourContext};
use crate::api::game::ConfigError;
use crate::input::keys::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};

/// Key codes the controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: u32,
    pub right: u32,
    pub forward: u32,
    pub back: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KEY_LEFT,
            right: KEY_RIGHT,
            forward: KEY_UP,
            back: KEY_DOWN,
        }
    }
}

/// Tuning for [`InputController`]. Distances are in world units per update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Degrees turned per update while a turn key is held.
    pub turn_rate: f32,
    /// Distance moved per update.
    pub step: f32,
    /// How far ahead each axis is probed before moving.
    pub lookahead: f32,
    /// Collision layer to probe.
    pub probe_layer: u32,
    /// z coordinate of every probe.
    pub probe_z: f32,
    pub keys: KeyBindings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            turn_rate: 4.0,
            step: 0.1,
            lookahead: 0.4,
            probe_layer: 0,
            probe_z: 0.0,
            keys: KeyBindings::default(),
        }
    }
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Drives its parent entity from held keys.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    config: ControllerConfig,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    /// Step along the heading; `direction` is +1 forward, -1 back.
    fn walk(&self, ctx: &mut BehaviourContext<'_>, direction: f32) {
        let heading = ctx.entity.heading() * direction;
        let step = heading * self.config.step;
        let reach = heading * self.config.lookahead;
        let start = ctx.entity.pos;
        let (layer, z) = (self.config.probe_layer, self.config.probe_z);

        if ctx.world.probe(layer, start.x + reach.x, start.y, z).is_none() {
            ctx.entity.pos.x = start.x + step.x;
        }
        // The y probe uses the x just committed.
        if ctx.world.probe(layer, ctx.entity.pos.x, start.y + reach.y, z).is_none() {
            ctx.entity.pos.y = start.y + step.y;
        }
    }
}

impl Behaviour for InputController {
    fn name(&self) -> &'static str {
        "InputController"
    }

    fn update(&mut self, ctx: &mut BehaviourContext<'_>) {
        let keys = self.config.keys;

        if ctx.keys.is_down(keys.left) {
            ctx.entity.facing -= self.config.turn_rate;
        }
        if ctx.keys.is_down(keys.right) {
            ctx.entity.facing += self.config.turn_rate;
        }
        if ctx.keys.is_down(keys.forward) {
            self.walk(ctx, 1.0);
        }
        if ctx.keys.is_down(keys.back) {
            self.walk(ctx, -1.0);
        }
    }
}

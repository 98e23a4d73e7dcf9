use gridcrawl::{
    EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue, LifecycleEvent,
    PoseBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner (see
/// `export_game!`) because wasm-bindgen cannot export generic structs.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    poses: PoseBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let mut config = game.config();
        if let Err(err) = config.validate() {
            log::error!("{}; using default fixed_dt", err);
            config.fixed_dt = GameConfig::default().fixed_dt;
        }
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        let poses = PoseBuffer::with_capacity(config.max_poses);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            poses,
            timestep,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        let count = self.ctx.initialize_pending();
        log::debug!("init: {} behaviours initialized", count);
        self.poses.rebuild(self.ctx.scene.iter());
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: fold input into key state, run fixed steps, export poses.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        for event in self.input.iter() {
            self.ctx.keys.apply(event);
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.ctx.initialize_pending();
            self.ctx.dispatch(LifecycleEvent::Update);
        }

        self.input.drain();
        self.poses.rebuild(self.ctx.scene.iter());
    }

    /// Swap in a level from JSON. On failure the old level stays loaded.
    pub fn load_level(&mut self, json: &str) -> bool {
        match self.ctx.load_level(json) {
            Ok(spawn) => {
                self.timestep.reset();
                self.game.level_loaded(&mut self.ctx, spawn);
                self.poses.rebuild(self.ctx.scene.iter());
                true
            }
            Err(err) => {
                log::error!("load_level: {}", err);
                false
            }
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn poses_ptr(&self) -> *const f32 {
        self.poses.poses_ptr()
    }

    pub fn pose_count(&self) -> u32 {
        self.poses.pose_count()
    }

    pub fn max_poses(&self) -> u32 {
        self.poses.capacity() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcrawl::{Entity, EntityId, InputController, SpawnPoint, KEY_LEFT, KEY_UP};
    use glam::Vec2;

    fn hall() -> String {
        serde_json::json!({
            "layers": [{ "name": "walls", "rows": ["######", "#....#", "######"] }],
            "spawn": { "x": 1.5, "y": 1.5, "facing": 0 }
        })
        .to_string()
    }

    /// One player with an input controller.
    #[derive(Default)]
    struct Walker {
        player: Option<EntityId>,
        fixed_dt: Option<f32>,
    }

    impl Game for Walker {
        fn config(&self) -> GameConfig {
            GameConfig {
                fixed_dt: self.fixed_dt.unwrap_or(0.25),
                max_poses: 4,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.spawn(Entity::new(id).with_tag("player").with_pos(Vec2::new(1.5, 1.5)));
            ctx.attach(id, InputController::new());
            self.player = Some(id);
        }

        fn level_loaded(&mut self, ctx: &mut EngineContext, spawn: Option<SpawnPoint>) {
            let (Some(id), Some(spawn)) = (self.player, spawn) else {
                return;
            };
            if let Some(player) = ctx.scene.get_mut(id) {
                player.pos = spawn.pos();
                player.facing = spawn.facing;
            }
        }
    }

    fn runner() -> GameRunner<Walker> {
        let mut r = GameRunner::new(Walker::default());
        r.init();
        r
    }

    fn player(r: &GameRunner<Walker>) -> &Entity {
        r.ctx().scene.find_by_tag("player").unwrap()
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = GameRunner::new(Walker::default());
        r.push_input(InputEvent::KeyDown { key_code: KEY_UP });
        r.tick(1.0);
        assert_eq!(r.pose_count(), 0);
        assert!(r.ctx().scene.is_empty());
    }

    #[test]
    fn init_exports_initial_pose() {
        let r = runner();
        assert_eq!(r.pose_count(), 1);
        assert_eq!(r.max_poses(), 4);
        assert!(r.ctx().behaviours.get(gridcrawl::BehaviourId(0)).unwrap().is_initialized());
    }

    #[test]
    fn held_key_applies_once_per_fixed_step() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: KEY_LEFT });
        r.tick(0.5); // two steps of 0.25
        assert_eq!(player(&r).facing, -8.0);

        // Still held with no new events.
        r.tick(0.25);
        assert_eq!(player(&r).facing, -12.0);

        r.push_input(InputEvent::KeyUp { key_code: KEY_LEFT });
        r.tick(0.25);
        assert_eq!(player(&r).facing, -12.0);
    }

    #[test]
    fn zero_fixed_dt_falls_back_to_default() {
        let mut r = GameRunner::new(Walker { fixed_dt: Some(0.0), ..Walker::default() });
        r.init();
        assert_eq!(r.config().fixed_dt, GameConfig::default().fixed_dt);

        r.push_input(InputEvent::KeyDown { key_code: KEY_LEFT });
        r.tick(GameConfig::default().fixed_dt);
        assert_eq!(player(&r).facing, -4.0);
    }

    #[test]
    fn blur_releases_keys() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: KEY_UP });
        r.push_input(InputEvent::ReleaseAll);
        r.tick(0.25);
        assert_eq!(player(&r).pos, Vec2::new(1.5, 1.5));
        assert!(r.ctx().keys.is_empty());
    }

    #[test]
    fn load_level_moves_player_to_spawn() {
        let mut r = runner();
        r.ctx_mut().scene.get_mut(EntityId(1)).unwrap().pos = Vec2::new(9.0, 9.0);
        assert!(r.load_level(&hall()));
        assert_eq!(player(&r).pos, Vec2::new(1.5, 1.5));

        assert!(!r.load_level("{"));
        assert_eq!(r.ctx().world.layer_count(), 1);
    }

    #[test]
    fn walking_stops_at_hall_end() {
        let mut r = runner();
        assert!(r.load_level(&hall()));
        r.push_input(InputEvent::KeyDown { key_code: KEY_UP });
        for _ in 0..200 {
            r.tick(0.25);
        }
        let x = player(&r).pos.x;
        assert!(x > 4.0 && x < 5.0 - 0.3 + 1e-4, "x = {}", x);

        let floats = unsafe { std::slice::from_raw_parts(r.poses_ptr(), 4) };
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[1], x);
    }
}

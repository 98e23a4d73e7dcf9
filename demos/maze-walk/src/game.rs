use gridcrawl::*;
use glam::Vec2;

/// Built-in level, used until the host loads another.
fn maze_level() -> String {
    serde_json::json!({
        "tile_size": 1.0,
        "layers": [{
            "name": "walls",
            "rows": [
                "##########",
                "#....#...#",
                "#.##.#.#.#",
                "#.#....#.#",
                "#.#.####.#",
                "#...#....#",
                "##########"
            ]
        }],
        "spawn": { "x": 1.5, "y": 1.5, "facing": 90 }
    })
    .to_string()
}

const FALLBACK_SPAWN: Vec2 = Vec2::new(1.5, 1.5);

/// Arrow keys walk a single player around a maze.
#[derive(Default)]
pub struct MazeWalk {
    player: Option<EntityId>,
}

impl MazeWalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }
}

impl Game for MazeWalk {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_poses: 16,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let spawn = match ctx.load_level(&maze_level()) {
            Ok(spawn) => spawn,
            Err(err) => {
                log::error!("maze-walk: built-in level rejected: {}", err);
                None
            }
        };

        let id = ctx.next_id();
        let mut player = Entity::new(id).with_tag("player").with_pos(FALLBACK_SPAWN);
        if let Some(spawn) = spawn {
            player = player.with_pos(spawn.pos()).with_facing(spawn.facing);
        }
        ctx.spawn(player);
        ctx.attach(id, InputController::with_config(self.config().controller));
        self.player = Some(id);
    }

    fn level_loaded(&mut self, ctx: &mut EngineContext, spawn: Option<SpawnPoint>) {
        let Some(id) = self.player() else {
            return;
        };
        if let Some(player) = ctx.scene.get_mut(id) {
            let spawn = spawn.unwrap_or(SpawnPoint {
                x: FALLBACK_SPAWN.x,
                y: FALLBACK_SPAWN.y,
                facing: 0.0,
            });
            player.pos = spawn.pos();
            player.facing = spawn.facing;
        }
    }
}

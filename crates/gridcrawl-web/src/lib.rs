pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - wasm-bindgen exports: `game_init`, `game_tick`, key handlers,
///   `game_load_level` and the pose accessors
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use gridcrawl::*;
///
/// mod game;
/// use game::MyGame;
///
/// gridcrawl_web::export_game!(MyGame, "my-game");
/// ```
///
/// The game type must provide `fn new() -> Self`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        /// Call from the window `blur` handler so keys don't stick.
        #[wasm_bindgen]
        pub fn game_blur() {
            with_runner(|r| r.push_input(InputEvent::ReleaseAll));
        }

        #[wasm_bindgen]
        pub fn game_load_level(json: &str) -> bool {
            with_runner(|r| r.load_level(json))
        }

        // ---- Pose accessors ----

        #[wasm_bindgen]
        pub fn get_poses_ptr() -> *const f32 {
            with_runner(|r| r.poses_ptr())
        }

        #[wasm_bindgen]
        pub fn get_pose_count() -> u32 {
            with_runner(|r| r.pose_count())
        }

        #[wasm_bindgen]
        pub fn get_max_poses() -> u32 {
            with_runner(|r| r.max_poses())
        }
    };
}

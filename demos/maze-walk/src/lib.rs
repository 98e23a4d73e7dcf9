use wasm_bindgen::prelude::*;
use gridcrawl::*;

mod game;
use game::MazeWalk;

gridcrawl_web::export_game!(MazeWalk, "maze-walk");

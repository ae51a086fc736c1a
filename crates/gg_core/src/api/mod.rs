pub mod json_api;

pub use json_api::{generate_game, generate_game_json, rng_for, GameRequest, GameResponse};

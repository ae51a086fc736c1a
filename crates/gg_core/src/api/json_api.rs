use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{error_codes, GenError, Result};
use crate::model::{GameContext, GameStyle};
use crate::sampler::{GameStep, GenerationRequest};

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn gen_err(err: GenError) -> String {
    err_code(err.code(), err)
}

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub start_action: String,
    /// Target duration in minutes.
    pub game_duration: u32,
    /// "attacking" | "defensive" | "neutral"
    #[serde(default)]
    pub game_style: Option<String>,
    /// Fixed seed for reproducible output; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_sequence: Vec<GameStep>,
}

/// Seeded generator when `seed` is given, entropy-seeded otherwise.
pub fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Generate one sequence from loosely typed parameters.
pub fn generate_game(
    context: &GameContext,
    start_action: &str,
    game_duration: u32,
    game_style: &str,
    seed: Option<u64>,
) -> Result<Vec<GameStep>> {
    let style: GameStyle = game_style.parse()?;
    let request = GenerationRequest::new(start_action, game_duration, style);
    let mut rng = rng_for(seed);
    Ok(context.sampler().generate(&request, &mut rng)?.into_steps())
}

/// JSON in, JSON out. Errors are `"<CODE>: <message>"` strings.
///
/// Request: `{"start_action": "pass", "game_duration": 90, "game_style": "attacking", "seed": 7}`
/// Response: `{"game_sequence": [{"label": "pass", "norm": [...]}, ...]}`
pub fn generate_game_json(context: &GameContext, request_json: &str) -> std::result::Result<String, String> {
    let request: GameRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("Invalid JSON request: {e}")))?;

    let style = request.game_style.as_deref().unwrap_or("neutral");
    let game_sequence = generate_game(context, &request.start_action, request.game_duration, style, request.seed)
        .map_err(gen_err)?;

    serde_json::to_string(&GameResponse { game_sequence })
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("Failed to serialize response: {e}")))
}

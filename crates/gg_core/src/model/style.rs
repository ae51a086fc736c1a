use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Play tendency applied to transition probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStyle {
    Attacking,
    Defensive,
    #[default]
    Neutral,
}

const ATTACKING_FACTORS: &[(&str, f64)] = &[("shot", 2.0), ("pass", 2.0), ("dribble", 1.5), ("cross", 2.0)];
const DEFENSIVE_FACTORS: &[(&str, f64)] = &[("tackle", 2.0), ("run", 2.0), ("pass", 0.5), ("dribble", 0.5)];

impl GameStyle {
    pub const ALL: [GameStyle; 3] = [GameStyle::Attacking, GameStyle::Defensive, GameStyle::Neutral];

    /// Per-label multipliers. Neutral has none.
    pub fn adjustment_factors(&self) -> &'static [(&'static str, f64)] {
        match self {
            GameStyle::Attacking => ATTACKING_FACTORS,
            GameStyle::Defensive => DEFENSIVE_FACTORS,
            GameStyle::Neutral => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStyle::Attacking => "attacking",
            GameStyle::Defensive => "defensive",
            GameStyle::Neutral => "neutral",
        }
    }
}

impl fmt::Display for GameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStyle {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attacking" => Ok(GameStyle::Attacking),
            "defensive" => Ok(GameStyle::Defensive),
            "neutral" => Ok(GameStyle::Neutral),
            other => Err(GenError::InvalidRequest(format!(
                "unknown game style '{other}' (expected attacking, defensive or neutral)"
            ))),
        }
    }
}

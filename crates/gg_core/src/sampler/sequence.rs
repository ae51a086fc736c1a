use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::model::GameStyle;

/// One generated action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStep {
    pub label: String,
    #[serde(rename = "norm")]
    pub measurements: Vec<f64>,
}

/// Append-only output of one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameSequence {
    steps: Vec<GameStep>,
    /// Accumulated gait length, in seconds.
    duration_seconds: f64,
}

impl GameSequence {
    pub(crate) fn push(&mut self, step: GameStep, gait: f64) {
        self.steps.push(step);
        self.duration_seconds += gait;
    }

    pub fn steps(&self) -> &[GameStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<GameStep> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.label.as_str())
    }

    /// Label `n` steps before the last one (`0` is the last step).
    pub fn label_from_end(&self, n: usize) -> Option<&str> {
        self.steps.len().checked_sub(n + 1).map(|i| self.steps[i].label.as_str())
    }

    pub fn last_label(&self) -> Option<&str> {
        self.label_from_end(0)
    }
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub start_action: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub style: GameStyle,
}

impl GenerationRequest {
    pub fn new(start_action: impl Into<String>, duration_minutes: u32, style: GameStyle) -> Self {
        Self { start_action: start_action.into(), duration_minutes, style }
    }

    pub fn target_seconds(&self) -> f64 {
        f64::from(self.duration_minutes) * 60.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(GenError::InvalidRequest("duration must be at least 1 minute".into()));
        }
        if self.start_action.trim().is_empty() {
            return Err(GenError::InvalidRequest("start action must not be empty".into()));
        }
        Ok(())
    }
}

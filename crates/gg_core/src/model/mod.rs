//! Generative model: transition matrix, action profiles and play style.

pub mod context;
pub mod probability;
pub mod profile;
pub mod style;
pub mod transition;

pub use context::{ContextSummary, GameContext};
pub use probability::ProbabilityValidator;
pub use profile::{
    ActionProfile, GaitProfile, LogNormalParams, MeasurementProfile, ProfileSet, MAX_GAIT,
    MAX_GAIT_ATTEMPTS, MIN_GAIT,
};
pub use style::GameStyle;
pub use transition::TransitionMatrix;

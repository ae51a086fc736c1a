//! Sequence generation over a fitted [`GameContext`](crate::model::GameContext).

#[allow(clippy::module_inception)]
pub mod sampler;
pub mod sequence;

pub use sampler::{SequenceSampler, NO_REPEAT_LABELS};
pub use sequence::{GameSequence, GameStep, GenerationRequest};

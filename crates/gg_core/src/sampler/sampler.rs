//! Markov-chain sequence generation.
//!
//! ```text
//! Start ──▶ Sampling ──(duration ≥ target)──▶ Terminated
//!              ▲   │
//!              └───┘ (duration < target)
//! ```

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use tracing::{info, trace};

use super::sequence::{GameSequence, GameStep, GenerationRequest};
use crate::error::{GenError, Result};
use crate::model::{GameContext, GameStyle, ProbabilityValidator};

/// Labels that may not repeat with exactly one action in between.
pub const NO_REPEAT_LABELS: [&str; 2] = ["shot", "cross"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SamplerState {
    Start,
    Sampling,
    Terminated,
}

/// Walks the transition matrix of a [`GameContext`].
///
/// The sampler only borrows the context; every call to
/// [`generate`](Self::generate) is independent and draws from the RNG it is
/// given, in step order.
#[derive(Debug, Clone, Copy)]
pub struct SequenceSampler<'a> {
    context: &'a GameContext,
    validator: ProbabilityValidator,
}

impl<'a> SequenceSampler<'a> {
    pub fn new(context: &'a GameContext) -> Self {
        Self { context, validator: ProbabilityValidator::new() }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GameSequence> {
        request.validate()?;
        let target = request.target_seconds();
        let mut sequence = GameSequence::default();
        let mut state = SamplerState::Start;

        loop {
            match state {
                SamplerState::Start => self.start(&request.start_action, &mut sequence, rng)?,
                SamplerState::Sampling => {
                    let label = self.next_label(&sequence, request.style, rng)?;
                    self.append(&label, &mut sequence, rng)?;
                }
                SamplerState::Terminated => break,
            }
            state = if sequence.duration_seconds() >= target {
                SamplerState::Terminated
            } else {
                SamplerState::Sampling
            };
        }

        info!(
            start = %request.start_action,
            style = %request.style,
            steps = sequence.len(),
            duration_seconds = sequence.duration_seconds(),
            "generated game sequence"
        );
        Ok(sequence)
    }

    fn start<R: Rng + ?Sized>(
        &self,
        start_action: &str,
        sequence: &mut GameSequence,
        rng: &mut R,
    ) -> Result<()> {
        let invalid = || GenError::InvalidAction { label: start_action.to_string() };
        if !self.context.profiles().contains(start_action) {
            return Err(invalid());
        }
        if !self.context.transitions().has_row(start_action) {
            return Err(invalid());
        }
        self.append(start_action, sequence, rng)
    }

    fn append<R: Rng + ?Sized>(
        &self,
        label: &str,
        sequence: &mut GameSequence,
        rng: &mut R,
    ) -> Result<()> {
        let profile = self.context.profiles().require(label)?;
        let measurements = profile.sample_measurements(rng)?;
        let gait = profile.sample_gait(rng)?;
        sequence.push(GameStep { label: label.to_string(), measurements }, gait);
        trace!(label, gait, total = sequence.duration_seconds(), "appended step");
        Ok(())
    }

    /// Transition row of `label` after style multipliers, renormalized.
    ///
    /// Multipliers for labels that are not in the column set are skipped.
    pub fn adjusted_distribution(&self, label: &str, style: GameStyle) -> Result<Vec<f64>> {
        let transitions = self.context.transitions();
        let row = transitions
            .row(label)
            .ok_or_else(|| GenError::NoTransitionData { label: label.to_string() })?;

        let mut weights = row.to_vec();
        for (target, factor) in style.adjustment_factors() {
            if let Some(i) = transitions.column_index(target) {
                weights[i] *= factor;
            }
        }

        self.validator
            .normalize(&weights)
            .map_err(|e| GenError::degenerate(label, format!("transition row: {e}")))
    }

    fn next_label<R: Rng + ?Sized>(
        &self,
        sequence: &GameSequence,
        style: GameStyle,
        rng: &mut R,
    ) -> Result<String> {
        let current = sequence
            .last_label()
            .ok_or_else(|| GenError::InvalidRequest("sequence has no start action".into()))?;
        let probabilities = self.adjusted_distribution(current, style)?;
        let columns = self.context.transitions().columns();

        let index = WeightedIndex::new(&probabilities)
            .map_err(|e| GenError::degenerate(current, format!("weighted choice: {e}")))?
            .sample(rng);
        let drawn = columns[index].as_str();

        // The step two before the new one is the current second-to-last.
        if sequence.label_from_end(1) == Some(drawn) && NO_REPEAT_LABELS.contains(&drawn) {
            let alternatives: Vec<&String> = columns.iter().filter(|c| c.as_str() != drawn).collect();
            let redrawn = alternatives.choose(rng).ok_or_else(|| {
                GenError::degenerate(drawn, "no alternative action to break the repetition")
            })?;
            trace!(drawn, redrawn = %redrawn, "anti-repetition redraw");
            return Ok(redrawn.to_string());
        }

        Ok(drawn.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Every record carries 50 measurements, i.e. exactly one second of gait.
    fn context(matches: Vec<Vec<&str>>) -> GameContext {
        let norm: Vec<f64> = (1..=50).map(f64::from).collect();
        let dataset = Dataset::from_matches(
            matches
                .into_iter()
                .map(|labels| labels.into_iter().map(|l| (l, norm.clone())).collect::<Vec<_>>()),
        )
        .unwrap();
        GameContext::build(&dataset).unwrap()
    }

    fn request(start: &str, minutes: u32, style: GameStyle) -> GenerationRequest {
        GenerationRequest::new(start, minutes, style)
    }

    #[test]
    fn test_reaches_target_duration() {
        let ctx = context(vec![vec!["pass", "shot", "pass", "dribble", "pass", "shot"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let sequence = ctx.sampler().generate(&request("pass", 2, GameStyle::Neutral), &mut rng).unwrap();

        assert_eq!(sequence.steps()[0].label, "pass");
        assert_eq!(sequence.len(), 120);
        assert_eq!(sequence.duration_seconds(), 120.0);
        assert!(sequence.steps().iter().all(|s| s.measurements.len() == 50));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let ctx = context(vec![vec!["pass", "shot", "pass", "cross", "tackle", "pass", "run", "shot"]]);
        let req = request("pass", 1, GameStyle::Attacking);
        let a = ctx.sampler().generate(&req, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        let b = ctx.sampler().generate(&req, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a.steps(), b.steps());
    }

    #[test]
    fn test_shot_never_repeats_two_back() {
        // pass is always followed by shot and shot by pass
        let ctx = context(vec![vec!["shot", "pass", "shot", "pass", "shot", "pass"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let sequence = ctx.sampler().generate(&request("shot", 1, GameStyle::Neutral), &mut rng).unwrap();
        let labels: Vec<&str> = sequence.labels().collect();

        assert_eq!(&labels[..3], &["shot", "pass", "pass"]);
        for i in 2..labels.len() {
            if labels[i] == "shot" {
                assert_ne!(labels[i - 2], "shot", "shot repeated two back at step {i}");
            }
        }
    }

    #[test]
    fn test_cross_never_repeats_two_back() {
        let ctx = context(vec![vec!["cross", "run", "cross", "run", "cross", "run"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sequence = ctx.sampler().generate(&request("cross", 1, GameStyle::Neutral), &mut rng).unwrap();
        let labels: Vec<&str> = sequence.labels().collect();

        for i in 2..labels.len() {
            if labels[i] == "cross" {
                assert_ne!(labels[i - 2], "cross");
            }
        }
    }

    #[test]
    fn test_other_labels_may_repeat() {
        let ctx = context(vec![vec!["run", "tackle", "run", "tackle", "run"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let sequence = ctx.sampler().generate(&request("run", 1, GameStyle::Neutral), &mut rng).unwrap();
        let labels: Vec<&str> = sequence.labels().collect();
        assert_eq!(&labels[..4], &["run", "tackle", "run", "tackle"]);
    }

    #[test]
    fn test_terminal_label_fails_mid_generation() {
        let ctx = context(vec![vec!["pass", "run"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = ctx.sampler().generate(&request("pass", 1, GameStyle::Neutral), &mut rng).unwrap_err();
        assert!(matches!(err, GenError::NoTransitionData { ref label } if label == "run"));
    }

    #[test]
    fn test_invalid_start_action() {
        let ctx = context(vec![vec!["pass", "run"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = ctx.sampler().generate(&request("header", 1, GameStyle::Neutral), &mut rng).unwrap_err();
        assert!(matches!(err, GenError::InvalidAction { ref label } if label == "header"));

        // known label without outgoing transitions
        let err = ctx.sampler().generate(&request("run", 1, GameStyle::Neutral), &mut rng).unwrap_err();
        assert!(matches!(err, GenError::InvalidAction { .. }));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let ctx = context(vec![vec!["pass", "shot", "pass"]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = ctx.sampler().generate(&request("pass", 0, GameStyle::Neutral), &mut rng).unwrap_err();
        assert!(matches!(err, GenError::InvalidRequest(_)));
    }

    #[test]
    fn test_adjusted_distribution() {
        // pass -> {shot, tackle, run, dribble} uniformly
        let ctx = context(vec![
            vec!["pass", "shot"],
            vec!["pass", "tackle"],
            vec!["pass", "run"],
            vec!["pass", "dribble"],
        ]);
        let sampler = ctx.sampler();
        let columns = ctx.transitions().columns().to_vec();
        assert_eq!(columns, vec!["dribble", "run", "shot", "tackle"]);

        let neutral = sampler.adjusted_distribution("pass", GameStyle::Neutral).unwrap();
        assert_eq!(neutral, vec![0.25; 4]);

        // attacking: dribble 1.5, shot 2 (pass and cross are not columns)
        let attacking = sampler.adjusted_distribution("pass", GameStyle::Attacking).unwrap();
        let total = 1.5 + 1.0 + 2.0 + 1.0;
        let expected = [1.5 / total, 1.0 / total, 2.0 / total, 1.0 / total];
        for (a, e) in attacking.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }

        // defensive: dribble 0.5, run 2, tackle 2
        let defensive = sampler.adjusted_distribution("pass", GameStyle::Defensive).unwrap();
        let total = 0.5 + 2.0 + 1.0 + 2.0;
        assert!((defensive[0] - 0.5 / total).abs() < 1e-12);
        assert!((defensive[3] - 2.0 / total).abs() < 1e-12);
        assert!((defensive.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjusted_distribution_without_row() {
        let ctx = context(vec![vec!["pass", "run"]]);
        let err = ctx.sampler().adjusted_distribution("run", GameStyle::Attacking).unwrap_err();
        assert!(matches!(err, GenError::NoTransitionData { .. }));
    }

    #[test]
    fn test_degenerate_profile_aborts_generation() {
        let dataset = Dataset::from_matches(vec![vec![
            ("pass", vec![1.0; 50]),
            ("idle", vec![0.0; 50]),
            ("pass", vec![1.0; 50]),
        ]])
        .unwrap();
        let ctx = GameContext::build(&dataset).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = ctx.generate("pass", 1, GameStyle::Neutral, &mut rng).unwrap_err();
        assert!(matches!(err, GenError::DegenerateDistribution { ref label, .. } if label == "idle"));
    }
}

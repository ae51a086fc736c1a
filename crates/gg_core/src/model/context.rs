//! Immutable model context built once from a dataset snapshot.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use super::profile::{ActionProfile, ProfileSet};
use super::style::GameStyle;
use super::transition::TransitionMatrix;
use crate::data::{
    resolve_files_from_env, Dataset, DatasetProvider, JsonFileSource, FILES_PATH_ENV, FILES_PATH_ENV_ALIAS,
};
use crate::error::{GenError, Result};
use crate::sampler::{GameSequence, GenerationRequest, SequenceSampler};

/// Transition matrix and action profiles fitted from the same dataset.
///
/// Nothing mutates a context after [`build`](Self::build); share it by
/// reference or `Arc` across concurrent generation requests.
#[derive(Debug, Clone)]
pub struct GameContext {
    transitions: TransitionMatrix,
    profiles: ProfileSet,
    record_count: usize,
    match_count: usize,
}

impl GameContext {
    pub fn build(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(GenError::MalformedDataset("dataset contains no records".into()));
        }

        let transitions = TransitionMatrix::build(dataset);
        transitions.validate().map_err(GenError::MalformedDataset)?;
        let profiles = ProfileSet::fit(dataset);

        info!(
            records = dataset.len(),
            matches = dataset.match_count(),
            labels = profiles.len(),
            transition_rows = transitions.row_labels().count(),
            "built game context"
        );

        Ok(Self {
            transitions,
            profiles,
            record_count: dataset.len(),
            match_count: dataset.match_count(),
        })
    }

    pub fn from_provider<P: DatasetProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::build(&provider.load()?)
    }

    /// Build from the match files listed in `GG_FILES_PATH` / `FILES_PATH`.
    pub fn from_env() -> Result<Self> {
        let files = resolve_files_from_env();
        if files.is_empty() {
            return Err(GenError::MalformedDataset(format!(
                "no dataset files configured (set {FILES_PATH_ENV} or {FILES_PATH_ENV_ALIAS})"
            )));
        }
        Self::from_provider(&JsonFileSource::new(files))
    }

    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn profile(&self, label: &str) -> Option<&ActionProfile> {
        self.profiles.get(label)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn sampler(&self) -> SequenceSampler<'_> {
        SequenceSampler::new(self)
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        start_action: &str,
        duration_minutes: u32,
        style: GameStyle,
        rng: &mut R,
    ) -> Result<GameSequence> {
        let request = GenerationRequest::new(start_action, duration_minutes, style);
        self.sampler().generate(&request, rng)
    }

    pub fn summary(&self) -> ContextSummary<'_> {
        ContextSummary {
            records: self.record_count,
            matches: self.match_count,
            transitions: self.transitions.to_nested(),
            profiles: &self.profiles,
        }
    }
}

/// Serializable view of a context, for inspection tooling.
#[derive(Debug, Serialize)]
pub struct ContextSummary<'a> {
    pub records: usize,
    pub matches: usize,
    pub transitions: BTreeMap<&'a str, BTreeMap<&'a str, f64>>,
    pub profiles: &'a ProfileSet,
}

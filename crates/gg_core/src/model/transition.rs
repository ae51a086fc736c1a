//! Empirical action-to-action transition matrix.
//!
//! Counts consecutive `(label, next)` pairs inside each match and normalizes
//! every row over the shared column set. Columns are every label seen at
//! least once as a successor, in sorted order, so a seeded sampler walks
//! them in the same order on every build.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::probability::ProbabilityValidator;
use crate::data::{ActionRecord, Dataset};

#[derive(Debug, Clone, Serialize)]
pub struct TransitionMatrix {
    /// Successor labels, sorted.
    columns: Vec<String>,
    /// Raw pair counts, aligned with `columns`.
    counts: BTreeMap<String, Vec<u64>>,
    /// Row-stochastic probabilities, aligned with `columns`. Labels without
    /// any observed successor have no entry.
    rows: BTreeMap<String, Vec<f64>>,
}

impl TransitionMatrix {
    pub fn build(dataset: &Dataset) -> Self {
        Self::from_matches(dataset.matches())
    }

    /// Build from per-match record runs. Pairs never span two runs.
    pub fn from_matches<'a, I>(matches: I) -> Self
    where
        I: IntoIterator<Item = &'a [ActionRecord]>,
    {
        let mut pair_counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
        for records in matches {
            for pair in records.windows(2) {
                *pair_counts.entry((pair[0].label.as_str(), pair[1].label.as_str())).or_default() += 1;
            }
        }

        let columns: Vec<String> = pair_counts
            .keys()
            .map(|(_, next)| *next)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let column_index: BTreeMap<&str, usize> =
            columns.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

        let mut counts: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        for ((from, to), n) in &pair_counts {
            let row = counts.entry(from.to_string()).or_insert_with(|| vec![0; columns.len()]);
            row[column_index[to]] = *n;
        }

        let rows = counts
            .iter()
            .filter_map(|(label, row)| {
                let total: u64 = row.iter().sum();
                if total == 0 {
                    return None;
                }
                let probs = row.iter().map(|&n| n as f64 / total as f64).collect();
                Some((label.clone(), probs))
            })
            .collect();

        Self { columns, counts, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Probability row for `label`, aligned with [`columns`](Self::columns).
    /// `None` when the label never precedes another action.
    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    pub fn has_row(&self, label: &str) -> bool {
        self.rows.contains_key(label)
    }

    pub fn row_labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn probability(&self, from: &str, to: &str) -> f64 {
        match (self.row(from), self.column_index(to)) {
            (Some(row), Some(i)) => row[i],
            _ => 0.0,
        }
    }

    /// Raw number of observed `from → to` transitions.
    pub fn count(&self, from: &str, to: &str) -> u64 {
        match (self.counts.get(from), self.column_index(to)) {
            (Some(row), Some(i)) => row[i],
            _ => 0,
        }
    }

    /// Nested `from → (to → probability)` view, zero entries included.
    pub fn to_nested(&self) -> BTreeMap<&str, BTreeMap<&str, f64>> {
        self.rows
            .iter()
            .map(|(from, row)| {
                let inner = self.columns.iter().map(String::as_str).zip(row.iter().copied()).collect();
                (from.as_str(), inner)
            })
            .collect()
    }

    /// Check that every defined row is a probability distribution.
    pub fn validate(&self) -> Result<(), String> {
        let validator = ProbabilityValidator::new();
        for (label, row) in &self.rows {
            validator
                .validate_distribution(row)
                .map_err(|e| format!("row '{label}': {e}"))?;
        }
        Ok(())
    }
}

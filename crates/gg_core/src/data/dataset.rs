//! Match dataset snapshot.
//!
//! A dataset is the concatenation of one or more recorded matches. Records
//! are grouped by `match_id` and kept in temporal order within each match;
//! the models never reorder them.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::record::{ActionRecord, RawActionEntry};
use crate::error::{GenError, Result};

/// Anything that can hand out a dataset snapshot.
pub trait DatasetProvider {
    fn load(&self) -> Result<Dataset>;
}

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ActionRecord>,
}

impl Dataset {
    /// Validate and wrap records that are already grouped by match.
    ///
    /// Fails when the list is empty, a match id is 0, or a match id
    /// reappears after another match started.
    pub fn from_records(records: Vec<ActionRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(GenError::MalformedDataset("dataset contains no records".into()));
        }

        let mut seen = BTreeSet::new();
        let mut current = None;
        for record in &records {
            if record.match_id == 0 {
                return Err(GenError::MalformedDataset(format!(
                    "record '{}' has match id 0 (ids start at 1)",
                    record.label
                )));
            }
            if current != Some(record.match_id) {
                if !seen.insert(record.match_id) {
                    return Err(GenError::MalformedDataset(format!(
                        "match {} is not contiguous",
                        record.match_id
                    )));
                }
                current = Some(record.match_id);
            }
        }

        Ok(Self { records })
    }

    /// Build a dataset from per-match label/measurement lists. Match ids are
    /// assigned from 1 in the given order.
    pub fn from_matches<L, I, M>(matches: M) -> Result<Self>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, Vec<f64>)>,
        M: IntoIterator<Item = I>,
    {
        let records = matches
            .into_iter()
            .enumerate()
            .flat_map(|(i, actions)| {
                let match_id = i as u32 + 1;
                actions
                    .into_iter()
                    .map(move |(label, measurements)| ActionRecord::new(match_id, label, measurements))
            })
            .collect();
        Self::from_records(records)
    }

    /// Parse one match file body: a JSON array of `{label, norm}` objects.
    pub fn parse_match_json(match_id: u32, json: &str) -> Result<Vec<ActionRecord>> {
        let entries: Vec<RawActionEntry> = serde_json::from_str(json).map_err(|e| {
            GenError::MalformedDataset(format!("match {match_id}: invalid JSON: {e}"))
        })?;
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_record(match_id, index))
            .collect()
    }

    /// Read match files in order; the n-th file becomes match `n` (1-based).
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut records = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            let match_id = i as u32 + 1;
            let body = fs::read_to_string(path)
                .map_err(|source| GenError::Io { path: path.to_path_buf(), source })?;
            let parsed = Self::parse_match_json(match_id, &body)?;
            debug!(path = %path.display(), match_id, records = parsed.len(), "loaded match file");
            records.extend(parsed);
        }
        Self::from_records(records)
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records split into per-match runs, in dataset order.
    pub fn matches(&self) -> impl Iterator<Item = &[ActionRecord]> {
        self.records.chunk_by(|a, b| a.match_id == b.match_id)
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    /// Every distinct label, sorted.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn records_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ActionRecord> + 'a {
        self.records.iter().filter(move |r| r.label == label)
    }
}

impl DatasetProvider for Dataset {
    fn load(&self) -> Result<Dataset> {
        Ok(self.clone())
    }
}

/// Match files on disk, one JSON array per match.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    paths: Vec<PathBuf>,
}

impl JsonFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl DatasetProvider for JsonFileSource {
    fn load(&self) -> Result<Dataset> {
        Dataset::load_files(&self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_empty_dataset_is_malformed() {
        let err = Dataset::from_records(vec![]).unwrap_err();
        assert!(matches!(err, GenError::MalformedDataset(_)));
    }

    #[test]
    fn test_non_contiguous_match_rejected() {
        let records = vec![
            ActionRecord::new(1, "pass", vec![1.0]),
            ActionRecord::new(2, "shot", vec![1.0]),
            ActionRecord::new(1, "run", vec![1.0]),
        ];
        let err = Dataset::from_records(records).unwrap_err();
        assert!(err.to_string().contains("match 1 is not contiguous"));
    }

    #[test]
    fn test_zero_match_id_rejected() {
        let err = Dataset::from_records(vec![ActionRecord::new(0, "pass", vec![])]).unwrap_err();
        assert!(matches!(err, GenError::MalformedDataset(_)));
    }

    #[test]
    fn test_from_matches_assigns_ids() {
        let dataset = Dataset::from_matches(vec![
            vec![("pass", vec![1.0]), ("shot", vec![2.0])],
            vec![("tackle", vec![3.0])],
        ])
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.match_count(), 2);
        let ids: Vec<u32> = dataset.records().iter().map(|r| r.match_id).collect();
        assert_eq!(ids, vec![1, 1, 2]);
        assert_eq!(dataset.labels().into_iter().collect::<Vec<_>>(), vec!["pass", "shot", "tackle"]);
        assert_eq!(dataset.records_for("shot").count(), 1);
    }

    #[test]
    fn test_load_files_numbers_matches_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("match_1.json");
        let second = dir.path().join("match_2.json");
        writeln!(
            fs::File::create(&first).unwrap(),
            r#"[{{"label": "pass", "norm": [1.0, 2.0]}}, {{"label": "shot", "norm": [3.0]}}]"#
        )
        .unwrap();
        writeln!(fs::File::create(&second).unwrap(), r#"[{{"label": "cross", "norm": [0.5]}}]"#)
            .unwrap();

        let dataset = JsonFileSource::new(vec![first, second]).load().unwrap();
        assert_eq!(dataset.match_count(), 2);
        assert_eq!(dataset.records()[2], ActionRecord::new(2, "cross", vec![0.5]));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load_files(&[dir.path().join("absent.json")]).unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }

    #[test]
    fn test_load_no_files_is_malformed() {
        let err = JsonFileSource::default().load().unwrap_err();
        assert!(matches!(err, GenError::MalformedDataset(_)));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = Dataset::parse_match_json(1, r#"{"label": "pass"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}

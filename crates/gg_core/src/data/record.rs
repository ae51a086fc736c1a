use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// One recorded action instance inside a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub match_id: u32,
    pub label: String,
    #[serde(rename = "norm")]
    pub measurements: Vec<f64>,
}

impl ActionRecord {
    pub fn new(match_id: u32, label: impl Into<String>, measurements: Vec<f64>) -> Self {
        Self { match_id, label: label.into(), measurements }
    }

    /// Mean and population standard deviation of the measurements.
    ///
    /// An empty measurement list yields `(0.0, 0.0)`.
    pub fn measurement_stats(&self) -> (f64, f64) {
        if self.measurements.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.measurements.len() as f64;
        let mean = self.measurements.iter().sum::<f64>() / n;
        let var = self.measurements.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    /// Duration proxy in seconds.
    pub fn gait_length(&self) -> f64 {
        self.measurements.len() as f64 / GAIT_SCALE
    }
}

/// Measurement samples per second of gait.
pub const GAIT_SCALE: f64 = 50.0;

/// Entry as stored in a match file. Both fields are optional at the serde
/// level so that a missing field surfaces as a dataset error with context
/// instead of a bare parse failure.
#[derive(Debug, Deserialize)]
pub(crate) struct RawActionEntry {
    label: Option<String>,
    norm: Option<Vec<f64>>,
}

impl RawActionEntry {
    pub(crate) fn into_record(self, match_id: u32, index: usize) -> Result<ActionRecord> {
        let label = self.label.ok_or_else(|| {
            GenError::MalformedDataset(format!("match {match_id} entry {index}: missing 'label'"))
        })?;
        if label.trim().is_empty() {
            return Err(GenError::MalformedDataset(format!(
                "match {match_id} entry {index}: empty 'label'"
            )));
        }
        let norm = self.norm.ok_or_else(|| {
            GenError::MalformedDataset(format!("match {match_id} entry {index}: missing 'norm'"))
        })?;
        Ok(ActionRecord::new(match_id, label, norm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_stats_population_std() {
        let record = ActionRecord::new(1, "pass", vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let (mean, std) = record.measurement_stats();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_measurements() {
        let record = ActionRecord::new(1, "run", vec![]);
        assert_eq!(record.measurement_stats(), (0.0, 0.0));
        assert_eq!(record.gait_length(), 0.0);
    }

    #[test]
    fn test_gait_length_scale() {
        let record = ActionRecord::new(1, "run", vec![1.0; 75]);
        assert!((record.gait_length() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_raw_entry_missing_fields() {
        let raw: RawActionEntry = serde_json::from_str(r#"{"norm": [1.0]}"#).unwrap();
        let err = raw.into_record(3, 7).unwrap_err();
        assert!(err.to_string().contains("match 3 entry 7: missing 'label'"));

        let raw: RawActionEntry = serde_json::from_str(r#"{"label": "pass"}"#).unwrap();
        assert!(matches!(raw.into_record(1, 0), Err(GenError::MalformedDataset(_))));
    }

    #[test]
    fn test_raw_entry_ignores_extra_fields() {
        let raw: RawActionEntry =
            serde_json::from_str(r#"{"label": "shot", "norm": [0.5, 1.5], "frame": 12}"#).unwrap();
        let record = raw.into_record(2, 0).unwrap();
        assert_eq!(record, ActionRecord::new(2, "shot", vec![0.5, 1.5]));
    }
}

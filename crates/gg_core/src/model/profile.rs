//! Per-action distributions.
//!
//! Each label gets a measurement profile (log-normal generator plus a fixed
//! output length) and a gait profile (normal distribution of duration).
//!
//! Measurement statistics are aggregated in two levels: every record
//! contributes its own mean and population std, and the label's parameters are
//! the plain averages of those per-record values. Raw samples are never
//! pooled across records.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{ActionRecord, Dataset};
use crate::error::{GenError, Result};

/// Lower bound (inclusive) for a sampled gait length, in seconds.
pub const MIN_GAIT: f64 = 0.1;
/// Upper bound (inclusive) for a sampled gait length, in seconds.
pub const MAX_GAIT: f64 = 3.0;
/// Draws allowed before gait sampling gives up.
pub const MAX_GAIT_ATTEMPTS: usize = 1000;

/// Parameters of the generating log-normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogNormalParams {
    pub mu: f64,
    pub sigma: f64,
}

impl LogNormalParams {
    /// Derive `(mu, sigma)` so that the log-normal has the given mean and std.
    ///
    /// `mean` must be strictly positive and finite; otherwise `ln` of the
    /// ratio is undefined.
    pub fn from_moments(mean: f64, std: f64) -> std::result::Result<Self, String> {
        if mean == 0.0 {
            return Err("average measurement mean is zero".to_string());
        }
        if !mean.is_finite() || mean < 0.0 {
            return Err(format!("average measurement mean {mean} is not positive"));
        }
        if !std.is_finite() || std < 0.0 {
            return Err(format!("average measurement std {std} is invalid"));
        }

        let cv2 = (std / mean).powi(2);
        let mu = (mean / (1.0 + cv2).sqrt()).ln();
        let sigma = (1.0 + cv2).ln().sqrt();
        Ok(Self { mu, sigma })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasurementProfile {
    /// Mean of per-record means.
    pub avg_mean: f64,
    /// Mean of per-record population stds.
    pub avg_std: f64,
    /// Mean record length, truncated.
    pub expected_length: usize,
    /// `None` when `avg_mean` does not admit a log-normal fit.
    pub log_normal: Option<LogNormalParams>,
}

impl MeasurementProfile {
    pub fn fit<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ActionRecord>,
    {
        let mut n = 0usize;
        let mut sum_mean = 0.0;
        let mut sum_std = 0.0;
        let mut sum_len = 0usize;
        for record in records {
            let (mean, std) = record.measurement_stats();
            sum_mean += mean;
            sum_std += std;
            sum_len += record.measurements.len();
            n += 1;
        }
        if n == 0 {
            return None;
        }

        let avg_mean = sum_mean / n as f64;
        let avg_std = sum_std / n as f64;
        let expected_length = (sum_len as f64 / n as f64) as usize;
        let log_normal = LogNormalParams::from_moments(avg_mean, avg_std).ok();

        Some(Self { avg_mean, avg_std, expected_length, log_normal })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaitProfile {
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0 for a single record.
    pub std: f64,
}

impl GaitProfile {
    pub fn fit<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ActionRecord>,
    {
        let gaits: Vec<f64> = records.into_iter().map(ActionRecord::gait_length).collect();
        if gaits.is_empty() {
            return None;
        }

        let n = gaits.len() as f64;
        let mean = gaits.iter().sum::<f64>() / n;
        let std = if gaits.len() > 1 {
            (gaits.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Some(Self { mean, std })
    }
}

/// Fitted distributions for one action label.
#[derive(Debug, Clone, Serialize)]
pub struct ActionProfile {
    pub label: String,
    pub record_count: usize,
    pub measurement: MeasurementProfile,
    pub gait: GaitProfile,
}

impl ActionProfile {
    pub fn fit(label: &str, records: &[&ActionRecord]) -> Option<Self> {
        let measurement = MeasurementProfile::fit(records.iter().copied())?;
        let gait = GaitProfile::fit(records.iter().copied())?;
        Some(Self { label: label.to_string(), record_count: records.len(), measurement, gait })
    }

    pub fn log_norm_mu(&self) -> Option<f64> {
        self.measurement.log_normal.map(|p| p.mu)
    }

    pub fn log_norm_sigma(&self) -> Option<f64> {
        self.measurement.log_normal.map(|p| p.sigma)
    }

    pub fn expected_length(&self) -> usize {
        self.measurement.expected_length
    }

    /// Draw `expected_length` independent log-normal values.
    pub fn sample_measurements<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let params = self.log_normal_params()?;
        let dist = LogNormal::new(params.mu, params.sigma)
            .map_err(|e| GenError::degenerate(&self.label, format!("log-normal({}, {}): {e}", params.mu, params.sigma)))?;
        Ok((0..self.measurement.expected_length).map(|_| dist.sample(rng)).collect())
    }

    /// Draw a gait length in `[MIN_GAIT, MAX_GAIT]` by rejection sampling
    /// `|Normal(mean, std)|`.
    pub fn sample_gait<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        let GaitProfile { mean, std } = self.gait;
        let dist = Normal::new(mean, std)
            .map_err(|e| GenError::degenerate(&self.label, format!("gait normal({mean}, {std}): {e}")))?;

        for _ in 0..MAX_GAIT_ATTEMPTS {
            let gait = dist.sample(rng).abs();
            if (MIN_GAIT..=MAX_GAIT).contains(&gait) {
                return Ok(gait);
            }
        }

        Err(GenError::degenerate(
            &self.label,
            format!(
                "no gait length in [{MIN_GAIT}, {MAX_GAIT}] after {MAX_GAIT_ATTEMPTS} draws \
                 from normal({mean}, {std})"
            ),
        ))
    }

    fn log_normal_params(&self) -> Result<LogNormalParams> {
        match self.measurement.log_normal {
            Some(params) => Ok(params),
            None => {
                // Re-derive to surface the exact reason.
                let reason = LogNormalParams::from_moments(self.measurement.avg_mean, self.measurement.avg_std)
                    .err()
                    .unwrap_or_else(|| "log-normal parameters unavailable".to_string());
                Err(GenError::degenerate(&self.label, reason))
            }
        }
    }
}

/// Profiles for every label in a dataset.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProfileSet {
    profiles: BTreeMap<String, ActionProfile>,
}

impl ProfileSet {
    pub fn fit(dataset: &Dataset) -> Self {
        let mut grouped: BTreeMap<&str, Vec<&ActionRecord>> = BTreeMap::new();
        for record in dataset.records() {
            grouped.entry(record.label.as_str()).or_default().push(record);
        }

        let profiles = grouped
            .into_iter()
            .filter_map(|(label, records)| ActionProfile::fit(label, &records))
            .inspect(|profile| {
                if profile.measurement.log_normal.is_none() {
                    warn!(
                        label = %profile.label,
                        avg_mean = profile.measurement.avg_mean,
                        "measurement profile is degenerate; sampling this action will fail"
                    );
                } else {
                    debug!(
                        label = %profile.label,
                        records = profile.record_count,
                        expected_length = profile.measurement.expected_length,
                        gait_mean = profile.gait.mean,
                        gait_std = profile.gait.std,
                        "fitted action profile"
                    );
                }
            })
            .map(|profile| (profile.label.clone(), profile))
            .collect();

        Self { profiles }
    }

    pub fn get(&self, label: &str) -> Option<&ActionProfile> {
        self.profiles.get(label)
    }

    /// Like [`get`](Self::get), failing with `InvalidAction` for unknown labels.
    pub fn require(&self, label: &str) -> Result<&ActionProfile> {
        self.get(label).ok_or_else(|| GenError::InvalidAction { label: label.to_string() })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.profiles.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn sample_measurements<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Result<Vec<f64>> {
        self.require(label)?.sample_measurements(rng)
    }

    pub fn sample_gait<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Result<f64> {
        self.require(label)?.sample_gait(rng)
    }
}

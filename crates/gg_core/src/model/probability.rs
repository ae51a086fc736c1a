// ============================================================================
// Probability Distribution Validation
// ============================================================================
//
// Contract: transition rows and style-adjusted weights must sum to 1.0
// (within tolerance) with no negative entries.

/// Probability distribution validator
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityValidator {
    /// Tolerance for deviation from 1.0
    tolerance: f64,
}

impl ProbabilityValidator {
    /// Create a new validator with default tolerance (1e-9)
    pub fn new() -> Self {
        Self { tolerance: 1e-9 }
    }

    /// Validate a probability distribution
    ///
    /// # Validation Rules
    /// 1. Distribution must not be empty
    /// 2. All probabilities must be finite and non-negative
    /// 3. Sum must be within tolerance of 1.0
    ///
    /// # Examples
    /// ```
    /// use gg_core::model::probability::ProbabilityValidator;
    ///
    /// let validator = ProbabilityValidator::new();
    /// assert!(validator.validate_distribution(&[0.25, 0.50, 0.25]).is_ok());
    /// assert!(validator.validate_distribution(&[0.25, 0.50, 0.30]).is_err());
    /// assert!(validator.validate_distribution(&[0.25, -0.10, 0.85]).is_err());
    /// ```
    pub fn validate_distribution(&self, probabilities: &[f64]) -> Result<(), String> {
        if probabilities.is_empty() {
            return Err("Empty probability distribution".to_string());
        }

        if let Some(bad) = probabilities.iter().find(|&&p| !p.is_finite() || p < 0.0) {
            return Err(format!("Invalid probability: {}", bad));
        }

        let sum: f64 = probabilities.iter().sum();
        let deviation = (sum - 1.0).abs();

        if deviation > self.tolerance {
            return Err(format!(
                "Probability sum {:.12} deviates from 1.0 by {:.12} (tolerance: {:e})",
                sum, deviation, self.tolerance
            ));
        }

        Ok(())
    }

    /// Scale non-negative weights so they sum to 1.0.
    ///
    /// Unlike [`validate_distribution`](Self::validate_distribution) the input
    /// may be any positive total, e.g. a probability row after per-label
    /// multipliers were applied.
    pub fn normalize(&self, weights: &[f64]) -> Result<Vec<f64>, String> {
        if weights.is_empty() {
            return Err("Empty probability distribution".to_string());
        }

        if let Some(bad) = weights.iter().find(|&&w| !w.is_finite() || w < 0.0) {
            return Err(format!("Invalid weight: {}", bad));
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err("Cannot normalize: sum is zero".to_string());
        }

        Ok(weights.iter().map(|&w| w / sum).collect())
    }
}

impl Default for ProbabilityValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_distribution() {
        let validator = ProbabilityValidator::new();
        assert!(validator.validate_distribution(&[0.25, 0.50, 0.25]).is_ok());
        assert!(validator.validate_distribution(&[1.0]).is_ok());
        assert!(validator.validate_distribution(&[0.0, 1.0, 0.0]).is_ok());
    }

    #[test]
    fn test_distribution_sum_not_one() {
        let validator = ProbabilityValidator::new();
        let err = validator.validate_distribution(&[0.25, 0.50, 0.30]).unwrap_err();
        assert!(err.contains("deviates from 1.0"));
    }

    #[test]
    fn test_rejects_nan_and_empty() {
        let validator = ProbabilityValidator::new();
        assert!(validator.validate_distribution(&[]).is_err());
        assert!(validator.validate_distribution(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_rounding_within_tolerance() {
        let validator = ProbabilityValidator::new();
        assert!(validator.validate_distribution(&[0.1, 0.2, 0.7 + 1e-12]).is_ok());
        assert!(validator.validate_distribution(&[0.1, 0.2, 0.7 + 1e-6]).is_err());
    }

    #[test]
    fn test_normalize_weights() {
        let validator = ProbabilityValidator::new();
        let normalized = validator.normalize(&[2.0, 1.0, 1.0]).unwrap();
        assert_eq!(normalized, vec![0.5, 0.25, 0.25]);
        assert!(validator.validate_distribution(&normalized).is_ok());
    }

    #[test]
    fn test_normalize_zero_sum_fails() {
        let validator = ProbabilityValidator::new();
        assert!(validator.normalize(&[0.0, 0.0]).unwrap_err().contains("sum is zero"));
        assert!(validator.normalize(&[1.0, -1.0]).is_err());
    }
}

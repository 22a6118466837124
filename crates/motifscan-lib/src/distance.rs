//! Weighted motif distance
//!
//! `distance = w_content * content_difference + w_position * position_difference`

use crate::constants::{DEFAULT_WEIGHT_CONTENT, DEFAULT_WEIGHT_POSITION};
use crate::error::{MotifError, Result};
use crate::motif::MotifRecord;
use serde::{Deserialize, Serialize};

/// Weights of the two distance terms
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceWeights {
    /// Weight of the symbol mismatch count
    pub content: f64,
    /// Weight of the start-position offset
    pub position: f64,
}

impl Default for DistanceWeights {
    fn default() -> Self {
        Self {
            content: DEFAULT_WEIGHT_CONTENT,
            position: DEFAULT_WEIGHT_POSITION,
        }
    }
}

impl DistanceWeights {
    /// Create weights, rejecting negative or non-finite values
    pub fn new(content: f64, position: f64) -> Result<Self> {
        let weights = Self { content, position };
        weights.validate()?;
        Ok(weights)
    }

    /// Validate that both weights are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("content", self.content), ("position", self.position)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MotifError::InvalidConfiguration(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Count mismatching symbols, aligned from the start
///
/// Every trailing symbol of the longer content counts as a mismatch.
#[inline]
pub fn content_difference(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}

/// Absolute difference of the start positions
#[inline]
pub fn position_difference(a: &MotifRecord, b: &MotifRecord) -> usize {
    a.start_position().abs_diff(b.start_position())
}

/// Weighted distance between two motif records
pub fn distance(a: &MotifRecord, b: &MotifRecord, weights: &DistanceWeights) -> f64 {
    weights.content * content_difference(a.content(), b.content()) as f64
        + weights.position * position_difference(a, b) as f64
}

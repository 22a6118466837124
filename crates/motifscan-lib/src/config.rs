//! Pipeline configuration
//!
//! One value object carries every tunable of the pipeline: synthetic data
//! shape, codon sets, distance weights, clustering threshold and resources.
//! It is validated once, before any stage runs, and passed explicitly to
//! every stage.

use crate::cluster::ClusterParams;
use crate::codon::CodonSet;
use crate::constants::{
    DEFAULT_DELETION_FRACTION, DEFAULT_NUM_VARIANTS, DEFAULT_PERTURBATION_RATE, DEFAULT_SEED,
    DEFAULT_SEQUENCE_LENGTH,
};
use crate::distance::DistanceWeights;
use crate::error::{MotifError, Result};

/// Configuration parameters for generating, dissecting and clustering
#[derive(Debug, Clone)]
pub struct PipelineConfiguration {
    /// Length of the synthetic base sequence (must be > 0)
    pub sequence_length: usize,

    /// Number of perturbed variants generated besides the base
    pub num_variants: usize,

    /// Per-symbol probability of a perturbation, in [0, 1]
    pub perturbation_rate: f64,

    /// Fraction of perturbations that delete rather than substitute, in [0, 1]
    pub deletion_fraction: f64,

    /// Start and stop codons
    pub codons: CodonSet,

    /// Distance weights
    pub weights: DistanceWeights,

    /// Inclusive clustering threshold
    pub threshold: f64,

    /// Seed for synthetic data generation
    pub seed: u64,

    /// Number of threads for dissection and generation (0 = all available cores)
    pub num_threads: usize,
}

impl Default for PipelineConfiguration {
    fn default() -> Self {
        let params = ClusterParams::default();
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            num_variants: DEFAULT_NUM_VARIANTS,
            perturbation_rate: DEFAULT_PERTURBATION_RATE,
            deletion_fraction: DEFAULT_DELETION_FRACTION,
            codons: CodonSet::default(),
            weights: params.weights,
            threshold: params.threshold,
            seed: DEFAULT_SEED,
            num_threads: 0,
        }
    }
}

impl PipelineConfiguration {
    /// Create a validated configuration with the given codons and clustering parameters
    pub fn new(codons: CodonSet, weights: DistanceWeights, threshold: f64) -> Result<Self> {
        let config = Self {
            codons,
            weights,
            threshold,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Clustering parameters view
    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            threshold: self.threshold,
            weights: self.weights,
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.sequence_length == 0 {
            return Err(MotifError::InvalidConfiguration(
                "sequence length must be positive".to_string(),
            ));
        }

        for (name, value) in [
            ("perturbation rate", self.perturbation_rate),
            ("deletion fraction", self.deletion_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MotifError::InvalidConfiguration(format!(
                    "{} must be in range [0, 1], got {}",
                    name, value
                )));
            }
        }

        self.codons.validate()?;
        self.cluster_params().validate()
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Pipeline Configuration:");
        tracing::info!("  sequence_length = {}", self.sequence_length);
        tracing::info!("  num_variants = {}", self.num_variants);
        tracing::debug!("  perturbation_rate = {}", self.perturbation_rate);
        tracing::debug!("  deletion_fraction = {}", self.deletion_fraction);
        tracing::info!(
            "  start_codons = {}",
            join_codons(self.codons.starts().iter().map(|c| c.as_str()))
        );
        tracing::info!(
            "  stop_codons = {}",
            join_codons(self.codons.stops().iter().map(|c| c.as_str()))
        );
        tracing::info!("  weight_content = {}", self.weights.content);
        tracing::info!("  weight_position = {}", self.weights.position);
        tracing::info!("  threshold = {}", self.threshold);
        tracing::debug!("  seed = {}", self.seed);
        if self.num_threads == 0 {
            tracing::debug!("  num_threads = all available cores");
        } else {
            tracing::debug!("  num_threads = {}", self.num_threads);
        }
    }
}

fn join_codons<'a>(codons: impl Iterator<Item = &'a str>) -> String {
    codons.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfiguration::default();
        assert_eq!(config.sequence_length, 100_000);
        assert_eq!(config.num_variants, 26);
        assert_eq!(config.threshold, 21.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_config() {
        let codons = CodonSet::new(&["ATG"], &["TAA"]).unwrap();
        let weights = DistanceWeights::new(4.0, 1.0).unwrap();
        let config = PipelineConfiguration::new(codons, weights, 10.0).unwrap();
        assert_eq!(config.cluster_params().threshold, 10.0);
        assert_eq!(config.cluster_params().weights.content, 4.0);
    }

    #[test]
    fn test_validate_zero_length() {
        let config = PipelineConfiguration { sequence_length: 0, ..PipelineConfiguration::default() };
        assert!(matches!(config.validate(), Err(MotifError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validate_rates() {
        let config = PipelineConfiguration { perturbation_rate: 1.5, ..PipelineConfiguration::default() };
        assert!(config.validate().is_err());

        let config = PipelineConfiguration { deletion_fraction: -0.1, ..PipelineConfiguration::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_threshold() {
        let config = PipelineConfiguration { threshold: -1.0, ..PipelineConfiguration::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_weight() {
        let config = PipelineConfiguration {
            weights: DistanceWeights { content: 1.0, position: -0.5 },
            ..PipelineConfiguration::default()
        };
        assert!(config.validate().is_err());
    }
}

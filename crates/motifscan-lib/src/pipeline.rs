//! Pipeline orchestration
//!
//! Coordinates the stages of a motif clustering run:
//! 1. Generate (or load) the sequences
//! 2. Dissect every sequence into motif records
//! 3. Cluster the pooled records
//! 4. Build the ranked report

use crate::cluster::{Clusterer, Clustering};
use crate::config::PipelineConfiguration;
use crate::dissect::dissect_sequence;
use crate::error::Result as MotifResult;
use crate::generate::generate_variants;
use crate::motif::MotifCollection;
use crate::report::ClusterReport;
use crate::sequence::SymbolSequence;
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

/// Everything a full run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Motifs per sequence, in sequence order
    pub collections: Vec<MotifCollection>,
    /// The ranked clustering of all motifs
    pub clustering: Clustering,
    /// Report derived from the clustering
    pub report: ClusterReport,
}

/// Runs the generate / dissect / cluster stages with one configuration
pub struct Pipeline {
    config: PipelineConfiguration,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration up front
    pub fn new(config: PipelineConfiguration) -> MotifResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &PipelineConfiguration {
        &self.config
    }

    /// Build a rayon thread pool sized to `config.num_threads`
    ///
    /// `0` means all available cores (rayon default).
    fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads)
            .build()
            .context("Failed to create thread pool")
    }

    /// Generate the synthetic base sequence and its variants
    pub fn generate(&self) -> Result<Vec<SymbolSequence>> {
        let pool = self.thread_pool()?;
        let sequences = pool.install(|| generate_variants(&self.config))?;
        info!("Generated {} sequences", sequences.len());
        Ok(sequences)
    }

    /// Dissect every sequence; results keep the input order
    pub fn dissect_all(&self, sequences: &[SymbolSequence]) -> Result<Vec<MotifCollection>> {
        let pool = self.thread_pool()?;
        let codons = &self.config.codons;
        let collections: Vec<MotifCollection> = pool.install(|| {
            sequences
                .par_iter()
                .map(|sequence| dissect_sequence(sequence, codons))
                .collect()
        });

        let total: usize = collections.iter().map(MotifCollection::len).sum();
        info!("  Dissected {} sequences into {} motifs", collections.len(), total);
        Ok(collections)
    }

    /// Cluster the motifs of all collections in collection order
    pub fn cluster_collections(&self, collections: &[MotifCollection]) -> MotifResult<Clustering> {
        let mut clusterer = Clusterer::new(self.config.cluster_params())?;
        for collection in collections {
            clusterer.extend(collection.motifs.iter().cloned());
        }
        if clusterer.num_records() == 0 {
            warn!("Zero motifs extracted across all sequences");
        }
        Ok(clusterer.finish())
    }

    /// Dissect, cluster and report on the given sequences
    pub fn run(&self, sequences: &[SymbolSequence]) -> Result<PipelineOutput> {
        self.config.print();
        info!("Running motif pipeline on {} sequences", sequences.len());

        info!("Step 1: Dissecting sequences...");
        let collections = self.dissect_all(sequences)?;

        info!("Step 2: Clustering motifs...");
        let clustering = self.cluster_collections(&collections)?;

        info!("Step 3: Building report...");
        let report = ClusterReport::from_clustering(&clustering);
        info!("Pipeline complete: {} clusters", report.len());

        Ok(PipelineOutput {
            collections,
            clustering,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::CodonSet;
    use crate::distance::DistanceWeights;

    fn seq(id: &str, s: &str) -> SymbolSequence {
        SymbolSequence::from_text(id, s).unwrap()
    }

    #[test]
    fn test_pipeline_creation() {
        assert!(Pipeline::new(PipelineConfiguration::default()).is_ok());
    }

    #[test]
    fn test_pipeline_invalid_config() {
        let config = PipelineConfiguration { threshold: -3.0, ..PipelineConfiguration::default() };
        assert!(Pipeline::new(config).is_err());
    }

    #[test]
    fn test_run_two_identical_sequences() {
        let codons = CodonSet::new(&["ATG"], &["TGA", "TAA"]).unwrap();
        let weights = DistanceWeights::new(1.0, 0.0).unwrap();
        let config = PipelineConfiguration::new(codons, weights, 0.0).unwrap();
        let pipeline = Pipeline::new(config).unwrap();

        let sequences = vec![seq("000", "ATGAAATGAGTAA"), seq("001", "ATGAAATGAGTAA")];
        let output = pipeline.run(&sequences).unwrap();

        assert_eq!(output.collections.len(), 2);
        assert_eq!(output.report.len(), 1);
        assert_eq!(output.report.clusters[0].num_entries, 2);
    }

    #[test]
    fn test_dissect_all_keeps_order() {
        let config = PipelineConfiguration { num_threads: 2, ..PipelineConfiguration::default() };
        let pipeline = Pipeline::new(config).unwrap();
        let sequences: Vec<SymbolSequence> = (0..20)
            .map(|i| seq(&format!("{:03}", i), "ATGCCCTAG"))
            .collect();
        let collections = pipeline.dissect_all(&sequences).unwrap();
        let ids: Vec<&str> = collections.iter().map(|c| c.sequence_id.as_str()).collect();
        let expected: Vec<&str> = sequences.iter().map(|s| s.id()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_run_without_motifs() {
        let pipeline = Pipeline::new(PipelineConfiguration::default()).unwrap();
        let output = pipeline.run(&[seq("000", "CCCCCCCCC")]).unwrap();
        assert!(output.clustering.is_empty());
        assert!(output.report.is_empty());
    }

    #[test]
    fn test_generate_small() {
        let config = PipelineConfiguration {
            sequence_length: 600,
            num_variants: 3,
            ..PipelineConfiguration::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let sequences = pipeline.generate().unwrap();
        assert_eq!(sequences.len(), 4);
        let output = pipeline.run(&sequences).unwrap();
        let total: usize = output.collections.iter().map(MotifCollection::len).sum();
        assert_eq!(output.clustering.records().len(), total);
    }
}

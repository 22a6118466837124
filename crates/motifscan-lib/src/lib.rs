// motifscan: codon-bounded motif extraction and clustering
//
// Dissects nucleotide sequences into motifs bounded by start/stop codons
// and groups the motifs of many sequences with a greedy first-fit
// single-linkage clustering over a weighted content/position distance.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod sequence;
pub mod codon;
pub mod motif;
pub mod dissect;
pub mod distance;
pub mod cluster;
pub mod config;
pub mod generate;
pub mod io;
pub mod report;
pub mod plot;
pub mod pipeline;

// Re-export common types at crate root
pub use error::MotifError;
pub use sequence::SymbolSequence;
pub use codon::{Codon, CodonSet};
pub use motif::{MotifCollection, MotifRecord};
pub use dissect::{dissect, dissect_sequence, Dissector, ScanState};
pub use distance::{content_difference, distance, position_difference, DistanceWeights};
pub use cluster::{cluster, Cluster, ClusterId, ClusterParams, Clusterer, Clustering};
pub use config::PipelineConfiguration;
pub use report::{ClusterReport, ClusterSummary};
pub use plot::{plot_report, ClusterLayout, PlotOptions, SymbolColors};
pub use pipeline::{Pipeline, PipelineOutput};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

//! Constants and defaults for motifscan
//!
//! This module defines the codon geometry, the nucleotide alphabet and the
//! default values for every configurable parameter of the pipeline.

/// Width of a codon window, in symbols
pub const CODON_SIZE: usize = 3;

/// The four valid nucleotide symbols (uppercase)
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'T', b'G'];

/// Default start codons
pub const DEFAULT_START_CODONS: &[&str] = &["ATG", "ATA"];

/// Default stop codons
pub const DEFAULT_STOP_CODONS: &[&str] = &["TGA", "TAG", "TAA"];

/// Default length of the synthetic base sequence
pub const DEFAULT_SEQUENCE_LENGTH: usize = 100_000;

/// Default number of perturbed variants generated from the base sequence
pub const DEFAULT_NUM_VARIANTS: usize = 26;

/// Default per-symbol perturbation probability
pub const DEFAULT_PERTURBATION_RATE: f64 = 0.05;

/// Fraction of perturbations that delete the symbol (the rest substitute it)
pub const DEFAULT_DELETION_FRACTION: f64 = 0.25;

/// Default weight of the content mismatch term
pub const DEFAULT_WEIGHT_CONTENT: f64 = 1.0;

/// Default weight of the start-position term
pub const DEFAULT_WEIGHT_POSITION: f64 = 1.0;

/// Default inclusive clustering threshold
pub const DEFAULT_THRESHOLD: f64 = 21.0;

/// Default RNG seed for synthetic data
pub const DEFAULT_SEED: u64 = 1;

/// Width of zero-padded synthetic sequence identifiers ("000", "001", ...)
pub const SEQUENCE_ID_WIDTH: usize = 3;

/// Suffix of per-sequence motif collection files
pub const ANALYSIS_SUFFIX: &str = "_analysis.json";

/// Records between two clustering progress messages
pub const CLUSTER_PROGRESS_INTERVAL: usize = 1_000;

/// Number of top-ranked clusters drawn by default
pub const DEFAULT_NUM_PLOTTED_CLUSTERS: usize = 10;

/// Edge length of one symbol cell in a cluster plot, in pixels
pub const DEFAULT_PLOT_CELL_SIZE: u32 = 12;

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Check if a byte is a valid uppercase nucleotide
#[inline]
pub const fn is_nucleotide(base: u8) -> bool {
    matches!(base, b'A' | b'C' | b'G' | b'T')
}

/// Check if an offset lies on a codon boundary
#[inline]
pub const fn is_triplet_aligned(offset: usize) -> bool {
    offset % CODON_SIZE == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nucleotide() {
        for &base in &NUCLEOTIDES {
            assert!(is_nucleotide(base), "{} should be valid", base as char);
        }
        assert!(!is_nucleotide(b'N'));
        assert!(!is_nucleotide(b'a'));
        assert!(!is_nucleotide(b'-'));
    }

    #[test]
    fn test_is_triplet_aligned() {
        assert!(is_triplet_aligned(0));
        assert!(is_triplet_aligned(9));
        assert!(!is_triplet_aligned(4));
    }

    #[test]
    fn test_default_codons_are_triplets() {
        for codon in DEFAULT_START_CODONS.iter().chain(DEFAULT_STOP_CODONS) {
            assert_eq!(codon.len(), CODON_SIZE);
            assert!(codon.bytes().all(is_nucleotide));
        }
    }
}

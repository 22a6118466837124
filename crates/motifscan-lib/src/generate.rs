//! Synthetic sequence generation
//!
//! Produces a uniform random base sequence and perturbed copies of it. Each
//! perturbed symbol is either deleted or replaced by a different nucleotide.
//! Every variant draws from its own RNG seeded from the run seed and the
//! variant index, so results do not depend on thread scheduling.

use crate::config::PipelineConfiguration;
use crate::constants::{NUCLEOTIDES, SEQUENCE_ID_WIDTH};
use crate::error::Result;
use crate::sequence::SymbolSequence;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};

/// Generate a uniform random nucleotide string
pub fn generate_base_sequence<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Vec<u8> {
    (0..length)
        .map(|_| NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())])
        .collect()
}

/// Perturb each symbol with probability `rate`
///
/// A perturbed symbol is dropped with probability `deletion_fraction`,
/// otherwise it is replaced by one of the three other nucleotides.
pub fn perturb_sequence<R: Rng + ?Sized>(
    base: &[u8],
    rate: f64,
    deletion_fraction: f64,
    rng: &mut R,
) -> Vec<u8> {
    let mut perturbed = Vec::with_capacity(base.len());
    for &symbol in base {
        if rng.gen::<f64>() < rate {
            if rng.gen::<f64>() < deletion_fraction {
                continue;
            }
            perturbed.push(substitute(symbol, rng));
        } else {
            perturbed.push(symbol);
        }
    }
    perturbed
}

/// Pick a nucleotide different from `symbol`
fn substitute<R: Rng + ?Sized>(symbol: u8, rng: &mut R) -> u8 {
    let mut others = [0u8; 3];
    let mut n = 0;
    for &base in NUCLEOTIDES.iter().filter(|&&b| b != symbol) {
        others[n] = base;
        n += 1;
    }
    others[..n].choose(rng).copied().unwrap_or(symbol)
}

/// Zero-padded identifier of the n-th synthetic sequence (0 = base)
pub fn sequence_id(index: usize) -> String {
    format!("{:0width$}", index, width = SEQUENCE_ID_WIDTH)
}

/// Seed for one variant, derived from the run seed
#[inline]
fn variant_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (index as u64).wrapping_add(1)
}

/// Generate the base sequence and its perturbed variants
///
/// Returns the base as sequence `000` followed by variants `001..=N`.
/// Variants that lose every symbol are skipped.
pub fn generate_variants(config: &PipelineConfiguration) -> Result<Vec<SymbolSequence>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let base = generate_base_sequence(config.sequence_length, &mut rng);
    info!(
        "Generating {} variants of a {}-symbol base sequence",
        config.num_variants, config.sequence_length
    );

    let variants: Vec<(usize, Vec<u8>)> = (1..=config.num_variants)
        .into_par_iter()
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(variant_seed(config.seed, index));
            let symbols = perturb_sequence(
                &base,
                config.perturbation_rate,
                config.deletion_fraction,
                &mut rng,
            );
            (index, symbols)
        })
        .collect();

    let mut sequences = Vec::with_capacity(variants.len() + 1);
    sequences.push(SymbolSequence::new(sequence_id(0), &base)?);
    for (index, symbols) in variants {
        if symbols.is_empty() {
            warn!("Variant {} lost every symbol; skipping", sequence_id(index));
            continue;
        }
        sequences.push(SymbolSequence::new(sequence_id(index), &symbols)?);
    }

    Ok(sequences)
}

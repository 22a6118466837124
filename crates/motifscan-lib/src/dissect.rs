//! Codon-window motif dissection
//!
//! A sequence is read as non-overlapping codon windows starting at offset 0
//! (a trailing remainder shorter than a codon is never read). The scan is a
//! two-state automaton:
//!
//! | state       | window        | action                                  |
//! |-------------|---------------|-----------------------------------------|
//! | `Searching` | start codon   | open a motif at this window             |
//! | `Searching` | anything else | skip                                    |
//! | `InMotif`   | stop codon    | emit the motif, return to `Searching`   |
//! | `InMotif`   | anything else | extend the content (start codons too)   |
//!
//! A motif still open when the windows run out is dropped. Because the
//! window after a stop codon is read in `Searching`, a stop codon can never
//! also open the next motif.

use crate::codon::{Codon, CodonSet};
use crate::constants::CODON_SIZE;
use crate::motif::{MotifCollection, MotifRecord};
use crate::sequence::SymbolSequence;
use std::iter::FusedIterator;
use tracing::debug;

/// Scanner state between two windows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for a start codon
    Searching,
    /// Inside a motif opened by `start_codon` at `start_position`
    InMotif {
        /// Offset of the opening codon
        start_position: usize,
        /// The opening codon
        start_codon: Codon,
    },
}

/// What a single window does to the scanner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// `Searching` and not a start codon
    Skip,
    /// `Searching` and a start codon
    Open,
    /// `InMotif` and not a stop codon
    Extend,
    /// `InMotif` and a stop codon; carries the opening of the motif
    Close {
        /// Offset of the opening codon
        start_position: usize,
        /// The opening codon
        start_codon: Codon,
    },
}

impl ScanState {
    /// Classify a window against the codon set in this state
    #[inline]
    pub fn transition(&self, window: &[u8], codons: &CodonSet) -> Transition {
        match self {
            ScanState::Searching if codons.is_start(window) => Transition::Open,
            ScanState::Searching => Transition::Skip,
            ScanState::InMotif {
                start_position,
                start_codon,
            } if codons.is_stop(window) => Transition::Close {
                start_position: *start_position,
                start_codon: *start_codon,
            },
            ScanState::InMotif { .. } => Transition::Extend,
        }
    }
}

/// Lazy iterator over the motifs of one sequence
///
/// Created by [`dissect`]. Each call to [`dissect`] starts a fresh scan, so
/// the same sequence can be dissected any number of times.
pub struct Dissector<'a> {
    sequence: &'a SymbolSequence,
    codons: &'a CodonSet,
    offset: usize,
    state: ScanState,
}

impl<'a> Dissector<'a> {
    fn new(sequence: &'a SymbolSequence, codons: &'a CodonSet) -> Self {
        Self {
            sequence,
            codons,
            offset: 0,
            state: ScanState::Searching,
        }
    }

    /// Current automaton state
    pub fn state(&self) -> ScanState {
        self.state
    }
}

impl Iterator for Dissector<'_> {
    type Item = MotifRecord;

    fn next(&mut self) -> Option<MotifRecord> {
        let symbols = self.sequence.as_bytes();

        while self.offset + CODON_SIZE <= symbols.len() {
            let offset = self.offset;
            let window = &symbols[offset..offset + CODON_SIZE];
            self.offset += CODON_SIZE;

            match self.state.transition(window, self.codons) {
                Transition::Skip | Transition::Extend => {}
                Transition::Open => {
                    self.state = ScanState::InMotif {
                        start_position: offset,
                        start_codon: Codon::from_window(window),
                    };
                }
                Transition::Close {
                    start_position,
                    start_codon,
                } => {
                    self.state = ScanState::Searching;

                    // Content windows sit between the two codons
                    let content = &symbols[start_position + CODON_SIZE..offset];
                    return Some(MotifRecord::new(
                        self.sequence.id(),
                        String::from_utf8_lossy(content).into_owned(),
                        start_position,
                        start_codon,
                        Codon::from_window(window),
                    ));
                }
            }
        }

        None
    }
}

impl FusedIterator for Dissector<'_> {}

/// Scan a sequence for codon-bounded motifs
pub fn dissect<'a>(sequence: &'a SymbolSequence, codons: &'a CodonSet) -> Dissector<'a> {
    Dissector::new(sequence, codons)
}

/// Dissect a sequence and collect its motifs
pub fn dissect_sequence(sequence: &SymbolSequence, codons: &CodonSet) -> MotifCollection {
    let motifs: Vec<MotifRecord> = dissect(sequence, codons).collect();
    debug!(
        "  {}: {} motifs in {} windows",
        sequence.id(),
        motifs.len(),
        sequence.num_windows()
    );
    MotifCollection::new(sequence.id(), motifs)
}

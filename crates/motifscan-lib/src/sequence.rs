//! Validated nucleotide sequences
//!
//! A [`SymbolSequence`] is an identified, immutable run of A/C/G/T symbols.
//! Lowercase input is accepted and normalized to uppercase; anything else is
//! rejected with the offset of the first bad symbol.

use crate::constants::{is_nucleotide, CODON_SIZE};
use crate::error::{MotifError, Result};

/// An identified sequence over the nucleotide alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolSequence {
    id: String,
    symbols: Vec<u8>,
}

impl SymbolSequence {
    /// Create a sequence from raw bytes, validating the alphabet
    ///
    /// # Errors
    /// Returns [`MotifError::MalformedSequence`] if the input contains a symbol
    /// other than A, C, G or T (in either case), and
    /// [`MotifError::EmptySequence`] if there are no symbols at all.
    pub fn new(id: impl Into<String>, symbols: &[u8]) -> Result<Self> {
        Self::with_offset(id.into(), symbols, 0)
    }

    /// Create a sequence from text; trailing whitespace is dropped
    ///
    /// Leading whitespace is skipped but still counted, so a reported offset
    /// points into `text` itself.
    pub fn from_text(id: impl Into<String>, text: &str) -> Result<Self> {
        let trimmed = text.trim_end();
        let body = trimmed.trim_start();
        Self::with_offset(id.into(), body.as_bytes(), trimmed.len() - body.len())
    }

    fn with_offset(id: String, symbols: &[u8], skipped: usize) -> Result<Self> {
        if symbols.is_empty() {
            return Err(MotifError::EmptySequence { sequence_id: id });
        }

        let mut normalized = Vec::with_capacity(symbols.len());
        for (offset, &base) in symbols.iter().enumerate() {
            let upper = base.to_ascii_uppercase();
            if !is_nucleotide(upper) {
                return Err(MotifError::MalformedSequence {
                    sequence_id: id,
                    offset: skipped + offset,
                    symbol: base as char,
                });
            }
            normalized.push(upper);
        }

        Ok(Self { id, symbols: normalized })
    }

    /// Sequence identifier
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Uppercase symbols
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }

    /// Symbols as text (always ASCII)
    pub fn as_str(&self) -> &str {
        // Only validated ASCII nucleotides are ever stored
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }

    /// Number of symbols
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed sequence
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of complete codon windows
    #[inline]
    pub fn num_windows(&self) -> usize {
        self.symbols.len() / CODON_SIZE
    }
}

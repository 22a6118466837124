//! Motif records produced by dissection

use crate::codon::Codon;
use crate::constants::{is_nucleotide, is_triplet_aligned, CODON_SIZE};
use crate::error::MotifError;
use serde::{Deserialize, Serialize};

/// A codon-bounded region found in one sequence
///
/// `content` holds the symbols strictly between the start and stop codons.
/// `start_position` is the offset of the start codon and `end_position` the
/// offset just past the stop codon, both in symbol units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredMotifRecord")]
pub struct MotifRecord {
    sequence_id: String,
    content: String,
    start_position: usize,
    end_position: usize,
    start_codon: Codon,
    stop_codon: Codon,
}

impl MotifRecord {
    /// Create a record for a motif starting at `start_position`
    ///
    /// The end position is derived from the content length so that the
    /// record always spans start codon, content and stop codon.
    pub fn new(
        sequence_id: impl Into<String>,
        content: impl Into<String>,
        start_position: usize,
        start_codon: Codon,
        stop_codon: Codon,
    ) -> Self {
        let content = content.into();
        let end_position = start_position + CODON_SIZE + content.len() + CODON_SIZE;
        Self {
            sequence_id: sequence_id.into(),
            content,
            start_position,
            end_position,
            start_codon,
            stop_codon,
        }
    }

    /// Identifier of the originating sequence
    #[inline]
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Symbols between the codons
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Offset of the start codon
    #[inline]
    pub fn start_position(&self) -> usize {
        self.start_position
    }

    /// Offset just past the stop codon
    #[inline]
    pub fn end_position(&self) -> usize {
        self.end_position
    }

    /// The codon that opened the motif
    #[inline]
    pub fn start_codon(&self) -> Codon {
        self.start_codon
    }

    /// The codon that closed the motif
    #[inline]
    pub fn stop_codon(&self) -> Codon {
        self.stop_codon
    }

    /// Offset of the stop codon
    #[inline]
    pub fn stop_position(&self) -> usize {
        self.end_position - CODON_SIZE
    }

    /// Number of symbols covered, codons included
    #[inline]
    pub fn span(&self) -> usize {
        self.end_position - self.start_position
    }
}

/// Field layout of a record as read back from an artifact
#[derive(Deserialize)]
struct StoredMotifRecord {
    sequence_id: String,
    content: String,
    start_position: usize,
    end_position: usize,
    start_codon: Codon,
    stop_codon: Codon,
}

impl TryFrom<StoredMotifRecord> for MotifRecord {
    type Error = MotifError;

    fn try_from(stored: StoredMotifRecord) -> Result<Self, Self::Error> {
        let malformed = |reason: String| MotifError::MalformedRecord {
            sequence_id: stored.sequence_id.clone(),
            reason,
        };

        if !is_triplet_aligned(stored.start_position) {
            return Err(malformed(format!(
                "start position {} is not on a codon boundary",
                stored.start_position
            )));
        }
        if !is_triplet_aligned(stored.content.len()) {
            return Err(malformed(format!(
                "content length {} is not a whole number of codons",
                stored.content.len()
            )));
        }
        let expected_end = stored.start_position + CODON_SIZE + stored.content.len() + CODON_SIZE;
        if stored.end_position != expected_end {
            return Err(malformed(format!(
                "end position {} does not match start {} and content length {} (expected {})",
                stored.end_position,
                stored.start_position,
                stored.content.len(),
                expected_end
            )));
        }
        if let Some((index, symbol)) = stored
            .content
            .bytes()
            .enumerate()
            .find(|&(_, b)| !is_nucleotide(b))
        {
            return Err(MotifError::MalformedSequence {
                sequence_id: stored.sequence_id,
                offset: stored.start_position + CODON_SIZE + index,
                symbol: symbol as char,
            });
        }

        Ok(Self::new(
            stored.sequence_id,
            stored.content,
            stored.start_position,
            stored.start_codon,
            stored.stop_codon,
        ))
    }
}

/// All motifs dissected from one sequence, in emission order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifCollection {
    /// Identifier of the dissected sequence
    pub sequence_id: String,
    /// Motifs in the order the scan emitted them
    pub motifs: Vec<MotifRecord>,
}

impl MotifCollection {
    /// Create a collection for one sequence
    pub fn new(sequence_id: impl Into<String>, motifs: Vec<MotifRecord>) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            motifs,
        }
    }

    /// Number of motifs
    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    /// Whether no motif was found
    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        Codon::parse(s).unwrap()
    }

    #[test]
    fn test_positions_derived_from_content() {
        let rec = MotifRecord::new("000", "AAA", 0, codon("ATG"), codon("TGA"));
        assert_eq!(rec.start_position(), 0);
        assert_eq!(rec.stop_position(), 6);
        assert_eq!(rec.end_position(), 9);
        assert_eq!(rec.span(), 9);
    }

    #[test]
    fn test_empty_content() {
        let rec = MotifRecord::new("000", "", 12, codon("ATG"), codon("TAA"));
        assert_eq!(rec.end_position(), 18);
        assert!(rec.start_position() < rec.end_position());
    }

    #[test]
    fn test_record_json_fields() {
        let rec = MotifRecord::new("001", "CCC", 3, codon("ATA"), codon("TAG"));
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["sequence_id"], "001");
        assert_eq!(value["content"], "CCC");
        assert_eq!(value["start_position"], 3);
        assert_eq!(value["end_position"], 12);
        assert_eq!(value["start_codon"], "ATA");
        assert_eq!(value["stop_codon"], "TAG");
    }

    fn stored(content: &str, start: usize, end: usize) -> String {
        format!(
            r#"{{"sequence_id":"x","content":"{}","start_position":{},"end_position":{},"start_codon":"ATG","stop_codon":"TAA"}}"#,
            content, start, end
        )
    }

    #[test]
    fn test_record_json_roundtrip() {
        let rec = MotifRecord::new("001", "CCCGGG", 30, codon("ATA"), codon("TAG"));
        let json = serde_json::to_string(&rec).unwrap();
        let back: MotifRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_stored_end_before_start_rejected() {
        let err = serde_json::from_str::<MotifRecord>(&stored("AAA", 50, 1)).unwrap_err();
        assert!(err.to_string().contains("end position 1"));
    }

    #[test]
    fn test_stored_layout_checked() {
        // unaligned start
        assert!(serde_json::from_str::<MotifRecord>(&stored("AAA", 4, 13)).is_err());
        // partial codon of content
        assert!(serde_json::from_str::<MotifRecord>(&stored("AA", 0, 8)).is_err());
        // end does not cover the stop codon
        assert!(serde_json::from_str::<MotifRecord>(&stored("AAA", 0, 6)).is_err());
    }

    #[test]
    fn test_stored_content_symbols_checked() {
        let err = serde_json::from_str::<MotifRecord>(&stored("NN?", 0, 9)).unwrap_err();
        assert!(err.to_string().contains("offset 3"));
        assert!(serde_json::from_str::<MotifRecord>(&stored("aaa", 0, 9)).is_err());
    }
}

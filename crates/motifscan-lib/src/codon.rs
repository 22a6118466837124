//! Codon triplets and start/stop codon sets

use crate::constants::{is_nucleotide, CODON_SIZE, DEFAULT_START_CODONS, DEFAULT_STOP_CODONS};
use crate::error::{MotifError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated 3-symbol codon
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codon([u8; CODON_SIZE]);

impl Codon {
    /// Parse a codon from text (case-insensitive)
    ///
    /// # Errors
    /// Returns [`MotifError::InvalidConfiguration`] unless the text is exactly
    /// three nucleotide symbols.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != CODON_SIZE {
            return Err(MotifError::InvalidConfiguration(format!(
                "codon must have {} symbols, got {:?}",
                CODON_SIZE, text
            )));
        }
        let mut codon = [0u8; CODON_SIZE];
        for (slot, &base) in codon.iter_mut().zip(bytes) {
            let upper = base.to_ascii_uppercase();
            if !is_nucleotide(upper) {
                return Err(MotifError::InvalidConfiguration(format!(
                    "codon {:?} contains invalid symbol {:?}",
                    text, base as char
                )));
            }
            *slot = upper;
        }
        Ok(Self(codon))
    }

    /// Build a codon from an already-validated window
    #[inline]
    pub(crate) fn from_window(window: &[u8]) -> Self {
        let mut codon = [0u8; CODON_SIZE];
        codon.copy_from_slice(&window[..CODON_SIZE]);
        Self(codon)
    }

    /// Raw symbols
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Symbols as text
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Check whether a window spells this codon
    #[inline]
    pub fn matches(&self, window: &[u8]) -> bool {
        self.0[..] == *window
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Codon {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Codon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Codon::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// The start and stop markers used by the dissector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodonSet {
    starts: Vec<Codon>,
    stops: Vec<Codon>,
}

impl CodonSet {
    /// Build a codon set from text codons
    ///
    /// # Errors
    /// Returns [`MotifError::InvalidConfiguration`] if either set is empty or
    /// any entry is not a valid codon.
    pub fn new<S: AsRef<str>>(starts: &[S], stops: &[S]) -> Result<Self> {
        let starts = parse_codons(starts)?;
        let stops = parse_codons(stops)?;
        let set = Self { starts, stops };
        set.validate()?;
        Ok(set)
    }

    /// Reject empty start or stop sets
    pub fn validate(&self) -> Result<()> {
        if self.starts.is_empty() {
            return Err(MotifError::InvalidConfiguration(
                "start codon set must not be empty".to_string(),
            ));
        }
        if self.stops.is_empty() {
            return Err(MotifError::InvalidConfiguration(
                "stop codon set must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Start codons, deduplicated, in configuration order
    pub fn starts(&self) -> &[Codon] {
        &self.starts
    }

    /// Stop codons, deduplicated, in configuration order
    pub fn stops(&self) -> &[Codon] {
        &self.stops
    }

    /// Check whether a window is a start codon
    #[inline]
    pub fn is_start(&self, window: &[u8]) -> bool {
        self.starts.iter().any(|c| c.matches(window))
    }

    /// Check whether a window is a stop codon
    #[inline]
    pub fn is_stop(&self, window: &[u8]) -> bool {
        self.stops.iter().any(|c| c.matches(window))
    }
}

impl Default for CodonSet {
    fn default() -> Self {
        Self {
            starts: DEFAULT_START_CODONS
                .iter()
                .filter_map(|c| Codon::parse(c).ok())
                .collect(),
            stops: DEFAULT_STOP_CODONS
                .iter()
                .filter_map(|c| Codon::parse(c).ok())
                .collect(),
        }
    }
}

fn parse_codons<S: AsRef<str>>(codons: &[S]) -> Result<Vec<Codon>> {
    let mut parsed: Vec<Codon> = Vec::with_capacity(codons.len());
    for text in codons {
        let codon = Codon::parse(text.as_ref())?;
        if !parsed.contains(&codon) {
            parsed.push(codon);
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codon() {
        let codon = Codon::parse("atg").unwrap();
        assert_eq!(codon.as_str(), "ATG");
        assert!(codon.matches(b"ATG"));
        assert!(!codon.matches(b"ATA"));
    }

    #[test]
    fn test_parse_codon_invalid() {
        assert!(Codon::parse("AT").is_err());
        assert!(Codon::parse("ATGA").is_err());
        assert!(Codon::parse("ANG").is_err());
    }

    #[test]
    fn test_default_codon_set() {
        let set = CodonSet::default();
        assert_eq!(set.starts().len(), 2);
        assert_eq!(set.stops().len(), 3);
        assert!(set.is_start(b"ATA"));
        assert!(set.is_stop(b"TAG"));
        assert!(!set.is_stop(b"ATG"));
    }

    #[test]
    fn test_empty_sets_rejected() {
        let none: [&str; 0] = [];
        assert!(CodonSet::new(&none, &["TGA"]).is_err());
        assert!(CodonSet::new(&["ATG"], &none).is_err());
    }

    #[test]
    fn test_duplicates_collapsed() {
        let set = CodonSet::new(&["ATG", "atg"], &["TAA"]).unwrap();
        assert_eq!(set.starts().len(), 1);
    }

    #[test]
    fn test_codon_serde() {
        let codon = Codon::parse("TGA").unwrap();
        let json = serde_json::to_string(&codon).unwrap();
        assert_eq!(json, "\"TGA\"");
        let back: Codon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, codon);
        assert!(serde_json::from_str::<Codon>("\"TG\"").is_err());
    }
}

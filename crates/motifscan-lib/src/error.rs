//! Error type for the core pipeline stages

use thiserror::Error;

/// Error type for sequence validation, dissection and configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotifError {
    /// The sequence contains a symbol outside A/C/G/T
    #[error("Malformed sequence '{sequence_id}': invalid symbol {symbol:?} at offset {offset}")]
    MalformedSequence {
        /// Identifier of the offending sequence
        sequence_id: String,
        /// Offset of the first invalid symbol
        offset: usize,
        /// The invalid symbol
        symbol: char,
    },
    /// The sequence has no symbols
    #[error("Empty sequence '{sequence_id}'")]
    EmptySequence {
        /// Identifier of the offending sequence
        sequence_id: String,
    },
    /// A stored motif record breaks the layout produced by dissection
    #[error("Malformed motif record from '{sequence_id}': {reason}")]
    MalformedRecord {
        /// Identifier of the sequence the record claims to come from
        sequence_id: String,
        /// Which check failed
        reason: String,
    },
    /// A configuration value was rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result alias for the core pipeline
pub type Result<T> = std::result::Result<T, MotifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_sequence_message() {
        let err = MotifError::MalformedSequence {
            sequence_id: "007".to_string(),
            offset: 12,
            symbol: 'N',
        };
        let msg = err.to_string();
        assert!(msg.contains("007"));
        assert!(msg.contains("offset 12"));
        assert!(msg.contains("'N'"));
    }

    #[test]
    fn test_empty_sequence_message() {
        let err = MotifError::EmptySequence {
            sequence_id: "003".to_string(),
        };
        assert_eq!(err.to_string(), "Empty sequence '003'");
    }
}

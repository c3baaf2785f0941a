//! Error types
//!
//! Format errors are reported when an output format is compiled, so a bad
//! format is rejected before any document is read. Scan errors cover the
//! two-pass size contract and re-emission bookkeeping. Malformed markup is
//! never an error; it degrades to literal text.

use thiserror::Error;

/// A problem in an output format string, with the byte offset it was found at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatSpecError {
    #[error("unknown field '{letter}' at offset {offset}")]
    UnknownField { letter: char, offset: usize },

    #[error("'{marker}' at offset {offset} is not followed by a field letter")]
    DanglingMarker { marker: char, offset: usize },

    #[error("unterminated escape at offset {offset}")]
    DanglingEscape { offset: usize },

    #[error("'[' at offset {offset} is never closed")]
    UnclosedGroup { offset: usize },

    #[error("']' at offset {offset} has no matching '['")]
    UnopenedGroup { offset: usize },

    #[error("empty group at offset {offset}")]
    EmptyGroup { offset: usize },

    #[error("number at offset {offset} is too large")]
    NumberOverflow { offset: usize },

    #[error("comparison operator at offset {offset} is not followed by a number")]
    MissingOperand { offset: usize },

    #[error("field '{letter}' at offset {offset} has a single value and cannot be counted")]
    UncountableField { letter: char, offset: usize },

    /// A number-of-values comparison with no multi-valued field anywhere in
    /// its scope.
    #[error(
        "the number-of-values comparison {operand} at offset {offset} needs a field \
         with a variable number of values"
    )]
    UncountableComparison { operand: usize, offset: usize },
}

/// Failures while scanning a document or writing it back out.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("document of {len} bytes exceeds the 4 GiB span limit")]
    DocumentTooLarge { len: usize },

    #[error("cannot allocate {slots} token slots")]
    Allocation {
        slots: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("counting pass saw {counted} tokens but the reading pass produced {read}")]
    PassMismatch { counted: usize, read: usize },

    #[error("{tokens} tokens scanned but {outputs} outputs supplied")]
    OutputCount { tokens: usize, outputs: usize },
}

/// Errors raised by the lemmatiser session layer.
#[derive(Debug, Error)]
pub enum LemmaError {
    #[error("invalid output format: {0}")]
    Format(#[from] FormatSpecError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("a lemmatising session is already active on this lemmatiser")]
    SessionActive,
}

pub type FormatResult<T> = std::result::Result<T, FormatSpecError>;
pub type ScanResult<T> = std::result::Result<T, ScanError>;
pub type Result<T> = std::result::Result<T, LemmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message_has_offset() {
        let err = FormatSpecError::UnknownField {
            letter: 'q',
            offset: 3,
        };
        assert_eq!(err.to_string(), "unknown field 'q' at offset 3");
    }

    #[test]
    fn test_lemma_error_from_format() {
        let err: LemmaError = FormatSpecError::EmptyGroup { offset: 0 }.into();
        assert!(matches!(err, LemmaError::Format(_)));
        assert!(err.to_string().starts_with("invalid output format"));
    }
}

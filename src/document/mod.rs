//! Document buffer and token records
//!
//! The whole input is loaded once into an owned, immutable buffer. Every
//! word, attribute value and token extent is an offset span into it:
//!
//! ```text
//! Document
//! ├── bytes: Vec<u8>          # owned, never mutated
//! └── TokenSequence
//!     ├── Token { word, pos, lemma, lemma_class, extent }   # spans only
//!     └── epilogue            # flushes the tail after the last token
//! ```

pub mod span;
pub mod token;

pub use span::Span;
pub use token::{Token, TokenSequence, WordSource};

use crate::error::{ScanError, ScanResult};

/// An input document.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
}

impl Document {
    /// Take ownership of the input. Spans are 32-bit, so documents are
    /// limited to 4 GiB.
    pub fn new(bytes: Vec<u8>) -> ScanResult<Self> {
        if bytes.len() > u32::MAX as usize {
            return Err(ScanError::DocumentTooLarge { len: bytes.len() });
        }
        Ok(Document { bytes })
    }

    /// Copy a borrowed input into a document
    pub fn from_slice(bytes: &[u8]) -> ScanResult<Self> {
        Self::new(bytes.to_vec())
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes covered by `span`
    #[inline]
    pub fn text(&self, span: Span) -> &[u8] {
        span.slice(&self.bytes)
    }

    /// Give the buffer back, ending the lifetime of all spans into it
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

//! Reversible packing of short identifiers into fixed-width field elements.
//!
//! A source string is zero-padded to the profile's maximum length and split
//! into `chunk_size`-byte little-endian chunks, one element per chunk. Circuits
//! and contracts that only handle narrow numeric values carry identifiers in
//! this form.

use thiserror::Error;

/// Packing failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackingError {
    /// Source identifier is longer than the profile allows.
    #[error("identifier is {len} bytes, profile allows at most {max}")]
    IdentifierTooLong {
        /// Length of the rejected identifier.
        len: usize,
        /// Maximum length for the profile.
        max: usize,
    },
    /// Wrong number of elements for the profile.
    #[error("expected {expected} packed elements, got {actual}")]
    ElementCountMismatch {
        /// Element count of the profile.
        expected: usize,
        /// Element count supplied.
        actual: usize,
    },
    /// An element does not fit in `chunk_size` bytes.
    #[error("element {index} ({value}) exceeds the chunk width")]
    ElementOutOfRange {
        /// Position of the offending element.
        index: usize,
        /// Offending value.
        value: u64,
    },
    /// Chunk size outside `1..=8`.
    #[error("unsupported chunk size {0}")]
    UnsupportedChunkSize(usize),
    /// Unpacked bytes are not UTF-8.
    #[error("unpacked identifier is not UTF-8")]
    InvalidUtf8,
}

/// Chunking profile: element count and bytes per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackingProfile {
    elements: usize,
    chunk_size: usize,
}

/// Three 7-byte elements, 21 source bytes.
pub const PROFILE_21: PackingProfile = PackingProfile {
    elements: 3,
    chunk_size: 7,
};

/// Eight 7-byte elements, 56 source bytes.
pub const PROFILE_56: PackingProfile = PackingProfile {
    elements: 8,
    chunk_size: 7,
};

impl PackingProfile {
    /// Builds a custom profile. Elements are `u64`, so chunks hold at most 8 bytes.
    pub fn new(elements: usize, chunk_size: usize) -> Result<Self, PackingError> {
        if chunk_size == 0 || chunk_size > 8 {
            return Err(PackingError::UnsupportedChunkSize(chunk_size));
        }
        Ok(Self {
            elements,
            chunk_size,
        })
    }

    /// Looks up one of the fixed profiles by its maximum source length.
    pub fn from_max_len(max_len: usize) -> Option<Self> {
        match max_len {
            21 => Some(PROFILE_21),
            56 => Some(PROFILE_56),
            _ => None,
        }
    }

    /// Number of elements produced.
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Bytes carried by each element.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Maximum source length in bytes.
    pub fn max_len(&self) -> usize {
        self.elements * self.chunk_size
    }

    /// Exclusive upper bound of an element, `None` when every `u64` fits.
    fn element_bound(&self) -> Option<u64> {
        1u64.checked_shl((self.chunk_size * 8) as u32)
    }
}

/// Packs `bytes` into field elements.
///
/// Element `i` is `Σ bytes[i·n + k] · 256^k` over the zero-padded input.
///
/// # Errors
///
/// Returns [`PackingError::IdentifierTooLong`] instead of truncating.
pub fn pack(profile: PackingProfile, bytes: &[u8]) -> Result<Vec<u64>, PackingError> {
    let max = profile.max_len();
    if bytes.len() > max {
        return Err(PackingError::IdentifierTooLong {
            len: bytes.len(),
            max,
        });
    }

    let mut padded = bytes.to_vec();
    padded.resize(max, 0);

    Ok(padded
        .chunks(profile.chunk_size)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
        })
        .collect())
}

/// Recovers the source bytes from packed elements.
///
/// Trailing zero bytes are stripped, so inputs that legitimately end in a
/// zero byte do not round-trip.
pub fn unpack(profile: PackingProfile, elements: &[u64]) -> Result<Vec<u8>, PackingError> {
    if elements.len() != profile.elements {
        return Err(PackingError::ElementCountMismatch {
            expected: profile.elements,
            actual: elements.len(),
        });
    }

    let bound = profile.element_bound();
    let mut bytes = Vec::with_capacity(profile.max_len());
    for (index, &value) in elements.iter().enumerate() {
        if bound.is_some_and(|b| value >= b) {
            return Err(PackingError::ElementOutOfRange { index, value });
        }
        bytes.extend_from_slice(&value.to_le_bytes()[..profile.chunk_size]);
    }

    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    bytes.truncate(end);
    Ok(bytes)
}

/// [`pack`] for UTF-8 identifiers.
pub fn pack_str(profile: PackingProfile, identifier: &str) -> Result<Vec<u64>, PackingError> {
    pack(profile, identifier.as_bytes())
}

/// [`unpack`] for UTF-8 identifiers.
pub fn unpack_str(profile: PackingProfile, elements: &[u64]) -> Result<String, PackingError> {
    String::from_utf8(unpack(profile, elements)?).map_err(|_| PackingError::InvalidUtf8)
}

//! Error correction code implementations.
//!
//! This module provides the extended Hamming codes and their building blocks:
//! - Bit layouts that scatter message bits around the parity positions
//! - Syndrome calculation over a codeword
//! - The (32,26) and (64,57) SECDED codecs
//! - Stream framing of byte streams into back-to-back codewords
//!
//! # Error Correction Algorithms
//!
//! An extended Hamming code places a parity bit at every power-of-two
//! position of the codeword, so that the XOR of the indices of all set bits
//! is zero for a valid codeword. A single flipped bit makes that XOR equal
//! to the index of the flipped bit. One additional overall-parity bit at
//! index 0 tells single errors (odd parity) apart from double errors (even
//! parity).
//!
//! # Examples
//!
//! ```rust
//! use hamming_fec::ecc::{encode64, decode64};
//!
//! let message = (1u64 << 57) - 1;
//! let codeword = encode64(message).unwrap();
//! assert_eq!(decode64(codeword ^ (1 << 40)).unwrap(), message);
//! ```

use crate::error::Error;

/// Result type for error correction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod hamming;
pub mod layout;
pub mod stream;
pub mod syndrome;
pub mod word;

pub use hamming::{
    decode, decode64, encode, encode64, Correction, Decoded, ExtendedHamming, Hamming32,
    Hamming64,
};
pub use layout::BitLayout;
pub use stream::{
    decode_file, decode_stream, encode_file, encode_stream, StreamFramer, StreamStats, TrimPolicy,
};
pub use syndrome::{check, check64};
pub use word::Word;

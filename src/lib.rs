//! Extended Hamming (SECDED) error correction over 32-bit and 64-bit words.
//!
//! Two fixed code variants are provided:
//! - a 32-bit codeword carrying 26 data bits
//! - a 64-bit codeword carrying 57 data bits
//!
//! Both correct any single flipped bit and detect any two flipped bits. A
//! stream framing layer packs arbitrary byte streams into back-to-back
//! codewords and restores them again.
//!
//! # Examples
//!
//! ```
//! use hamming_fec::{decode, encode};
//!
//! let codeword = encode(0x3FF_FFFF).unwrap();
//! assert_eq!(decode(codeword ^ (1 << 5)).unwrap(), 0x3FF_FFFF);
//! assert!(decode(codeword ^ (1 << 5) ^ (1 << 9)).is_err());
//! ```

pub mod ecc;
pub mod error;

pub use ecc::{
    check, check64, decode, decode64, decode_file, decode_stream, encode, encode64, encode_file,
    encode_stream, BitLayout, Correction, Decoded, ErrorCorrection, ExtendedHamming, Hamming32,
    Hamming64, StreamFramer, StreamStats, TrimPolicy, Word,
};
pub use error::{Error, Result};

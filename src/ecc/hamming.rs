//! Extended Hamming (SECDED) code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! Parity bits sit at the power-of-two positions of the codeword, so that the XOR of the
//! indices of all set bits is zero for a valid codeword. The extended variant adds an overall
//! parity bit, which lets the decoder correct any single-bit error and detect any double-bit
//! error.
//!
//! This implementation provides two fixed variants:
//! - (32,26): 26 data bits in a `u32` (81.3% data)
//! - (64,57): 57 data bits in a `u64` (89.1% data)
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Satellite communications
//! - Data storage systems
//!
//! # Examples
//!
//! ```
//! use hamming_fec::ecc::hamming::{Correction, Hamming32};
//!
//! let code = Hamming32::new();
//! let codeword = code.encode(0x155_5555).unwrap();
//!
//! let decoded = code.decode_detailed(codeword ^ (1 << 12)).unwrap();
//! assert_eq!(decoded.message, 0x155_5555);
//! assert_eq!(decoded.correction, Correction::Corrected { bit: 12 });
//! ```

use crate::ecc::layout::BitLayout;
use crate::ecc::syndrome::fold;
use crate::ecc::word::Word;
use crate::ecc::Result;
use crate::error::Error;
use log::{debug, warn};
use std::marker::PhantomData;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of decoding one codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Zero syndrome, even parity
    Clean,
    /// A single flipped bit was found and flipped back
    Corrected { bit: u32 },
    /// Zero syndrome, odd parity: only the overall parity bit is off
    ParityBit,
}

impl Correction {
    /// Whether the received codeword differed from a valid one
    pub fn is_corrected(&self) -> bool {
        !matches!(self, Correction::Clean)
    }
}

/// A decoded message together with how it was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<W> {
    pub message: W,
    pub correction: Correction,
}

/// Extended Hamming code whose codeword fills one `W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedHamming<W: Word> {
    layout: BitLayout,
    _word: PhantomData<W>,
}

/// The (32,26) code
pub type Hamming32 = ExtendedHamming<u32>;

/// The (64,57) code
pub type Hamming64 = ExtendedHamming<u64>;

impl<W: Word> Default for ExtendedHamming<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> ExtendedHamming<W> {
    /// Creates the code for the container width of `W`.
    pub const fn new() -> Self {
        ExtendedHamming {
            layout: BitLayout::for_width(W::BITS),
            _word: PhantomData,
        }
    }

    /// Gets the bit layout of a codeword
    pub fn layout(&self) -> &BitLayout {
        &self.layout
    }

    /// Number of message bits per codeword
    pub fn data_bits(&self) -> u32 {
        self.layout.data_bits()
    }

    /// Number of bits per codeword
    pub fn code_bits(&self) -> u32 {
        self.layout.code_bits()
    }

    /// Largest message accepted by `encode`
    pub fn max_message(&self) -> W {
        W::truncate(self.layout.max_message())
    }

    /// Encodes a message of at most `data_bits` bits.
    ///
    /// # Returns
    ///
    /// A codeword with syndrome zero and even parity, or `InputTooWide` if the
    /// message does not fit.
    pub fn encode(&self, message: W) -> Result<W> {
        let mut data = self.layout.expand(message.widen())?;

        // Figure out which parity bits need to be set
        let correction = fold(data);
        for k in 0..self.layout.parity_groups() {
            if correction >> k & 1 == 1 {
                data ^= 1u64 << (1u32 << k);
            }
        }

        // Extended code: make the total parity even
        data |= u64::from(data.count_ones() & 1);

        Ok(W::truncate(data))
    }

    /// Decodes a codeword, correcting a single-bit error.
    ///
    /// Fails with `Uncorrectable` when two bits (or any other even number of
    /// bits that does not cancel out in the syndrome) were flipped.
    pub fn decode(&self, codeword: W) -> Result<W> {
        self.decode_detailed(codeword).map(|decoded| decoded.message)
    }

    /// Decodes a codeword and reports which correction, if any, was applied.
    pub fn decode_detailed(&self, codeword: W) -> Result<Decoded<W>> {
        let mut data = codeword.widen();
        let odd_parity = data.count_ones() & 1 == 1;
        let syndrome = fold(data);

        let correction = match (syndrome, odd_parity) {
            (0, false) => Correction::Clean,
            (0, true) => {
                debug!("Overall parity bit flipped in codeword {:#x}", data);
                Correction::ParityBit
            }
            (bit, true) => {
                debug!("Input requires correction, bit {} was flipped", bit);
                data ^= 1u64 << bit;
                Correction::Corrected { bit }
            }
            (syndrome, false) => {
                warn!(
                    "At least 2 bits flipped in codeword {:#x}, unable to decode",
                    data
                );
                return Err(Error::Uncorrectable {
                    codeword: data,
                    syndrome,
                });
            }
        };

        Ok(Decoded {
            message: W::truncate(self.layout.compress(data)),
            correction,
        })
    }

    /// Encodes many messages across the rayon thread pool.
    ///
    /// On failure the error of the first bad message in input order is returned.
    #[cfg(feature = "parallel")]
    pub fn encode_batch(&self, messages: &[W]) -> Result<Vec<W>> {
        messages
            .par_iter()
            .map(|&message| self.encode(message))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Decodes many codewords across the rayon thread pool.
    ///
    /// On failure the error of the first bad codeword in input order is returned.
    #[cfg(feature = "parallel")]
    pub fn decode_batch(&self, codewords: &[W]) -> Result<Vec<W>> {
        codewords
            .par_iter()
            .map(|&codeword| self.decode(codeword))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }
}

const HAMMING_32: Hamming32 = ExtendedHamming::new();
const HAMMING_64: Hamming64 = ExtendedHamming::new();

/// Encodes an up to 26 bit message using the (32,26) code
pub fn encode(message: u32) -> Result<u32> {
    HAMMING_32.encode(message)
}

/// Decodes a (32,26) codeword, correcting a single-bit error
pub fn decode(codeword: u32) -> Result<u32> {
    HAMMING_32.decode(codeword)
}

/// Encodes an up to 57 bit message using the (64,57) code
pub fn encode64(message: u64) -> Result<u64> {
    HAMMING_64.encode(message)
}

/// Decodes a (64,57) codeword, correcting a single-bit error
pub fn decode64(codeword: u64) -> Result<u64> {
    HAMMING_64.decode(codeword)
}

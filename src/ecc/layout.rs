//! Placement of message bits inside a codeword.
//!
//! Bit 0 of a codeword is the overall parity bit and the power-of-two
//! positions 1, 2, 4, ... W/2 hold the group parity bits. Message bits fill
//! every remaining position in ascending order:
//!
//! ```text
//! message:  |a|b|c|d|e|f|g|h|i|j|k|...
//! codeword: |x|p|p|a|p|b|c|d|p|e|f|g|h|i|j|k|...
//! ```
//!
//! `x` is the overall parity bit and `p` a group parity bit. Between two
//! consecutive parity positions `2^k` and `2^(k+1)` lies a contiguous run of
//! `2^k - 1` message bits, all shifted by the same amount, so the portable
//! scatter/gather is a handful of shift-and-mask steps. On x86_64 CPUs with
//! BMI2 the same mapping is a single `pdep`/`pext` instruction.

use crate::ecc::Result;
use crate::error::Error;

/// Partition of a codeword into parity and data bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    /// Number of message bits carried by a codeword
    data_bits: u32,
    /// Total width of the codeword
    code_bits: u32,
    /// Set bits mark the data positions of the codeword
    data_mask: u64,
}

impl BitLayout {
    /// Layout of the (32,26) code
    pub const HAMMING_32: BitLayout = BitLayout::for_width(32);

    /// Layout of the (64,57) code
    pub const HAMMING_64: BitLayout = BitLayout::for_width(64);

    /// Creates the layout for a (data bits, code bits) pair.
    ///
    /// Only the two extended Hamming shapes (26,32) and (57,64) are accepted.
    pub fn new(data_bits: u32, code_bits: u32) -> Result<Self> {
        if code_bits != 32 && code_bits != 64 {
            return Err(Error::InvalidInput(format!(
                "Code width must be 32 or 64 bits, got {}",
                code_bits
            )));
        }

        let layout = Self::for_width(code_bits);
        if layout.data_bits != data_bits {
            return Err(Error::InvalidInput(format!(
                "A {}-bit codeword carries {} data bits, not {}",
                code_bits, layout.data_bits, data_bits
            )));
        }

        Ok(layout)
    }

    /// Builds the layout of a power-of-two codeword width of at most 64 bits.
    pub(crate) const fn for_width(code_bits: u32) -> Self {
        let groups = code_bits.trailing_zeros();

        let mut data_mask = u64::MAX >> (64 - code_bits);
        data_mask &= !1;
        let mut k = 0;
        while k < groups {
            data_mask &= !(1u64 << (1u32 << k));
            k += 1;
        }

        Self {
            data_bits: code_bits - groups - 1,
            code_bits,
            data_mask,
        }
    }

    /// Number of message bits per codeword
    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// Width of the codeword in bits
    pub fn code_bits(&self) -> u32 {
        self.code_bits
    }

    /// Mask with a set bit at every data position
    pub fn data_mask(&self) -> u64 {
        self.data_mask
    }

    /// Number of group parity bits (excluding the overall parity bit)
    pub fn parity_groups(&self) -> u32 {
        self.code_bits.trailing_zeros()
    }

    /// Largest message that fits in the layout
    pub fn max_message(&self) -> u64 {
        (1u64 << self.data_bits) - 1
    }

    /// All parity positions: 0 for the overall parity, then 1, 2, 4, ...
    pub fn parity_positions(&self) -> impl Iterator<Item = u32> {
        std::iter::once(0).chain((0..self.parity_groups()).map(|k| 1u32 << k))
    }

    /// Scatters the message bits into the data positions of an empty codeword.
    ///
    /// Fails with `InputTooWide` when the message has bits above `data_bits`.
    pub fn expand(&self, message: u64) -> Result<u64> {
        if message >> self.data_bits != 0 {
            return Err(Error::InputTooWide {
                value: message,
                data_bits: self.data_bits,
            });
        }

        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        if bmi2::available() {
            // SAFETY: the CPU supports BMI2.
            return Ok(unsafe { bmi2::deposit(message, self.data_mask) });
        }

        Ok(self.scatter(message))
    }

    /// Gathers the data positions of a codeword into a contiguous message.
    ///
    /// Parity positions are ignored.
    pub fn compress(&self, codeword: u64) -> u64 {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        if bmi2::available() {
            // SAFETY: the CPU supports BMI2.
            return unsafe { bmi2::extract(codeword, self.data_mask) };
        }

        self.gather(codeword)
    }

    /// Portable scatter; run `k` covers data bits `2^k - 1 - k ..` and moves up by `k + 2`.
    fn scatter(&self, message: u64) -> u64 {
        let mut codeword = 0;
        for k in 1..self.parity_groups() {
            codeword |= (message & Self::run_mask(k)) << (k + 2);
        }
        codeword
    }

    fn gather(&self, codeword: u64) -> u64 {
        let mut message = 0;
        for k in 1..self.parity_groups() {
            message |= (codeword >> (k + 2)) & Self::run_mask(k);
        }
        message
    }

    /// Message bits that land between parity positions `2^k` and `2^(k+1)`.
    fn run_mask(k: u32) -> u64 {
        let len = (1u32 << k) - 1;
        ((1u64 << len) - 1) << (len - k)
    }
}

/// Whether `expand`/`compress` run on the BMI2 fast path.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub fn accelerated() -> bool {
    bmi2::available()
}

/// Whether `expand`/`compress` run on the BMI2 fast path.
#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
pub fn accelerated() -> bool {
    false
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod bmi2 {
    use std::arch::x86_64::{_pdep_u64, _pext_u64};

    pub fn available() -> bool {
        std::is_x86_feature_detected!("bmi2")
    }

    #[target_feature(enable = "bmi2")]
    pub unsafe fn deposit(value: u64, mask: u64) -> u64 {
        _pdep_u64(value, mask)
    }

    #[target_feature(enable = "bmi2")]
    pub unsafe fn extract(value: u64, mask: u64) -> u64 {
        _pext_u64(value, mask)
    }
}

//! Codeword containers.
//!
//! A code variant is identified by its container type: `u32` for the (32,26)
//! code and `u64` for the (64,57) code. All bit manipulation happens on the
//! value widened to `u64`.

use num_traits::{PrimInt, Unsigned};
use std::fmt::{Binary, Debug, LowerHex};

/// Unsigned integer that holds one codeword.
pub trait Word: PrimInt + Unsigned + Debug + Binary + LowerHex + Send + Sync + 'static {
    /// Width of the container in bits
    const BITS: u32;

    /// Width of the container in bytes
    const BYTES: usize = (Self::BITS / 8) as usize;

    /// Zero-extends the value to 64 bits.
    fn widen(self) -> u64;

    /// Keeps the low `BITS` bits of `value`.
    fn truncate(value: u64) -> Self;

    /// Byte array of one container, `[u8; BYTES]`
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy;

    /// Builds a value from its little-endian bytes.
    fn from_le_array(bytes: Self::Bytes) -> Self;

    /// Little-endian bytes of the value.
    fn to_le_array(self) -> Self::Bytes;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(
            impl Word for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn widen(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn truncate(value: u64) -> Self {
                    value as $t
                }

                type Bytes = [u8; std::mem::size_of::<$t>()];

                #[inline]
                fn from_le_array(bytes: Self::Bytes) -> Self {
                    <$t>::from_le_bytes(bytes)
                }

                #[inline]
                fn to_le_array(self) -> Self::Bytes {
                    self.to_le_bytes()
                }
            }
        )*
    };
}

impl_word!(u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(<u32 as Word>::BITS, 32);
        assert_eq!(<u32 as Word>::BYTES, 4);
        assert_eq!(<u64 as Word>::BITS, 64);
        assert_eq!(<u64 as Word>::BYTES, 8);
    }

    #[test]
    fn test_truncate_keeps_low_bits() {
        assert_eq!(<u32 as Word>::truncate(0x1_2345_6789), 0x2345_6789);
        assert_eq!(<u64 as Word>::truncate(u64::MAX), u64::MAX);
        assert_eq!(0xFFFF_FFFFu32.widen(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_little_endian_layout() {
        assert_eq!(0x0403_0201u32.to_le_array(), [1, 2, 3, 4]);
        assert_eq!(<u32 as Word>::from_le_array([1, 2, 3, 4]), 0x0403_0201);

        let bytes = 0x0807_0605_0403_0201u64.to_le_array();
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bytes.len(), <u64 as Word>::BYTES);
        assert_eq!(<u64 as Word>::from_le_array(bytes), 0x0807_0605_0403_0201);
    }
}

//! Syndrome calculation.
//!
//! The syndrome of a word is the XOR of the indices of all its set bits. With
//! parity bits at every power-of-two position, a valid codeword has syndrome
//! zero and a word with exactly one flipped bit has the index of that bit as
//! its syndrome.

use crate::ecc::word::Word;

/// XOR-fold of the indices of all set bits of `word`.
#[inline]
pub fn syndrome<W: Word>(word: W) -> u32 {
    fold(word.widen())
}

/// Syndrome of a (32,26) codeword
pub fn check(word: u32) -> u32 {
    syndrome(word)
}

/// Syndrome of a (64,57) codeword
pub fn check64(word: u64) -> u32 {
    syndrome(word)
}

#[inline]
pub(crate) fn fold(mut word: u64) -> u32 {
    let mut result = 0;
    while word != 0 {
        result ^= word.trailing_zeros();
        word &= word - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Walks every bit of the full width.
    fn naive(mut word: u64, width: u32) -> u32 {
        let mut result = 0;
        for i in 0..width {
            if word & 1 == 1 {
                result ^= i;
            }
            word >>= 1;
        }
        result
    }

    #[test]
    fn test_zero_and_single_bits() {
        assert_eq!(check(0), 0);
        assert_eq!(check64(0), 0);
        for bit in 0..32 {
            assert_eq!(check(1 << bit), bit);
        }
        for bit in 0..64 {
            assert_eq!(check64(1 << bit), bit);
        }
    }

    #[test]
    fn test_known_values() {
        // 3 ^ 5 ^ 6 = 0
        assert_eq!(check(0b0110_1000), 0);
        // 1 ^ 2 = 3
        assert_eq!(check(0b110), 3);
        assert_eq!(check(u32::MAX), 0);
        assert_eq!(check64(u64::MAX), 0);
    }

    #[test]
    fn test_matches_full_width_walk() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..5000 {
            let word: u64 = rng.gen();
            assert_eq!(check64(word), naive(word, 64));
            assert_eq!(check(word as u32), naive(word as u32 as u64, 32));
        }
    }

    #[test]
    fn test_result_stays_below_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1000 {
            assert!(check(rng.gen()) < 32);
            assert!(check64(rng.gen()) < 64);
        }
    }
}

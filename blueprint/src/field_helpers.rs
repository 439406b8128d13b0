//! Field element helpers used by the components.

use ark_ff::{BigInteger, PrimeField};

/// Bit level access to prime field elements
pub trait FieldHelpers<F> {
    /// Little endian bits of the canonical representative
    fn to_bits_le(&self) -> Vec<bool>;

    /// Position of the highest set bit plus one (0 for zero)
    fn num_bits(&self) -> usize;

    /// Whether the canonical representative is smaller than `2^bits`
    fn fits_in_bits(&self, bits: usize) -> bool {
        self.num_bits() <= bits
    }
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn to_bits_le(&self) -> Vec<bool> {
        self.into_bigint().to_bits_le()
    }

    fn num_bits(&self) -> usize {
        self.into_bigint().num_bits() as usize
    }
}

/// `2^k` in the field
pub fn two_pow<F: PrimeField>(k: usize) -> F {
    F::from(2u64).pow([k as u64])
}

/// Maps a signed integer to the field, negative values becoming `p - |i|`
pub fn i64_to_field<F: PrimeField>(i: i64) -> F {
    if i >= 0 {
        F::from(i as u64)
    } else {
        -F::from(i.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr as Fp;
    use ark_ff::{One, Zero};

    #[test]
    fn test_bits() {
        let x = Fp::from(0b1011u64);
        assert_eq!(&x.to_bits_le()[..5], &[true, true, false, true, false]);
        assert_eq!(x.num_bits(), 4);
        assert!(x.fits_in_bits(4));
        assert!(!x.fits_in_bits(3));
        assert_eq!(Fp::zero().num_bits(), 0);
        assert!(Fp::zero().fits_in_bits(0));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(two_pow::<Fp>(0), Fp::one());
        assert_eq!(two_pow::<Fp>(10), Fp::from(1024u64));
        assert_eq!(i64_to_field::<Fp>(-1), -Fp::one());
        assert_eq!(i64_to_field::<Fp>(-5) + Fp::from(5u64), Fp::zero());
        assert_eq!(i64_to_field::<Fp>(42), Fp::from(42u64));
    }
}

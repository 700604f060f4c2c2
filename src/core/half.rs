//! Half-precision (binary16) to single-precision (binary32) conversion.
//!
//! The conversion works on raw bit patterns: the 5-bit exponent is rebiased from 15 to 127,
//! subnormal halves are renormalised, and NaN/Inf keep their payload and sign.

use serde::{Deserialize, Serialize};

const MANTISSA_MASK: u32 = 0x03ff;
const EXPONENT_MASK: u32 = 0x7c00;
const SIGN_MASK: u32 = 0x8000;

/// Exponent field of a single NaN/Inf, in the 10-bit-shifted half layout.
const NAN_INF_EXPONENT: u32 = 0x3fc00;
/// `(127 - 15) << 10`
const EXPONENT_REBIAS: u32 = 0x1c000;
/// Exponent a subnormal starts from before renormalisation, i.e. `(127 - 15 + 1) << 10`.
const SUBNORMAL_EXPONENT: u32 = 0x1c400;
const HIDDEN_BIT: u32 = 0x0400;


/// Selects how normal half values with a zero mantissa are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfFloatMode {
    /// Exact IEEE-754 widening.
    #[default]
    Ieee,
    /// Reproduces the legacy tool, which fills the low ten mantissa bits of the result
    /// with ones whenever the half mantissa is zero and the half exponent field is at least 2.
    /// `0x3c00` therefore widens to `0x3f8003ff` rather than `1.0`.
    Legacy,
}

impl HalfFloatMode {
    #[inline]
    pub fn convert(self, bits: u16) -> f32 {
        match self {
            HalfFloatMode::Ieee => half_to_f32(bits),
            HalfFloatMode::Legacy => half_to_f32_legacy(bits),
        }
    }
}


/// Widens a binary16 bit pattern to an `f32`. Bit-exact for every non-NaN input;
/// NaN inputs produce a NaN with the same sign and payload.
#[inline]
pub fn half_to_f32(bits: u16) -> f32 {
    f32::from_bits(widen(bits, false))
}

/// Widens a binary16 bit pattern the way the legacy tool did. See [`HalfFloatMode::Legacy`].
#[inline]
pub fn half_to_f32_legacy(bits: u16) -> f32 {
    f32::from_bits(widen(bits, true))
}

fn widen(bits: u16, smooth_transition: bool) -> u32 {
    let bits = bits as u32;
    let sign = (bits & SIGN_MASK) << 16;
    let mut mant = bits & MANTISSA_MASK;
    let mut exp = bits & EXPONENT_MASK;

    if exp == EXPONENT_MASK {
        exp = NAN_INF_EXPONENT;
    } else if exp != 0 {
        exp += EXPONENT_REBIAS;
        if smooth_transition && mant == 0 && exp > SUBNORMAL_EXPONENT {
            return sign | (exp << 13) | MANTISSA_MASK;
        }
    } else if mant != 0 {
        exp = SUBNORMAL_EXPONENT;
        loop {
            mant <<= 1;
            exp -= HIDDEN_BIT;
            if mant & HIDDEN_BIT != 0 {
                break;
            }
        }
        mant &= MANTISSA_MASK;
    }
    // +-0 falls through with both fields zero.

    sign | ((exp | mant) << 13)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero() {
        assert_eq!(half_to_f32(0x0000).to_bits(), 0.0f32.to_bits());
        assert_eq!(half_to_f32(0x8000).to_bits(), (-0.0f32).to_bits());
        assert_eq!(half_to_f32_legacy(0x0000).to_bits(), 0.0f32.to_bits());
        assert_eq!(half_to_f32_legacy(0x8000).to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn known_values() {
        assert_eq!(half_to_f32(0x3c00), 1.0);
        assert_eq!(half_to_f32(0xc000), -2.0);
        assert_eq!(half_to_f32(0x3800), 0.5);
        assert_eq!(half_to_f32(0x3555).to_bits(), 0x3eaaa000);
        assert_eq!(half_to_f32(0x7bff), 65504.0);
        assert_eq!(half_to_f32(0xfbff), -65504.0);
        // smallest subnormal and smallest normal
        assert_eq!(half_to_f32(0x0001).to_bits(), 0x33800000);
        assert_eq!(half_to_f32(0x8001).to_bits(), 0xb3800000);
        assert_eq!(half_to_f32(0x03ff).to_bits(), 0x387fc000);
        assert_eq!(half_to_f32(0x0400).to_bits(), 0x38800000);
    }

    #[test]
    fn nan_and_infinity_keep_sign() {
        assert_eq!(half_to_f32(0x7c00), f32::INFINITY);
        assert_eq!(half_to_f32(0xfc00), f32::NEG_INFINITY);
        for bits in [0x7c01u16, 0x7e00, 0x7fff] {
            let v = half_to_f32(bits);
            assert!(v.is_nan());
            assert!(v.is_sign_positive());
        }
        for bits in [0xfc01u16, 0xfe00, 0xffff] {
            let v = half_to_f32(bits);
            assert!(v.is_nan());
            assert!(v.is_sign_negative());
        }
        assert_eq!(half_to_f32(0x7e00).to_bits(), 0x7fc00000);
    }

    #[test]
    fn matches_half_crate_for_every_pattern() {
        for bits in 0..=u16::MAX {
            let ours = half_to_f32(bits);
            let reference = ::half::f16::from_bits(bits).to_f32();
            if reference.is_nan() {
                assert!(ours.is_nan(), "{bits:#06x}");
                assert_eq!(ours.is_sign_negative(), reference.is_sign_negative(), "{bits:#06x}");
            } else {
                assert_eq!(ours.to_bits(), reference.to_bits(), "{bits:#06x}");
            }
        }
    }

    #[test]
    fn legacy_smooth_transition() {
        assert_eq!(half_to_f32_legacy(0x3c00).to_bits(), 0x3f8003ff);
        assert_eq!(half_to_f32_legacy(0xc000).to_bits(), 0xc00003ff);
        // exponent field 1 is not affected
        assert_eq!(half_to_f32_legacy(0x0400).to_bits(), half_to_f32(0x0400).to_bits());
        // non-zero mantissas are not affected
        assert_eq!(half_to_f32_legacy(0x3c01).to_bits(), half_to_f32(0x3c01).to_bits());
        assert_eq!(half_to_f32_legacy(0x0001).to_bits(), half_to_f32(0x0001).to_bits());
        assert_eq!(half_to_f32_legacy(0x7c00), f32::INFINITY);
    }

    #[test]
    fn mode_dispatch() {
        assert_eq!(HalfFloatMode::default(), HalfFloatMode::Ieee);
        assert_eq!(HalfFloatMode::Ieee.convert(0x3c00), 1.0);
        assert_eq!(HalfFloatMode::Legacy.convert(0x3c00).to_bits(), 0x3f8003ff);
    }
}

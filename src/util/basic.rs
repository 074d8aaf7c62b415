pub const HE_MOD_BIT_COUNT_MAX: usize = 61;

pub const HE_PRNG_SEED_BYTES: usize = 64;

#[inline]
pub fn get_significant_bit_count(value: u64) -> usize {
    if value == 0 {0}
    else {64 - value.leading_zeros() as usize}
}

#[inline]
pub fn add_u64(operand1: u64, operand2: u64, result: &mut u64) -> u8 {
    let (sum, carry) = operand1.overflowing_add(operand2);
    *result = sum;
    carry as u8
}

#[inline]
pub fn multiply_u64_high_word(operand1: u64, operand2: u64, hw64: &mut u64) {
    *hw64 = (((operand1 as u128) * (operand2 as u128)) >> 64) as u64;
}

#[inline]
pub fn multiply_u64_u64(operand1: u64, operand2: u64, result128: &mut [u64]) {
    let product = (operand1 as u128) * (operand2 as u128);
    result128[0] = product as u64;
    result128[1] = (product >> 64) as u64;
}

/// Returns floor(2^128 / denominator) as two words followed by the remainder.
pub fn barrett_ratio_u128(denominator: u64) -> [u64; 3] {
    let d = denominator as u128;
    let mut quotient = u128::MAX / d;
    let mut remainder = u128::MAX % d + 1;
    if remainder == d {
        quotient += 1;
        remainder = 0;
    }
    [quotient as u64, (quotient >> 64) as u64, remainder as u64]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_bit_count() {
        assert_eq!(get_significant_bit_count(0), 0);
        assert_eq!(get_significant_bit_count(1), 1);
        assert_eq!(get_significant_bit_count(2), 2);
        assert_eq!(get_significant_bit_count(97), 7);
        assert_eq!(get_significant_bit_count(u64::MAX), 64);
    }

    #[test]
    fn test_barrett_ratio() {
        assert_eq!(barrett_ratio_u128(2), [0, 1 << 63, 0]);
        assert_eq!(barrett_ratio_u128(3), [6148914691236517205, 6148914691236517205, 1]);
        assert_eq!(barrett_ratio_u128(0xF00000F00000F), [1224979098644774929, 4369, 281470698520321]);
        assert_eq!(barrett_ratio_u128(0xF00000F000079), [1224979096621368355, 4369, 1144844808538997]);
    }

    #[test]
    fn test_multiply_u64_u64() {
        let mut result = [0, 0];
        multiply_u64_u64(u64::MAX, u64::MAX, &mut result);
        assert_eq!(result, [1, u64::MAX - 1]);
        let mut hw = 0;
        multiply_u64_high_word(u64::MAX, 2, &mut hw);
        assert_eq!(hw, 1);
    }
}

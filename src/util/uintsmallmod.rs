use crate::modulus::Modulus;
use crate::util;

#[inline]
pub fn add_u64_mod(mut operand1: u64, operand2: u64, modulus: &Modulus) -> u64 {
    operand1 += operand2;
    if operand1 >= modulus.value() {operand1 - modulus.value()} else {operand1}
}

/** `operand` must be at most modulus */
#[inline]
pub fn negate_u64_mod(operand: u64, modulus: &Modulus) -> u64 {
    if operand == 0 {0} else {modulus.value() - operand}
}

pub fn barrett_reduce_u128(input: &[u64], modulus: &Modulus) -> u64 {
    // Reduces input using base 2^64 Barrett reduction
    // input allocation size must be 128 bits
    let mut tmp1 = 0;
    let mut tmp2 = [0, 0];
    let mut tmp3;
    let mut carry = 0;
    let const_ratio = modulus.const_ratio();

    // Round 1
    util::multiply_u64_high_word(input[0], const_ratio[0], &mut carry);
    util::multiply_u64_u64(input[0], const_ratio[1], &mut tmp2);
    tmp3 = tmp2[1] + util::add_u64(tmp2[0], carry, &mut tmp1) as u64;

    // Round 2
    util::multiply_u64_u64(input[1], const_ratio[0], &mut tmp2);
    carry = tmp2[1] + util::add_u64(tmp1, tmp2[0], &mut tmp1) as u64;

    // This is all we care about
    tmp1 = input[1].wrapping_mul(const_ratio[1]).wrapping_add(tmp3).wrapping_add(carry);

    // Barrett subtraction
    tmp3 = input[0].wrapping_sub(tmp1.wrapping_mul(modulus.value()));

    // One more subtraction is enough
    if tmp3 >= modulus.value() {tmp3 - modulus.value()} else {tmp3}
}

#[inline]
pub fn barrett_reduce_u64(input: u64, modulus: &Modulus) -> u64 {
    // floor(2^64 / mod) == floor( floor(2^128 / mod) )
    let mut high = 0;
    util::multiply_u64_high_word(input, modulus.const_ratio()[1], &mut high);
    let reduced = input - high * modulus.value();
    if reduced >= modulus.value() {reduced - modulus.value()} else {reduced}
}

/**
Returns operand1 * operand2 mod modulus.
The product is formed in 128 bits, so any pair of u64 inputs is accepted.
*/
#[inline]
pub fn multiply_u64_mod(operand1: u64, operand2: u64, modulus: &Modulus) -> u64 {
    let mut z = [0, 0];
    util::multiply_u64_u64(operand1, operand2, &mut z);
    barrett_reduce_u128(&z, modulus)
}

/**
Returns operand^exponent mod modulus.
Correctness: Follows the condition of barrett_reduce_128.
*/
pub fn exponentiate_u64_mod(operand: u64, mut exponent: u64, modulus: &Modulus) -> u64 {
    if exponent == 0 {return 1;}
    if exponent == 1 {return barrett_reduce_u64(operand, modulus);}
    let mut power = operand; let mut product; let mut intermediate = 1;
    loop {
        if (exponent & 1) > 0 {
            product = multiply_u64_mod(power, intermediate, modulus);
            std::mem::swap(&mut product, &mut intermediate);
        }
        exponent >>= 1;
        if exponent == 0 {break;}
        product = multiply_u64_mod(power, power, modulus);
        std::mem::swap(&mut product, &mut power);
    }
    intermediate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_u64_mod() {
        let m = Modulus::new(2);
        assert_eq!(multiply_u64_mod(0, 0, &m), 0);
        assert_eq!(multiply_u64_mod(1, 1, &m), 1);
        assert_eq!(multiply_u64_mod(u64::MAX, u64::MAX, &m), 1);

        let m = Modulus::new(97);
        assert_eq!(multiply_u64_mod(25, 25, &m), 43);
        assert_eq!(multiply_u64_mod(96, 96, &m), 1);

        let m = Modulus::new(0x1FFFFFFFFFFFFFFF);
        assert_eq!(multiply_u64_mod(0x1FFFFFFFFFFFFFFE, 0x1FFFFFFFFFFFFFFE, &m), 1);
        let big = 0x1FFFFFFFFFFFFFFEu128;
        let expected = ((big * big) % 0x1FFFFFFFFFFFFFFF) as u64;
        assert_eq!(multiply_u64_mod(0x1FFFFFFFFFFFFFFE, 0x1FFFFFFFFFFFFFFE, &m), expected);
    }

    #[test]
    fn test_barrett_reduce_u64() {
        let m = Modulus::new(97);
        assert_eq!(barrett_reduce_u64(0, &m), 0);
        assert_eq!(barrett_reduce_u64(97, &m), 0);
        assert_eq!(barrett_reduce_u64(625, &m), 43);
        assert_eq!(barrett_reduce_u64(u64::MAX, &m), u64::MAX % 97);
    }

    #[test]
    fn test_exponentiate_u64_mod() {
        let m = Modulus::new(97);
        assert_eq!(exponentiate_u64_mod(5, 0, &m), 1);
        assert_eq!(exponentiate_u64_mod(5, 1, &m), 5);
        assert_eq!(exponentiate_u64_mod(5, 3, &m), 28);
        assert_eq!(exponentiate_u64_mod(5, 4, &m), 43);
        // Fermat
        assert_eq!(exponentiate_u64_mod(3, 96, &m), 1);

        let m = Modulus::new(5);
        assert_eq!(exponentiate_u64_mod(4, 0xFFFFFFFFFFFFFFFF, &m), 4);
        assert_eq!(exponentiate_u64_mod(4, 0xFFFFFFFFFFFFFFFE, &m), 1);
    }

    #[test]
    fn test_negate_and_add() {
        let m = Modulus::new(97);
        assert_eq!(negate_u64_mod(0, &m), 0);
        assert_eq!(negate_u64_mod(1, &m), 96);
        assert_eq!(add_u64_mod(96, 96, &m), 95);
    }
}

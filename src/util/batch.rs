//! Element-wise modular arithmetic over slot vectors.
//!
//! The length checks here guard a programming contract: all batch vectors of
//! one computation share the slot count. A mismatch panics.

use crate::Modulus;
use crate::util;

pub fn modulo(values: &[u64], modulus: &Modulus, result: &mut [u64]) {
    assert_eq!(values.len(), result.len(), "[Invalid argument] Batch length mismatch.");
    result.iter_mut().zip(values.iter()).for_each(|(r, &v)| *r = modulus.reduce(v));
}

pub fn modulo_inplace(values: &mut [u64], modulus: &Modulus) {
    values.iter_mut().for_each(|v| *v = modulus.reduce(*v));
}

pub fn square(values: &[u64], modulus: &Modulus, result: &mut [u64]) {
    assert_eq!(values.len(), result.len(), "[Invalid argument] Batch length mismatch.");
    result.iter_mut().zip(values.iter()).for_each(|(r, &v)| *r = util::multiply_u64_mod(v, v, modulus));
}

pub fn square_inplace(values: &mut [u64], modulus: &Modulus) {
    values.iter_mut().for_each(|v| *v = util::multiply_u64_mod(*v, *v, modulus));
}

pub fn dyadic_product(comp1: &[u64], comp2: &[u64], modulus: &Modulus, result: &mut [u64]) {
    assert_eq!(comp1.len(), comp2.len(), "[Invalid argument] Batch length mismatch.");
    assert_eq!(comp1.len(), result.len(), "[Invalid argument] Batch length mismatch.");
    for i in 0..result.len() {
        result[i] = util::multiply_u64_mod(comp1[i], comp2[i], modulus);
    }
}

pub fn dyadic_product_inplace(comp1: &mut [u64], comp2: &[u64], modulus: &Modulus) {
    assert_eq!(comp1.len(), comp2.len(), "[Invalid argument] Batch length mismatch.");
    comp1.iter_mut().zip(comp2.iter()).for_each(|(a, &b)| *a = util::multiply_u64_mod(*a, b, modulus));
}

/// Raises every slot to `exponent` by square-and-multiply.
/// An exponent of zero yields the all-ones vector.
pub fn exponentiate(values: &[u64], exponent: u64, modulus: &Modulus, result: &mut [u64]) {
    assert_eq!(values.len(), result.len(), "[Invalid argument] Batch length mismatch.");
    result.iter_mut().zip(values.iter()).for_each(|(r, &v)| *r = util::exponentiate_u64_mod(v, exponent, modulus));
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn get_random_vector(size: usize, modulus: u64) -> Vec<u64> {
        let mut rng = rand::thread_rng();
        (0..size).map(|_| rng.gen::<u64>() % modulus).collect()
    }

    #[test]
    fn test_square() {
        let m = Modulus::new(97);
        let mut r = vec![0; 4];
        square(&[0, 3, 25, 96], &m, &mut r);
        assert_eq!(r, vec![0, 9, 43, 1]);
        let mut v = vec![0, 3, 25, 96];
        square_inplace(&mut v, &m);
        assert_eq!(v, r);
    }

    #[test]
    fn test_dyadic_product() {
        let m = Modulus::new(97);
        let mut r = vec![0; 2];
        dyadic_product(&[3, 5], &[9, 25], &m, &mut r);
        assert_eq!(r, vec![27, 28]);
        let mut a = vec![3, 5];
        dyadic_product_inplace(&mut a, &[9, 25], &m);
        assert_eq!(a, r);
    }

    #[test]
    #[should_panic(expected = "Batch length mismatch")]
    fn test_dyadic_product_length_mismatch() {
        let m = Modulus::new(97);
        let mut r = vec![0; 2];
        dyadic_product(&[3, 5], &[9], &m, &mut r);
    }

    #[test]
    fn test_exponentiate_matches_repeated_product() {
        let m = Modulus::new(0xF00000F000079);
        let values = get_random_vector(64, m.value());
        let mut result = vec![0; values.len()];
        let mut expected = vec![1; values.len()];
        for exponent in 0..=40 {
            exponentiate(&values, exponent, &m, &mut result);
            assert_eq!(result, expected, "exponent {}", exponent);
            dyadic_product_inplace(&mut expected, &values, &m);
        }
        // Unreduced input.
        exponentiate(&[u64::MAX], 3, &m, &mut result[..1]);
        let reduced = u64::MAX % m.value();
        let mut cube = [reduced];
        dyadic_product_inplace(&mut cube, &[reduced], &m);
        dyadic_product_inplace(&mut cube, &[reduced], &m);
        assert_eq!(result[0], cube[0]);
    }

    #[test]
    fn test_modulo() {
        let m = Modulus::new(2);
        let mut r = vec![0; 3];
        modulo(&[5, 8, u64::MAX], &m, &mut r);
        assert_eq!(r, vec![1, 0, 1]);
    }
}

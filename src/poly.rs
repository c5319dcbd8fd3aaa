//! Polynomial evaluation and interpolation over GF(2^b).

use crate::error::Result;
use crate::field::{field_add, field_div, field_mul, Tables};

/// Evaluate `coeffs[0] + coeffs[1]*x + ... + coeffs[d]*x^d` at `x` using
/// Horner's rule, starting from the highest-degree coefficient.
pub(crate) fn horner(x: u32, coeffs: &[u32], tables: &Tables) -> u32 {
    let mut result = 0u32;
    for &c in coeffs.iter().rev() {
        result = field_add(field_mul(result, x, tables), c);
    }
    result
}

/// Lagrange interpolation of the polynomial through `(xs[i], ys[i])` at `at`:
///
/// `sum_i ys[i] * prod_{j != i} (at XOR xs[j]) / (xs[i] XOR xs[j])`
///
/// Terms with `ys[i] == 0` are skipped (their contribution is zero). Callers
/// must ensure `xs` are pairwise distinct and non-zero; a duplicate `x`
/// surfaces here as `Error::FieldDivisionByZero` from the zero denominator,
/// but callers should reject duplicates earlier with a clearer error.
pub(crate) fn lagrange(at: u32, xs: &[u32], ys: &[u32], tables: &Tables, size: u32) -> Result<u32> {
    let mut sum = 0u32;
    for i in 0..xs.len() {
        if ys[i] == 0 {
            continue;
        }
        let mut term = ys[i];
        for j in 0..xs.len() {
            if i == j {
                continue;
            }
            let numerator = field_add(at, xs[j]);
            let denominator = field_add(xs[i], xs[j]);
            term = field_mul(term, field_div(numerator, denominator, tables, size)?, tables);
        }
        sum = field_add(sum, term);
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::generate_tables;

    #[test]
    fn horner_evaluates_constant_polynomial() {
        let tables = generate_tables(8);
        assert_eq!(horner(5, &[42], &tables), 42);
    }

    #[test]
    fn lagrange_recovers_constant_term_at_zero() {
        let tables = generate_tables(8);
        let size = 1u32 << 8;
        let coeffs = [200u32, 17, 99];
        let xs: Vec<u32> = vec![1, 2, 3];
        let ys: Vec<u32> = xs.iter().map(|&x| horner(x, &coeffs, &tables)).collect();
        let recovered = lagrange(0, &xs, &ys, &tables, size).unwrap();
        assert_eq!(recovered, coeffs[0]);
    }

    #[test]
    fn lagrange_evaluates_at_an_arbitrary_point() {
        let tables = generate_tables(8);
        let size = 1u32 << 8;
        let coeffs = [11u32, 222, 7];
        let xs: Vec<u32> = vec![1, 2, 3];
        let ys: Vec<u32> = xs.iter().map(|&x| horner(x, &coeffs, &tables)).collect();
        let at = 9u32;
        let expected = horner(at, &coeffs, &tables);
        let recovered = lagrange(at, &xs, &ys, &tables, size).unwrap();
        assert_eq!(recovered, expected);
    }
}

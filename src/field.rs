//! Arithmetic and table construction for GF(2^b), 3 <= b <= 20.
//!
//! Multiplication and division are implemented with exp/log tables rather
//! than shift-and-xor: see [`generate_tables`] and the primitive polynomial
//! table below
//! (<https://github.com/grempe/secrets.js/blob/master/secrets.js#L55>).

use crate::error::{Error, Result};

/// Smallest field size this crate supports, GF(2^3).
pub const MIN_BITS: u8 = 3;
/// Largest field size this crate supports, GF(2^20).
pub const MAX_BITS: u8 = 20;

/// Primitive polynomials in Galois field GF(2^n), for 3 <= n <= 20, indexed
/// by `n - MIN_BITS`. These are the same constants the canonical
/// secrets.js implementation uses.
#[rustfmt::skip]
const PRIMITIVE_POLYNOMIALS: [u32; 18] = [
    3,  // n = 3
    3,
    5,
    3,
    3,
    29,
    17,
    9,
    5,
    83,
    27,
    43,
    3,
    45,
    9,
    39,
    39,
    9,  // n = 20
];

fn primitive_polynomial(bits: u8) -> u32 {
    PRIMITIVE_POLYNOMIALS[(bits - MIN_BITS) as usize]
}

/// `2^bits`, the order of the field.
pub(crate) fn field_size(bits: u8) -> u32 {
    1u32 << bits
}

/// `2^bits - 1`, the largest valid share id and the largest field element.
pub(crate) fn field_max(bits: u8) -> u32 {
    field_size(bits) - 1
}

/// Precomputed discrete-log tables for a single field size.
///
/// `exps` is extended to length `2 * size` (rather than `size`) so that
/// `exps[a + b]` can be read directly for any `0 <= a, b <= size - 2`
/// without a modular reduction on every multiply.
#[derive(Debug, Clone)]
pub(crate) struct Tables {
    pub logs: Vec<Option<u32>>,
    pub exps: Vec<u32>,
}

/// Build the exp/log tables for GF(2^bits).
///
/// `bits` must already have been validated to lie in `[MIN_BITS, MAX_BITS]`.
pub(crate) fn generate_tables(bits: u8) -> Tables {
    let size = 1u32 << bits;
    let primitive = primitive_polynomial(bits);

    let mut logs: Vec<Option<u32>> = vec![None; size as usize];
    let mut exps: Vec<u32> = Vec::with_capacity(size as usize);

    let mut x = 1u32;
    for i in 0..size {
        exps.push(x);
        // x = 1 is produced twice (i = 0 and i = size - 1); keep the first.
        if logs[x as usize].is_none() {
            logs[x as usize] = Some(i);
        }
        x <<= 1;
        if x >= size {
            x ^= primitive;
            x &= size - 1;
        }
    }

    let doubled = exps.clone();
    exps.extend(doubled);

    Tables { logs, exps }
}

/// Field addition in GF(2^b): `a XOR b`.
pub(crate) fn field_add(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Field multiplication in GF(2^b) via the exp/log tables.
pub(crate) fn field_mul(a: u32, b: u32, tables: &Tables) -> u32 {
    if a == 0 || b == 0 {
        return 0;
    }
    let la = tables.logs[a as usize].expect("nonzero element has a defined log");
    let lb = tables.logs[b as usize].expect("nonzero element has a defined log");
    tables.exps[(la + lb) as usize]
}

/// Field division in GF(2^b) via the exp/log tables. `a / 0` is an error;
/// `0 / b` (b != 0) is `0`.
pub(crate) fn field_div(a: u32, b: u32, tables: &Tables, size: u32) -> Result<u32> {
    if b == 0 {
        return Err(Error::FieldDivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let la = tables.logs[a as usize].expect("nonzero element has a defined log");
    let lb = tables.logs[b as usize].expect("nonzero element has a defined log");
    Ok(tables.exps[(la + (size - 1) - lb) as usize])
}

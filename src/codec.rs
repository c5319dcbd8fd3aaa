//! Conversions between hex strings, binary strings, and fixed-width
//! field-element chunks.

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// Left-pad `s` with `'0'` so its length is the smallest positive multiple
/// of `multiple` that is `>= s.len()`. A `multiple` of `0` or `1` leaves `s`
/// unchanged; a `multiple` greater than `1024` is rejected.
pub(crate) fn pad_left(s: &str, multiple: u32) -> Result<String> {
    if multiple > 1024 {
        return Err(Error::PaddingMultipleOutOfRange(multiple));
    }
    if multiple <= 1 {
        return Ok(s.to_string());
    }
    let multiple = multiple as usize;
    let len = s.len();
    let target = if len == 0 {
        multiple
    } else {
        ((len + multiple - 1) / multiple) * multiple
    };
    let mut padded = "0".repeat(target - len);
    padded.push_str(s);
    Ok(padded)
}

/// Convert a hex string (either case) to its binary expansion, 4 bits per
/// character. Rejects any non-hex character.
pub(crate) fn hex2bin(h: &str) -> Result<String> {
    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(h.len() * 4);
    for c in h.chars() {
        let nibble = c.to_digit(16).ok_or(Error::NonHexInput(c))? as u8;
        bits.extend_from_bitslice(&nibble.view_bits::<Msb0>()[4..]);
    }
    Ok(bits.iter().map(|bit| if *bit { '1' } else { '0' }).collect())
}

/// Convert a binary string to lowercase hex, left-padding to a multiple of
/// 4 bits first. Non-binary characters in `b` are not validated (documented
/// behavior).
pub(crate) fn bin2hex(b: &str) -> Result<String> {
    let padded = pad_left(b, 4)?;
    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(padded.len());
    for c in padded.chars() {
        bits.push(c == '1');
    }
    let mut out = String::with_capacity(bits.len() / 4);
    for nibble in bits.chunks(4) {
        let value: u8 = nibble.load_be();
        out.push(std::char::from_digit(value as u32, 16).expect("4 bits fit in a hex digit"));
    }
    Ok(out)
}

/// Encode a byte slice as lowercase hex, one element at a time.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

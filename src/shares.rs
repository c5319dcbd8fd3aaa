//! Split, combine, and mint shares over the active field.
//!
//! A secret is chunked into `bits`-wide pieces, each becomes the constant
//! term of a random degree-(k-1) polynomial, and the polynomial is evaluated
//! at `x = 1..=n` to produce one point per share. Combining transposes the
//! stored points back into per-chunk `(x, y)` sets and interpolates each at
//! `x = 0`; `newShare` is the same interpolation evaluated at an arbitrary
//! `x` instead, letting a holder of `k` shares mint a fresh one without ever
//! reconstructing the secret.

use std::collections::HashSet;

use bitvec::prelude::*;
use zeroize::Zeroize;

use crate::config::FieldConfig;
use crate::error::{Error, Result};
use crate::poly::{horner, lagrange};
use crate::share_codec::{construct_public_share_string, extract_share_components};

/// The low `width` bits of `value`, as a bit sequence. Mirrors slicing a
/// fixed-width field element out of a 32-bit-lane `BitVec<u32, Msb0>` with a
/// `cut` index.
fn low_bits(value: u32, width: u8) -> BitVec<u32, Msb0> {
    let lane: BitVec<u32, Msb0> = BitVec::from_vec(vec![value]);
    let cut = 32 - width as usize;
    lane[cut..].to_bitvec()
}

/// Decode a hex string directly into its bit sequence, 4 bits per character.
fn hex_to_bits(h: &str) -> Result<BitVec<u32, Msb0>> {
    let mut bits: BitVec<u32, Msb0> = BitVec::with_capacity(h.len() * 4);
    for c in h.chars() {
        let nibble = c.to_digit(16).ok_or(Error::NonHexInput(c))?;
        bits.extend_from_bitslice(&low_bits(nibble, 4));
    }
    Ok(bits)
}

/// Encode a bit sequence as lowercase hex, left-padding to a multiple of 4
/// bits first.
fn bits_to_hex(bits: &BitSlice<u32, Msb0>) -> String {
    let rem = bits.len() % 4;
    let pad = if rem == 0 { 0 } else { 4 - rem };
    let mut padded: BitVec<u32, Msb0> = BitVec::repeat(false, pad);
    padded.extend_from_bitslice(bits);
    let mut out = String::with_capacity(padded.len() / 4);
    for nibble in padded.chunks(4) {
        let value: u8 = nibble.load_be();
        out.push(std::char::from_digit(value as u32, 16).expect("4 bits fit in a hex digit"));
    }
    out
}

/// Left-pad `bits` with zero bits so its length becomes the smallest
/// multiple of `multiple` that is `>=` its current length. A `multiple` of
/// `0` or `1` leaves `bits` unchanged; a `multiple` greater than `1024` is
/// rejected.
fn pad_bits(bits: &BitSlice<u32, Msb0>, multiple: u32) -> Result<BitVec<u32, Msb0>> {
    if multiple > 1024 {
        return Err(Error::PaddingMultipleOutOfRange(multiple));
    }
    if multiple <= 1 {
        return Ok(bits.to_bitvec());
    }
    let multiple = multiple as usize;
    let len = bits.len();
    let target = if len == 0 {
        multiple
    } else {
        ((len + multiple - 1) / multiple) * multiple
    };
    let mut padded: BitVec<u32, Msb0> = BitVec::repeat(false, target - len);
    padded.extend_from_bitslice(bits);
    Ok(padded)
}

/// Split `secret` (a hex string) into `n` shares requiring `k` to recombine.
///
/// `pad_to` optionally left-pads the marked binary secret (see the
/// leading-one marker note below) to a fixed bit width before chunking, so
/// that secrets of varying length produce share strings of uniform size.
pub(crate) fn split(
    config: &FieldConfig,
    secret_hex: &str,
    n: u32,
    k: u32,
    pad_to: Option<u32>,
) -> Result<Vec<String>> {
    if secret_hex.is_empty() {
        return Err(Error::EmptySecret);
    }
    if k < 2 {
        return Err(Error::ThresholdBelowMinimum(k));
    }
    if n < k {
        return Err(Error::LimitBelowThreshold {
            limit: n,
            threshold: k,
        });
    }
    if n > config.max {
        return Err(Error::LimitExceedsField {
            limit: n,
            max: config.max,
        });
    }

    // Prepend the leading-one marker so leading zero nibbles of the secret
    // survive the round trip.
    let mut marked: BitVec<u32, Msb0> = BitVec::with_capacity(1 + secret_hex.len() * 4);
    marked.push(true);
    marked.extend_from_bitslice(&hex_to_bits(secret_hex)?);
    let mut padded = pad_bits(&marked, pad_to.unwrap_or(config.bits as u32))?;
    marked.fill(false);

    // Chunk most-significant-chunk first: the marker lives in the first
    // chunk, so it absorbs whatever is left over when the padded length
    // isn't itself a multiple of `bits`; every chunk after it is full width.
    let bits = config.bits as usize;
    let total = padded.len();
    let first_width = match total % bits {
        0 => bits,
        r => r,
    };
    let mut chunks: Vec<u32> = Vec::with_capacity((total + bits - 1) / bits);
    {
        let mut rest = padded.as_bitslice();
        let (first_chunk, tail) = rest.split_at(first_width.min(rest.len()));
        chunks.push(first_chunk.load_be::<u32>());
        rest = tail;
        while !rest.is_empty() {
            let take = bits.min(rest.len());
            let (head, tail) = rest.split_at(take);
            chunks.push(head.load_be::<u32>());
            rest = tail;
        }
    }
    padded.fill(false);

    let mut y_per_x: Vec<Vec<u32>> = vec![Vec::with_capacity(chunks.len()); n as usize];
    for &chunk_value in &chunks {
        let mut coeffs = random_coefficients(config, chunk_value, k)?;
        for x in 1..=n {
            let y = horner(x, &coeffs, &config.tables);
            y_per_x[(x - 1) as usize].push(y);
        }
        coeffs.zeroize();
    }
    chunks.zeroize();

    let mut out = Vec::with_capacity(n as usize);
    for (idx, ys) in y_per_x.into_iter().enumerate() {
        let x = (idx + 1) as u32;
        let mut data_bits: BitVec<u32, Msb0> = BitVec::with_capacity(ys.len() * config.bits as usize);
        for y in ys {
            data_bits.extend_from_bitslice(&low_bits(y, config.bits));
        }
        let data_hex = bits_to_hex(&data_bits);
        out.push(construct_public_share_string(config.bits, x, &data_hex)?);
    }
    Ok(out)
}

/// Sample `k - 1` random field coefficients via the active RNG and prepend
/// the chunk's value as the constant term, giving a degree-(k-1) polynomial.
fn random_coefficients(config: &FieldConfig, constant: u32, k: u32) -> Result<Vec<u32>> {
    let mut coeffs = Vec::with_capacity(k as usize);
    coeffs.push(constant);
    for _ in 1..k {
        let bits = config.rng.generate(config.bits as u32)?;
        let value = u32::from_str_radix(&bits, 2).expect("rng output is bits-long binary digits");
        coeffs.push(value % config.size);
    }
    Ok(coeffs)
}

/// Recombine `shares` into the original secret hex string.
pub(crate) fn combine(config: &FieldConfig, shares: &[String]) -> Result<String> {
    let mut recovered = interpolate_all(config, shares, 0)?;
    let secret_hex = strip_marker_to_hex(&recovered);
    recovered.fill(false);
    Ok(secret_hex)
}

/// Mint a fresh share at `id` from an existing set of `k` or more shares,
/// without reconstructing the secret.
pub(crate) fn new_share(config: &FieldConfig, id: u32, shares: &[String]) -> Result<String> {
    if id < 1 || id > config.max {
        return Err(Error::InvalidShareId(id));
    }
    let decoded = decode_shares(shares)?;
    if decoded.iter().any(|s| s.id == id) {
        return Err(Error::DuplicateShareId(id));
    }

    let chunk_count = decoded[0].chunks.len();
    let xs: Vec<u32> = decoded.iter().map(|s| s.id).collect();
    let bin_len = decoded[0].bin_len;

    // `decoded[i].chunks` is least-significant-chunk-first (see
    // `decode_shares`), but the share string encodes most-significant-chunk
    // first (see `split`), so chunks are interpolated from the most- to the
    // least-significant and appended in that order, same as `interpolate_all`
    // does for combine. Every chunk is `bits` wide except possibly the
    // most-significant one, which absorbs whatever is left over when
    // `bits * chunk_count` is not itself a multiple of `bits` after the input
    // shares' own hex rounding (see `chunk_bit_width`); re-using that exact
    // width (rather than always re-padding to a full `bits`) keeps the
    // minted share's total bit length identical to its inputs', so a further
    // `new_share`/`combine` decodes it into the same number of chunks
    // instead of one that keeps growing.
    let mut data_bits: BitVec<u32, Msb0> = BitVec::with_capacity(bin_len);
    for chunk_idx in (0..chunk_count).rev() {
        let chunk_ys: Vec<u32> = decoded.iter().map(|s| s.chunks[chunk_idx]).collect();
        let y = lagrange(id, &xs, &chunk_ys, &config.tables, config.size)?;
        let width = chunk_bit_width(bin_len, config.bits as usize, chunk_count, chunk_idx);
        data_bits.extend_from_bitslice(&low_bits(y, width as u8));
    }
    let data_hex = bits_to_hex(&data_bits);
    construct_public_share_string(config.bits, id, &data_hex)
}

/// The bit width of chunk `idx` (least-significant-first, as produced by
/// `decode_shares`) within a decoded bit sequence of `bin_len` bits split
/// into `chunk_count` chunks of `bits` bits apiece: every chunk is `bits`
/// wide except the last (most significant) one, which gets whatever
/// remains.
fn chunk_bit_width(bin_len: usize, bits: usize, chunk_count: usize, idx: usize) -> usize {
    if idx + 1 == chunk_count {
        bin_len - bits * (chunk_count - 1)
    } else {
        bits
    }
}

struct DecodedShare {
    id: u32,
    /// Chunks in least-significant-first order.
    chunks: Vec<u32>,
    /// Length in bits of this share's decoded data. Identical across every
    /// share in a well-formed set; used by `new_share` to reproduce the
    /// exact chunk widths `decode_shares` saw.
    bin_len: usize,
}

fn decode_shares(shares: &[String]) -> Result<Vec<DecodedShare>> {
    if shares.is_empty() {
        return Err(Error::EmptySecret);
    }

    let mut decoded = Vec::with_capacity(shares.len());
    let mut bits = None;
    let mut seen_ids = HashSet::with_capacity(shares.len());
    for share in shares {
        let components = extract_share_components(share)?;
        match bits {
            None => bits = Some(components.bits),
            Some(b) if b != components.bits => return Err(Error::MixedFieldSizes),
            _ => {}
        }
        if !seen_ids.insert(components.id) {
            return Err(Error::DuplicateShareId(components.id));
        }
        let bin = hex_to_bits(&components.data_hex)?;
        let bits = bits.expect("set above") as usize;
        let bin_len = bin.len();

        // Consume from the right in `bits`-wide windows, least-significant
        // chunk first; the leftover (if any) is the narrower,
        // most-significant chunk at the very end.
        let mut chunks: Vec<u32> = Vec::with_capacity((bin_len + bits - 1) / bits);
        let mut rest = bin.as_bitslice();
        while !rest.is_empty() {
            let take = bits.min(rest.len());
            let split_at = rest.len() - take;
            let (head, tail) = rest.split_at(split_at);
            chunks.push(tail.load_be::<u32>());
            rest = head;
        }

        decoded.push(DecodedShare {
            id: components.id,
            chunks,
            bin_len,
        });
    }

    let chunk_count = decoded[0].chunks.len();
    let bin_len = decoded[0].bin_len;
    if decoded
        .iter()
        .any(|s| s.chunks.len() != chunk_count || s.bin_len != bin_len)
    {
        return Err(Error::MixedFieldSizes);
    }
    Ok(decoded)
}

/// Decode `shares`, transpose per-chunk, and interpolate every chunk at
/// `at`, appending each recovered chunk's bits from most- to
/// least-significant so the result matches the original pre-split bit
/// order.
fn interpolate_all(config: &FieldConfig, shares: &[String], at: u32) -> Result<BitVec<u32, Msb0>> {
    let decoded = decode_shares(shares)?;
    let xs: Vec<u32> = decoded.iter().map(|s| s.id).collect();
    let chunk_count = decoded[0].chunks.len();

    let mut result: BitVec<u32, Msb0> = BitVec::with_capacity(chunk_count * config.bits as usize);
    for chunk_idx in (0..chunk_count).rev() {
        let ys: Vec<u32> = decoded.iter().map(|s| s.chunks[chunk_idx]).collect();
        let recovered = lagrange(at, &xs, &ys, &config.tables, config.size)?;
        result.extend_from_bitslice(&low_bits(recovered, config.bits));
    }
    Ok(result)
}

/// Locate the leading-one marker and return everything after it as hex.
fn strip_marker_to_hex(bits: &BitSlice<u32, Msb0>) -> String {
    let stripped: BitVec<u32, Msb0> = bits
        .iter()
        .map(|b| *b)
        .skip_while(|b| !*b)
        .skip(1)
        .collect();
    bits_to_hex(&stripped)
}

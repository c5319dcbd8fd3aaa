//! Encoding and decoding of the public share string:
//! `<bits-tag><id-hex><data-hex>`.

use crate::codec::hex2bin;
use crate::error::{Error, Result};
use crate::field::{field_max, MAX_BITS, MIN_BITS};

/// The decoded pieces of a public share string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShareComponents {
    pub bits: u8,
    pub id: u32,
    pub data_hex: String,
}

/// Number of hex characters needed to represent any value in `[0, 2^bits - 1]`.
fn id_hex_width(bits: u8) -> usize {
    ((bits as usize) + 3) / 4
}

/// Build the public share string for `(bits, id, data_hex)`.
///
/// `data_hex` is taken verbatim: the caller is responsible for having
/// already padded it to the width the field size implies.
pub(crate) fn construct_public_share_string(bits: u8, id: u32, data_hex: &str) -> Result<String> {
    let max = field_max(bits);
    if id < 1 || id > max {
        return Err(Error::InvalidShareId(id));
    }

    let tag = std::char::from_digit(bits as u32, 36).expect("bits fits in a base-36 digit");
    let id_hex = format!("{:01$x}", id, id_hex_width(bits));

    let mut out = String::with_capacity(1 + id_hex.len() + data_hex.len());
    out.push(tag);
    out.push_str(&id_hex);
    out.push_str(data_hex);
    Ok(out)
}

/// Parse a public share string into its `(bits, id, data_hex)` components,
/// validating the bits tag, the id's range, and that the data is hex.
pub(crate) fn extract_share_components(share: &str) -> Result<ShareComponents> {
    let mut chars = share.chars();
    let tag = chars.next().ok_or(Error::ShareTooShort)?;
    let bits = tag
        .to_digit(36)
        .ok_or(Error::ShareBitsTagOutOfRange)? as u8;
    if !(MIN_BITS..=MAX_BITS).contains(&bits) {
        return Err(Error::ShareBitsTagOutOfRange);
    }

    let rest = chars.as_str();
    let id_width = id_hex_width(bits);
    if rest.len() < id_width {
        return Err(Error::ShareTooShort);
    }
    let (id_hex, data_hex) = rest.split_at(id_width);

    let id = u32::from_str_radix(id_hex, 16).map_err(|_| Error::ShareDataNotHex)?;
    let max = field_max(bits);
    if id < 1 || id > max {
        return Err(Error::ShareIdOutOfRange);
    }

    // Validate hex-ness without consuming: `hex2bin` rejects non-hex chars.
    let _ = hex2bin(data_hex).map_err(|_| Error::ShareDataNotHex)?;

    Ok(ShareComponents {
        bits,
        id,
        data_hex: data_hex.to_string(),
    })
}

//! shamir_gf2n
//!
//! Shamir's Secret Sharing over a binary Galois field GF(2^b), 3 <= b <= 20.
//! Given a secret and parameters `(n, k)`, [`share`] splits it into `n`
//! shares such that any `k` reconstruct it via [`combine`] and any `k - 1`
//! reveal no information. [`new_share`] mints an additional share for an
//! existing polynomial without reconstructing the secret in the caller's
//! code. Shares are encoded as a self-describing string that carries its own
//! field size; see [`extract_share_components`].
//!
//! The library keeps a single ambient field configuration, set by [`init`]
//! and read by every other call; see the [`config`] module for the
//! concurrency contract this implies.

#![deny(missing_docs)]
#![deny(unused_crate_dependencies)]
#![deny(unused_results)]

mod codec;
mod config;
mod error;
mod field;
mod poly;
mod rng;
mod share_codec;
mod shares;
#[cfg(test)]
mod tests;

pub use config::{get_config, is_set_rng, set_rng, FieldConfigReport};
pub use error::{Error, Result};
pub use rng::RngSource;

use config::with_config;
use share_codec::ShareComponents as InternalShareComponents;

/// Initialize (or reinitialize) the library for field size `bits` (default
/// 8 when `None`), binding `rng` as the active random source or
/// auto-detecting a secure one when `None`.
///
/// Every other function in this crate requires a prior successful call to
/// `init`; calling them first fails with [`Error::NotInitialized`].
pub fn init(bits: Option<u8>, rng: Option<RngSource>) -> Result<()> {
    config::init(bits, rng)
}

/// Split `secret` (a hex string) into `n` shares, `k` of which are required
/// to recombine it. `pad_to`, when given, left-pads the internal marked
/// binary secret to a fixed bit width before chunking, producing shares of
/// uniform size across secrets of varying length.
pub fn share(secret: &str, n: u32, k: u32, pad_to: Option<u32>) -> Result<Vec<String>> {
    with_config(|cfg| shares::split(cfg, secret, n, k, pad_to))?
}

/// Recombine `k` or more shares produced by [`share`] into the original
/// secret hex string.
pub fn combine(shares_in: &[String]) -> Result<String> {
    with_config(|cfg| shares::combine(cfg, shares_in))?
}

/// Mint a new share at `id` from an existing set of `k` or more shares,
/// without reconstructing the secret.
pub fn new_share(id: u32, shares_in: &[String]) -> Result<String> {
    with_config(|cfg| shares::new_share(cfg, id, shares_in))?
}

/// Draw `bits` uniform random bits from the active RNG source, returned as
/// a hex string.
pub fn random(bits: u32) -> Result<String> {
    with_config(|cfg| -> Result<String> {
        let bin = cfg.rng.generate(bits)?;
        codec::bin2hex(&bin)
    })?
}

/// Parsed components of a public share string: field size, share id, and
/// data hex. Exposed as a named struct rather than the internal tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareComponents {
    /// The field size, in bits, the share was produced under.
    pub bits: u8,
    /// The share's 1-based id (its x-coordinate).
    pub id: u32,
    /// The share's data payload, as hex.
    pub data_hex: String,
}

impl From<InternalShareComponents> for ShareComponents {
    fn from(c: InternalShareComponents) -> Self {
        ShareComponents {
            bits: c.bits,
            id: c.id,
            data_hex: c.data_hex,
        }
    }
}

/// Parse a public share string into its `(bits, id, data_hex)` components.
pub fn extract_share_components(share_string: &str) -> Result<ShareComponents> {
    with_config(|_cfg| share_codec::extract_share_components(share_string))?.map(Into::into)
}

//! Process-wide field configuration and lifecycle.
//!
//! A single ambient `FieldConfig` is created by `init` and read by every
//! other operation. This crate keeps that shape rather than threading a
//! context handle through every call (see DESIGN.md for why), guarding the
//! singleton with a `RwLock`: reads (`share`/`combine`/`newShare`/`random`)
//! vastly outnumber writes (`init`/`setRNG`) and never conflict with each
//! other. The caller is still responsible for not racing `init`/`setRNG`
//! against the other operations.

use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::field::{self, field_max, field_size, generate_tables, Tables};
use crate::rng::RngSource;

/// Default field size when `init` is called with no explicit `bits`.
pub const DEFAULT_BITS: u8 = 8;

/// Base used to encode `bits` into a single share-string character.
pub const RADIX: u32 = 36;

/// The active field configuration: size, tables, and resolved RNG.
pub(crate) struct FieldConfig {
    pub bits: u8,
    pub size: u32,
    pub max: u32,
    pub tables: Tables,
    pub rng: RngSource,
}

/// A snapshot of the active configuration, returned by [`crate::get_config`].
#[derive(Debug, Clone)]
pub struct FieldConfigReport {
    /// Active field size in bits.
    pub bits: u8,
    /// `2^bits`, the field order.
    pub size: u32,
    /// `2^bits - 1`, the largest valid share id.
    pub max: u32,
    /// Base used to encode `bits` into a share-string character. Always 36.
    pub radix: u32,
    /// Whether the active RNG source is a CSPRNG.
    pub has_csprng: bool,
    /// The active RNG source's name, as reported in share-string debugging
    /// and logs (never embedded in the share string itself).
    pub type_csprng: &'static str,
}

static CONFIG: RwLock<Option<FieldConfig>> = RwLock::new(None);

/// Tests that drive the public API touch the single process-wide
/// `CONFIG`, a shared-mutable-state hazard. `cargo test` runs tests
/// concurrently by default, so any test that calls `init`/`setRNG` (here or
/// in [`crate::tests`]) takes this lock first to serialize against every
/// other such test.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn lock_for_test() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clear the active configuration, simulating a process that never called
/// `init`. Callers must hold [`TEST_LOCK`] first.
#[cfg(test)]
pub(crate) fn clear_for_test() {
    *CONFIG.write().expect("config lock is never poisoned") = None;
}

/// Initialize (or reinitialize) the field configuration.
///
/// `bits` defaults to [`DEFAULT_BITS`] when `None`. An explicit `rng`
/// replaces auto-detection; when `None`, a secure source is auto-detected in
/// a fixed preference order, and `init` fails with
/// [`Error::NoCsprngAvailable`] only if detection exhausts every secure
/// source without finding one.
pub fn init(bits: Option<u8>, rng: Option<RngSource>) -> Result<()> {
    let bits = bits.unwrap_or(DEFAULT_BITS);
    if !(field::MIN_BITS..=field::MAX_BITS).contains(&bits) {
        tracing::warn!(bits, "init rejected: field size out of range");
        return Err(Error::BitsOutOfRange(bits));
    }

    let rng = match rng {
        Some(rng) => rng,
        None => RngSource::autodetect().map_err(|e| {
            tracing::warn!("init could not auto-detect a CSPRNG source");
            e
        })?,
    };

    let tables = generate_tables(bits);
    let config = FieldConfig {
        bits,
        size: field_size(bits),
        max: field_max(bits),
        tables,
        rng,
    };

    tracing::debug!(bits, rng = config.rng.name(), "field configuration initialized");

    let mut guard = CONFIG.write().expect("config lock is never poisoned");
    *guard = Some(config);
    Ok(())
}

/// Report the active configuration.
pub fn get_config() -> Result<FieldConfigReport> {
    with_config(|cfg| FieldConfigReport {
        bits: cfg.bits,
        size: cfg.size,
        max: cfg.max,
        radix: RADIX,
        has_csprng: cfg.rng.is_csprng(),
        type_csprng: cfg.rng.name(),
    })
}

/// Replace the active RNG source without touching the field size.
pub fn set_rng(rng: RngSource) -> Result<()> {
    let mut guard = CONFIG.write().expect("config lock is never poisoned");
    let cfg = guard.as_mut().ok_or_else(|| {
        tracing::warn!("setRNG called before init");
        Error::NotInitialized
    })?;
    tracing::debug!(rng = rng.name(), "RNG source replaced");
    cfg.rng = rng;
    Ok(())
}

/// Whether an RNG source has been bound since the last `init`.
///
/// `init` always resolves a source (explicit or auto-detected) before
/// succeeding, so this is `true` for any successfully initialized library;
/// it exists to report whether a source has been bound at all.
pub fn is_set_rng() -> bool {
    CONFIG
        .read()
        .expect("config lock is never poisoned")
        .is_some()
}

/// Run `f` against the active configuration, or fail with
/// [`Error::NotInitialized`] when `init` has not been called.
pub(crate) fn with_config<T>(f: impl FnOnce(&FieldConfig) -> T) -> Result<T> {
    let guard = CONFIG.read().expect("config lock is never poisoned");
    let cfg = guard.as_ref().ok_or(Error::NotInitialized)?;
    Ok(f(cfg))
}

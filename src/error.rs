use thiserror::Error;

/// Errors produced by this crate's field, share, and lifecycle operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `init` was called with a field size outside the supported range.
    #[error("field size {0} bits is outside the supported range [3, 20]")]
    BitsOutOfRange(u8),

    /// A padding multiple outside the supported range was requested.
    #[error("padding multiple {0} is outside the supported range (0, 1024]")]
    PaddingMultipleOutOfRange(u32),

    /// No CSPRNG source could be resolved for this host.
    #[error("no CSPRNG source is available on this host")]
    NoCsprngAvailable,

    /// `share` was called with a threshold below the required minimum of 2.
    #[error("threshold must be at least 2, got {0}")]
    ThresholdBelowMinimum(u32),

    /// `share` was called with fewer shares requested than the threshold.
    #[error("share limit {limit} is less than threshold {threshold}")]
    LimitBelowThreshold {
        /// The requested share count.
        limit: u32,
        /// The requested threshold.
        threshold: u32,
    },

    /// `share` was called with a limit the active field cannot represent.
    #[error("share limit {limit} exceeds the maximum supported by this field ({max})")]
    LimitExceedsField {
        /// The requested share count.
        limit: u32,
        /// The maximum share count the active field supports.
        max: u32,
    },

    /// The secret passed to `share` was empty.
    #[error("secret must be a non-empty hex string")]
    EmptySecret,

    /// A share id fell outside `[1, max]` for the active (or encoded) field size.
    #[error("share id {0} is out of range")]
    InvalidShareId(u32),

    /// `combine`/`newShare` were given shares encoded with different field sizes.
    #[error("shares use different field sizes and cannot be combined")]
    MixedFieldSizes,

    /// A hex string contained a non-hexadecimal character.
    #[error("input contains a non-hexadecimal character: {0:?}")]
    NonHexInput(char),

    /// `combine`/`newShare` were given two shares with the same id.
    #[error("duplicate share id {0} supplied to combine/newShare")]
    DuplicateShareId(u32),

    /// The active RNG returned output of the wrong length.
    #[error("RNG returned {got} characters, expected {expected}")]
    RngWrongLength {
        /// Bits requested from the RNG.
        expected: u32,
        /// Characters actually returned.
        got: usize,
    },

    /// The active RNG returned a character that was not `'0'` or `'1'`.
    #[error("RNG returned a non-binary character: {0:?}")]
    RngNonBinaryOutput(char),

    /// A named RNG source was requested that this host does not provide.
    #[error("requested RNG source {0:?} is not available on this host")]
    NoRngSourceAvailable(String),

    /// A share string was too short to contain a valid header.
    #[error("share string is too short to contain a valid header")]
    ShareTooShort,

    /// A share string's leading bits-tag character was out of range.
    #[error("share bits tag is out of range [3, 20]")]
    ShareBitsTagOutOfRange,

    /// A share string's id portion was out of range for its field size.
    #[error("share id is out of range for its field size")]
    ShareIdOutOfRange,

    /// A share string's data portion was not valid hexadecimal.
    #[error("share data is not valid hexadecimal")]
    ShareDataNotHex,

    /// An operation other than `init` was called before a successful `init`.
    #[error("operation attempted before a successful init()")]
    NotInitialized,

    /// `field_div` was asked to divide by the zero field element.
    #[error("division by the zero field element")]
    FieldDivisionByZero,

    /// A field element's discrete logarithm was indexed out of range.
    #[error("a field element's discrete logarithm at {0} is undefined")]
    FieldLogUndefined(u32),
}

/// Results returned by this crate.
pub type Result<T> = core::result::Result<T, Error>;

use thiserror::Error;

/// Failures while validating the magic and length preamble of a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("wrong format: magic does not match")]
    WrongFormat,

    #[error("corrupted length: {0} != {1}")]
    CorruptedLength(u32, u32),
}

/// Failures while extracting a censor result from a laid out image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnlayoutError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("image is too small: {area} pixels, header needs {needed}")]
    TooSmall { area: u64, needed: u64 },

    #[error("header is incorrect: height {declared} exceeds image height {actual}")]
    IncorrectHeader { declared: u32, actual: u32 },

    #[error("header is incorrect: {count} blocks declared, image stores at most {capacity}")]
    TooManyBlocks { count: u32, capacity: u64 },
}

/// Failures of the censoring step caused by mismatched inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CensorError {
    #[error("image is {0}x{1} but mask is {2}x{3}")]
    SizeMismatch(u32, u32, u32, u32),
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(String),
}

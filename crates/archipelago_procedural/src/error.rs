//! # Generation Error Types
//!
//! All errors that can occur before or while generating a world.

use thiserror::Error;

/// Errors that can occur in the generation pipeline.
///
/// Numeric generation itself never fails; these all describe bad input.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Width or depth was zero.
    #[error("invalid world dimensions: {width}x{depth} (both must be positive)")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested depth.
        depth: u32,
    },

    /// Noise scale was not a finite positive number.
    #[error("invalid noise scale: {0} (must be finite and positive)")]
    InvalidScale(f64),

    /// A configuration table violates its own constraints.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A TOML configuration document failed to parse.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Rejects the first NaN or infinite value of a config section.
///
/// Ordering checks alone let NaN through, since every comparison with it is false.
pub(crate) fn ensure_finite<'a>(
    section: &str,
    values: impl IntoIterator<Item = (&'a str, f64)>,
) -> GenerationResult<()> {
    match values.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(GenerationError::InvalidConfig(format!(
            "{section}.{name} must be finite, got {value}"
        ))),
        None => Ok(()),
    }
}

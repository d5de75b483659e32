//! Error types for spectral data handling.

use thiserror::Error;

/// Spectral data error.
///
/// Covers the failure modes of loading, validating, and generating
/// spectral data:
/// - I/O and JSON syntax failures
/// - Schema violations (missing sections, wrong sample counts)
/// - Channel lookups against records that lack them
/// - Colour temperatures outside a generator's validity band
#[derive(Debug, Error)]
pub enum SpectralError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON is malformed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// JSON parsed but violates the spectral-data schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// A channel's sample count disagrees with the declared shape.
    #[error("shape mismatch in channel '{channel}': expected {expected} samples, got {actual}")]
    ShapeMismatch {
        /// Offending channel name.
        channel: String,
        /// Samples required by the declared shape.
        expected: usize,
        /// Samples actually present.
        actual: usize,
    },

    /// A named channel is not present in the record.
    #[error("missing channel: '{0}'")]
    MissingChannel(String),

    /// A record does not have the channel layout its role requires.
    #[error("invalid record layout: {0}")]
    InvalidLayout(String),

    /// A colour temperature is outside the generator's validity band.
    #[error("{kind} colour temperature {cct} K is outside [{min}, {max})")]
    CctOutOfRange {
        /// Generator family ("daylight" or "blackbody").
        kind: &'static str,
        /// Requested temperature.
        cct: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Exclusive upper bound.
        max: f64,
    },

    /// An illuminant name does not parse as daylight or blackbody.
    #[error("invalid illuminant name: '{0}'")]
    InvalidIlluminantName(String),
}

/// Result type for spectral data operations.
pub type SpectralResult<T> = Result<T, SpectralError>;

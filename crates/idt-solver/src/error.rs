//! Error types for the IDT solvers.

use idt_spectral::SpectralError;
use thiserror::Error;

/// IDT solver error.
///
/// Covers both solver paths:
/// - lookups that find no matching camera or illuminant
/// - operations invoked before their inputs were provided
/// - numerically degenerate metadata (singular matrices, zero sums)
/// - a matrix fit that produced no successful step
#[derive(Debug, Error)]
pub enum SolverError {
    /// No camera record matched the requested make and model.
    #[error("camera not found: {make} {model}")]
    CameraNotFound {
        /// Requested manufacturer.
        make: String,
        /// Requested model.
        model: String,
    },

    /// No illuminant matched the requested name.
    #[error("illuminant not found: '{0}'")]
    IlluminantNotFound(String),

    /// A solver operation was invoked before its inputs were provided.
    #[error("{what} must be set before calling {operation}")]
    Precondition {
        /// The missing input.
        what: &'static str,
        /// The operation that needed it.
        operation: &'static str,
    },

    /// A matrix inversion failed or a zero-sum matrix was produced.
    #[error("singular matrix: {0}")]
    Singular(&'static str),

    /// Metadata is structurally unusable (wrong-sized matrices, etc.).
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The nonlinear fit produced no successful step.
    #[error("matrix fit failed: no successful minimiser step")]
    SolveFailed,

    /// Spectral data loading or validation failed.
    #[error(transparent)]
    Spectral(#[from] SpectralError),
}

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

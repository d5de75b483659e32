//! # idt-solver
//!
//! Input device transform solvers for ACES AP0.
//!
//! An IDT is the 3x3 matrix taking a camera's native, white-balanced RGB
//! into the ACES AP0 colour space. Two derivation paths are provided,
//! depending on the data available for the camera:
//!
//! - [`SpectralSolver`] - from measured spectral sensitivities, an
//!   illuminant, an observer, and a reflectance training set, fitting the
//!   matrix by nonlinear least squares in CIE L\*a\*b\*
//! - [`MetadataSolver`] - from DNG calibration metadata, interpolating the
//!   embedded calibrations at the scene's colour temperature and composing
//!   a chromatic adaptation to the ACES white
//!
//! The Levenberg-Marquardt driver the spectral fit runs on ([`solve`],
//! [`ResidualFn`]) is exposed for reuse and testing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use idt_solver::SpectralSolver;
//! use std::path::PathBuf;
//!
//! let mut solver = SpectralSolver::new(vec![PathBuf::from("/data")]);
//! solver.find_camera("nikon", "d200")?;
//! solver.load_observer("cmf/cmf_1931.json")?;
//! solver.load_training("training/training_spectral.json")?;
//!
//! solver.find_illuminant("d55")?;
//! solver.calculate_wb()?;
//! solver.calculate_idt_matrix()?;
//!
//! let idt = solver.idt_matrix();
//! # Ok::<(), idt_solver::SolverError>(())
//! ```
//!
//! # Dependencies
//!
//! - [`idt-math`] / [`idt-colorimetry`] / [`idt-spectral`] - the maths and
//!   the data model
//! - [`nalgebra`] - dense QR factorisation in the NLLS driver
//! - [`thiserror`] - error types
//! - [`tracing`] - solver diagnostics
//! - [`serde`] - the DNG metadata interchange format
//!
//! # Used By
//!
//! - `idt-cli` - the `idtool` front end

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod nlls;
mod spectral;
mod metadata;

pub use error::*;
pub use nlls::*;
pub use spectral::*;
pub use metadata::*;

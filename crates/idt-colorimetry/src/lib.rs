//! # idt-colorimetry
//!
//! Colorimetry primitives for camera-to-ACES input transform solving.
//!
//! This crate holds the fixed colour-science machinery the solvers share:
//!
//! - CIE xy / CIE 1960 (u, v) / XYZ chromaticity conversions
//! - RGB-to-XYZ matrix generation from primaries and white point
//! - Correlated colour temperature via the Robertson isotherm table
//! - EXIF LightSource tag decoding
//! - CIE L\*a\*b\* (generic over the AD scalar, see [`idt_math::Real`])
//! - The ACES AP0 primaries and the fixed ACES matrices
//!
//! # Usage
//!
//! ```rust
//! use idt_colorimetry::{cct_to_xyz, xyz_to_cct};
//!
//! let xyz = cct_to_xyz(6500.0);
//! let cct = xyz_to_cct(xyz);
//! assert!((cct - 6500.0).abs() < 1.0);
//! ```
//!
//! # Dependencies
//!
//! - [`idt-math`] - matrix/vector types and the AD scalar
//!
//! # Used By
//!
//! - `idt-solver` - both solver paths

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod primaries;
mod ucs;
mod cct;
mod lab;

pub use primaries::*;
pub use ucs::*;
pub use cct::*;
pub use lab::*;

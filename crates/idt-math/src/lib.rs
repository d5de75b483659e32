//! # idt-math
//!
//! Math primitives for camera-to-ACES input transform solving.
//!
//! This crate provides the small dense linear algebra the colour solvers are
//! built on:
//!
//! - [`Mat3`] - 3x3 matrices for colour space transforms
//! - [`Vec3`] - 3D vectors for RGB/XYZ triplets
//! - Chromatic adaptation transforms (CAT02, Bradford)
//! - Interpolation utilities
//!
//! # Design
//!
//! Everything is `f64`: the solvers fit matrices to tolerances far below
//! `f32` precision. All matrix operations assume **row-major** storage and
//! **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use idt_math::{Mat3, Vec3};
//!
//! let m = Mat3::diagonal(2.0, 1.0, 0.5);
//! let v = m * Vec3::new(1.0, 1.0, 1.0);
//! assert_eq!(v, Vec3::new(2.0, 1.0, 0.5));
//! ```
//!
//! # Used By
//!
//! - `idt-colorimetry` - chromaticity and CCT conversions
//! - `idt-solver` - the spectral and metadata solvers

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;
mod interp;
mod adapt;
mod dual;

pub use mat3::*;
pub use vec3::*;
pub use interp::*;
pub use adapt::*;
pub use dual::*;

//! # idt-spectral
//!
//! Sampled spectra and spectral data for camera-to-ACES input transform
//! solving.
//!
//! Three layers live here:
//!
//! - [`Spectrum`] / [`SpectralShape`] - fixed-grid sampled spectra with
//!   pointwise arithmetic and rectangular integration
//! - [`SpectralData`] - the named channel store with its JSON codec, plus
//!   the typed role views ([`CameraRecord`], [`IlluminantRecord`],
//!   [`ObserverRecord`], [`TrainingRecord`])
//! - illuminant generators - CIE D-series daylight and Planckian blackbody
//!   SPDs synthesised by colour temperature or by name
//!
//! # Usage
//!
//! ```rust
//! use idt_spectral::generate_illuminant;
//!
//! let d55 = generate_illuminant("d55").unwrap();
//! assert_eq!(d55.tag(), "d55");
//! assert_eq!(d55.power().values().len(), 81);
//! ```
//!
//! # Dependencies
//!
//! - [`idt-math`] - interpolation helpers
//! - [`serde`] / [`serde_json`] - the spectral-data file format
//! - [`thiserror`] - error types
//! - [`tracing`] - diagnostics
//!
//! # Used By
//!
//! - `idt-solver` - both solver paths

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod spectrum;
mod data;
mod records;
mod illuminant;

pub use error::*;
pub use spectrum::*;
pub use data::*;
pub use records::*;
pub use illuminant::*;

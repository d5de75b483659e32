//! Daylight and blackbody illuminant generation.
//!
//! Two families of illuminants are synthesised on demand:
//!
//! - **CIE D-series daylight** ([`daylight_spd`]), reconstructed from the
//!   CIE S0/S1/S2 component tables and the daylight chromaticity polynomial
//! - **Planckian blackbody** ([`blackbody_spd`]), Planck's law evaluated
//!   over the working grid
//!
//! The raw generators treat an out-of-band colour temperature as a
//! programmer error and panic; the name-driven entry point
//! [`generate_illuminant`] and the checked constructors validate first and
//! report [`SpectralError::CctOutOfRange`](crate::SpectralError::CctOutOfRange).

use crate::{
    IlluminantRecord, SpectralData, SpectralError, SpectralResult, SpectralShape, Spectrum,
    MAIN_SET,
};
use idt_math::lerp;
use tracing::debug;

/// Valid daylight CCT bands: legacy hundreds form and Kelvin form.
pub const DAYLIGHT_LEGACY_RANGE: (f64, f64) = (40.0, 250.0);
/// Valid daylight CCT band in Kelvin.
pub const DAYLIGHT_KELVIN_RANGE: (f64, f64) = (4000.0, 25000.0);
/// Valid blackbody CCT band in Kelvin (upper bound exclusive).
pub const BLACKBODY_KELVIN_RANGE: (f64, f64) = (1500.0, 4000.0);

// Planck's constant [J*s]
const PLANCK_H: f64 = 6.626176e-34;
// Boltzmann constant [J/K]
const BOLTZMANN_K: f64 = 1.380662e-23;
// Speed of light [m/s]
const LIGHT_C: f64 = 2.99792458e8;

// CIE daylight components S0/S1/S2, tabulated at 10 nm from 300 nm.
const S_SERIES_START: f64 = 300.0;
const S_SERIES_STEP: f64 = 10.0;
#[rustfmt::skip]
const S_SERIES: [[f64; 3]; 54] = [
    [   0.04,   0.02,  0.0 ],
    [   6.0,    4.5,   2.0 ],
    [  29.6,   22.4,   4.0 ],
    [  55.3,   42.0,   8.5 ],
    [  57.3,   40.6,   7.8 ],
    [  61.8,   41.6,   6.7 ],
    [  61.5,   38.0,   5.3 ],
    [  68.8,   42.4,   6.1 ],
    [  63.4,   38.5,   3.0 ],
    [  65.8,   35.0,   1.2 ],
    [  94.8,   43.4,  -1.1 ],
    [ 104.8,   46.3,  -0.5 ],
    [ 105.9,   43.9,  -0.7 ],
    [  96.8,   37.1,  -1.2 ],
    [ 113.9,   36.7,  -2.6 ],
    [ 125.6,   35.9,  -2.9 ],
    [ 125.5,   32.6,  -2.8 ],
    [ 121.3,   27.9,  -2.6 ],
    [ 121.3,   24.3,  -2.6 ],
    [ 113.5,   20.1,  -1.8 ],
    [ 113.1,   16.2,  -1.5 ],
    [ 110.8,   13.2,  -1.3 ],
    [ 106.5,    8.6,  -1.2 ],
    [ 108.8,    6.1,  -1.0 ],
    [ 105.3,    4.2,  -0.5 ],
    [ 104.4,    1.9,  -0.3 ],
    [ 100.0,    0.0,   0.0 ],
    [  96.0,   -1.6,   0.2 ],
    [  95.1,   -3.5,   0.5 ],
    [  89.1,   -3.5,   2.1 ],
    [  90.5,   -5.8,   3.2 ],
    [  90.3,   -7.2,   4.1 ],
    [  88.4,   -8.6,   4.7 ],
    [  84.0,   -9.5,   5.1 ],
    [  85.1,  -10.9,   6.7 ],
    [  81.9,  -10.7,   7.3 ],
    [  82.6,  -12.0,   8.6 ],
    [  84.9,  -14.0,   9.8 ],
    [  81.3,  -13.6,  10.2 ],
    [  71.9,  -12.0,   8.3 ],
    [  74.3,  -13.3,   9.6 ],
    [  76.4,  -12.9,   8.5 ],
    [  63.3,  -10.6,   7.0 ],
    [  71.7,  -11.6,   7.6 ],
    [  77.0,  -12.2,   8.0 ],
    [  65.2,  -10.2,   6.7 ],
    [  47.7,   -7.8,   5.2 ],
    [  68.6,  -11.2,   7.4 ],
    [  65.0,  -10.4,   6.8 ],
    [  66.0,  -10.6,   7.0 ],
    [  61.0,   -9.7,   6.4 ],
    [  53.3,   -8.3,   5.5 ],
    [  58.9,   -9.3,   6.1 ],
    [  61.9,   -9.8,   6.5 ],
];

/// Daylight chromaticity from CCT via the standard two-segment polynomial.
fn daylight_xy(cctd: f64) -> (f64, f64) {
    let x = if (4002.15..=7003.77).contains(&cctd) {
        0.244063 + 99.11 / cctd + 2.9678e6 / cctd.powi(2) - 4.6070e9 / cctd.powi(3)
    } else {
        0.237040 + 247.48 / cctd + 1.9018e6 / cctd.powi(2) - 2.0064e9 / cctd.powi(3)
    };
    let y = -3.0 * x.powi(2) + 2.87 * x - 0.275;
    (x, y)
}

/// Linear interpolation of an S-series component at `wl` nanometres.
fn s_component(wl: f64, component: usize) -> f64 {
    let pos = (wl - S_SERIES_START) / S_SERIES_STEP;
    let i = (pos.floor() as usize).min(S_SERIES.len() - 2);
    lerp(S_SERIES[i][component], S_SERIES[i + 1][component], pos - i as f64)
}

fn daylight_cct_in_band(cct: f64) -> bool {
    (DAYLIGHT_LEGACY_RANGE.0..=DAYLIGHT_LEGACY_RANGE.1).contains(&cct)
        || (DAYLIGHT_KELVIN_RANGE.0..=DAYLIGHT_KELVIN_RANGE.1).contains(&cct)
}

fn blackbody_cct_in_band(cct: f64) -> bool {
    cct >= BLACKBODY_KELVIN_RANGE.0 && cct < BLACKBODY_KELVIN_RANGE.1
}

/// Reconstructs a CIE D-series daylight SPD over the default grid.
///
/// Accepts a CCT either in Kelvin (4000-25000) or in the legacy hundreds
/// form (40-250, scaled by `100 * 1.4387752 / 1.438` onto the Kelvin axis).
///
/// # Panics
///
/// Panics when `cct` lies in neither band. Callers that take untrusted
/// temperatures must validate first (see [`generate_illuminant`]).
pub fn daylight_spd(cct: f64) -> Spectrum {
    let cctd = if (DAYLIGHT_LEGACY_RANGE.0..=DAYLIGHT_LEGACY_RANGE.1).contains(&cct) {
        cct * 100.0 * 1.4387752 / 1.438
    } else if (DAYLIGHT_KELVIN_RANGE.0..=DAYLIGHT_KELVIN_RANGE.1).contains(&cct) {
        cct
    } else {
        panic!("daylight colour temperature must be in [4000, 25000], got {cct}");
    };

    let (x, y) = daylight_xy(cctd);

    let m0 = 0.0241 + 0.2562 * x - 0.7341 * y;
    let m1 = (-1.3515 - 1.7703 * x + 5.9114 * y) / m0;
    let m2 = (0.03000 - 31.4424 * x + 30.0717 * y) / m0;

    let shape = SpectralShape::DEFAULT;
    let values = shape
        .wavelengths()
        .map(|wl| {
            let wl = f64::from(wl);
            s_component(wl, 0) + m1 * s_component(wl, 1) + m2 * s_component(wl, 2)
        })
        .collect();

    Spectrum::from_values(shape, values).expect("grid sample count")
}

/// Evaluates a Planckian blackbody SPD over the default grid.
///
/// # Panics
///
/// Panics unless `cct` is in [1500, 4000). Callers that take untrusted
/// temperatures must validate first (see [`generate_illuminant`]).
pub fn blackbody_spd(cct: f64) -> Spectrum {
    assert!(
        blackbody_cct_in_band(cct),
        "blackbody colour temperature must be in [1500, 4000), got {cct}"
    );

    let shape = SpectralShape::DEFAULT;
    let c1 = 2.0 * PLANCK_H * LIGHT_C.powi(2);
    let values = shape
        .wavelengths()
        .map(|wl| {
            let lambda = f64::from(wl) / 1.0e9;
            let c2 = (PLANCK_H * LIGHT_C) / (BOLTZMANN_K * lambda * cct);
            c1 * std::f64::consts::PI / (lambda.powi(5) * (c2.exp() - 1.0))
        })
        .collect();

    Spectrum::from_values(shape, values).expect("grid sample count")
}

fn record_from_spd(tag: String, spd: Spectrum) -> IlluminantRecord {
    let mut data = SpectralData {
        illuminant: Some(tag),
        shape: spd.shape(),
        ..Default::default()
    };
    data.push_channel(MAIN_SET, "power", spd)
        .expect("generator shape matches record shape");
    IlluminantRecord::from_data(data).expect("generator layout")
}

/// Builds a daylight illuminant record after validating the CCT band.
pub fn daylight_illuminant(cct: f64, tag: impl Into<String>) -> SpectralResult<IlluminantRecord> {
    if !daylight_cct_in_band(cct) {
        return Err(SpectralError::CctOutOfRange {
            kind: "daylight",
            cct,
            min: DAYLIGHT_KELVIN_RANGE.0,
            max: DAYLIGHT_KELVIN_RANGE.1,
        });
    }
    Ok(record_from_spd(tag.into(), daylight_spd(cct)))
}

/// Builds a blackbody illuminant record after validating the CCT band.
pub fn blackbody_illuminant(cct: f64, tag: impl Into<String>) -> SpectralResult<IlluminantRecord> {
    if !blackbody_cct_in_band(cct) {
        return Err(SpectralError::CctOutOfRange {
            kind: "blackbody",
            cct,
            min: BLACKBODY_KELVIN_RANGE.0,
            max: BLACKBODY_KELVIN_RANGE.1,
        });
    }
    Ok(record_from_spd(tag.into(), blackbody_spd(cct)))
}

/// A parsed generator-backed illuminant name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IlluminantName {
    /// `d` followed by digits: daylight. The number is the CCT, in the
    /// legacy hundreds form when at most 250, otherwise in Kelvin.
    Daylight(f64),
    /// Digits followed by `k`: blackbody, in Kelvin.
    Blackbody(f64),
}

/// Parses a generator-backed illuminant name (`d55`, `D6500`, `3200k`).
///
/// Returns `None` for names that must be resolved against measured
/// illuminant files instead.
pub fn parse_illuminant_name(name: &str) -> Option<IlluminantName> {
    let lower = name.to_ascii_lowercase();

    if let Some(digits) = lower.strip_prefix('d') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Some(IlluminantName::Daylight(digits.parse().ok()?));
        }
    }
    if let Some(digits) = lower.strip_suffix('k') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Some(IlluminantName::Blackbody(digits.parse().ok()?));
        }
    }
    None
}

/// Synthesises an illuminant from its name.
///
/// Recognises the daylight (`d55`, `d6500`) and blackbody (`3200k`) forms;
/// the record's tag is the lowercased name. Fails with
/// [`SpectralError::InvalidIlluminantName`](crate::SpectralError::InvalidIlluminantName)
/// for anything else, and with `CctOutOfRange` when the encoded temperature
/// is outside the generator's band.
pub fn generate_illuminant(name: &str) -> SpectralResult<IlluminantRecord> {
    let parsed = parse_illuminant_name(name)
        .ok_or_else(|| SpectralError::InvalidIlluminantName(name.to_string()))?;

    debug!(name, ?parsed, "generating illuminant");

    match parsed {
        IlluminantName::Daylight(cct) => daylight_illuminant(cct, format!("d{}", cct as i64)),
        IlluminantName::Blackbody(cct) => blackbody_illuminant(cct, format!("{}k", cct as i64)),
    }
}

//! The DNG-metadata IDT solver.
//!
//! When no spectral measurement exists for a camera, its DNG calibration
//! tags still pin down a usable transform: two XYZ-to-camera matrices at
//! two reference illuminants, the as-shot neutral, and the baseline
//! exposure. The solver interpolates the calibrations at the scene's
//! estimated colour temperature, derives the camera's white point, and
//! composes a chromatic adaptation to the ACES white with the fixed
//! XYZ-to-AP0 matrix.
//!
//! The returned IDT embeds the adaptation: consumers convert decoded
//! pixels to XYZ and apply this one matrix, nothing else.

use crate::{SolverError, SolverResult};
use idt_colorimetry::{
    cct_to_mired, cct_to_xyz, light_source_to_cct, rgb_to_xyz_matrix, xyz_to_cct, ACES_AP0,
    CCT_RANGE, XYZ_D65_TO_ACES_RGB,
};
use idt_math::{cat_matrix, Mat3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One DNG calibration: a reference illuminant and its matrices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Calibration {
    /// EXIF LightSource tag of the reference illuminant (0 = unknown).
    #[serde(default)]
    pub illuminant: u16,

    /// Row-major 3x3 XYZ-to-camera-RGB matrix (9 values).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xyz_to_rgb_matrix: Vec<f64>,

    /// Row-major per-unit camera calibration matrix (9 values).
    ///
    /// Carried through for forward compatibility; the current transform
    /// derivation does not consume it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub camera_calibration_matrix: Vec<f64>,
}

/// DNG metadata consumed by [`MetadataSolver`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Baseline exposure in stops.
    #[serde(default)]
    pub baseline_exposure: f64,

    /// As-shot neutral in camera RGB (reciprocal of the camera's
    /// white-balance multipliers). Empty when the file carries none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neutral_rgb: Vec<f64>,

    /// The two calibrations, at two different reference illuminants.
    pub calibration: [Calibration; 2],
}

fn calibration_matrix(calibration: &Calibration, which: &str) -> SolverResult<Mat3> {
    Mat3::from_row_major_slice(&calibration.xyz_to_rgb_matrix).ok_or_else(|| {
        SolverError::InvalidMetadata(format!(
            "{which} XYZ-to-RGB matrix has {} values, expected 9",
            calibration.xyz_to_rgb_matrix.len()
        ))
    })
}

/// Linear interpolation of the two calibration matrices in mired space.
///
/// The weight `(mired1 - mired) / (mired1 - mired2)` is clamped to [0, 1],
/// so temperatures outside the calibrated span take the nearer endpoint.
pub fn xyz_to_camera_weighted(
    mired: f64,
    mired1: f64,
    mired2: f64,
    matrix1: &Mat3,
    matrix2: &Mat3,
) -> Mat3 {
    let span = mired1 - mired2;
    let weight = if span == 0.0 {
        1.0
    } else {
        ((mired1 - mired) / span).clamp(0.0, 1.0)
    };

    let mut result = Mat3::ZERO;
    for i in 0..3 {
        for j in 0..3 {
            result.m[i][j] = matrix1.m[i][j] + weight * (matrix2.m[i][j] - matrix1.m[i][j]);
        }
    }
    result
}

/// Resolves the XYZ-to-camera matrix consistent with the as-shot neutral.
///
/// Walks mired space between the two calibration illuminants looking for
/// the fixed point where the interpolation temperature matches the colour
/// temperature the interpolated matrix assigns to the neutral. Without a
/// second calibration illuminant or a neutral value the first calibration
/// is returned as-is (with a warning).
pub fn find_xyz_to_camera(metadata: &Metadata) -> SolverResult<Mat3> {
    let matrix1 = calibration_matrix(&metadata.calibration[0], "first")?;

    if metadata.calibration[0].illuminant == 0 {
        warn!("no calibration illuminants in metadata; using first calibration as-is");
        return Ok(matrix1);
    }
    if metadata.neutral_rgb.len() != 3 {
        warn!("no as-shot neutral in metadata; using first calibration as-is");
        return Ok(matrix1);
    }

    let matrix2 = calibration_matrix(&metadata.calibration[1], "second")?;
    let neutral = Vec3::new(
        metadata.neutral_rgb[0],
        metadata.neutral_rgb[1],
        metadata.neutral_rgb[2],
    );

    let mired1 = cct_to_mired(light_source_to_cct(metadata.calibration[0].illuminant));
    let mired2 = cct_to_mired(light_source_to_cct(metadata.calibration[1].illuminant));

    let max_mired = cct_to_mired(CCT_RANGE.0);
    let min_mired = cct_to_mired(CCT_RANGE.1);

    let lo_mired = mired1.min(mired2).clamp(min_mired, max_mired);
    let hi_mired = mired1.max(mired2).clamp(min_mired, max_mired);
    let step = 5.0_f64.max((hi_mired - lo_mired) / 50.0);

    let mut estimated = 0.0;
    let mut last_error = 0.0;
    let mut last_mired = 0.0;
    let mut smallest_error: f64 = 0.0;

    let mut mired = lo_mired;
    while mired < hi_mired {
        let candidate = xyz_to_camera_weighted(mired, mired1, mired2, &matrix1, &matrix2);
        let inverse = candidate
            .inverse()
            .ok_or(SolverError::Singular("interpolated XYZ-to-camera matrix"))?;

        let estimated_cct = xyz_to_cct(inverse * neutral);
        let error = mired - cct_to_mired(estimated_cct);

        if error.abs() <= 1e-9 {
            estimated = mired;
            break;
        }
        if (mired - lo_mired).abs() > 1e-9 && error * last_error <= 0.0 {
            // Sign change: interpolate the crossing in mired space.
            estimated = mired + error / (error - last_error) * (mired - last_mired);
            break;
        }
        if (mired - lo_mired).abs() <= 1e-9 || error.abs() < smallest_error.abs() {
            estimated = mired;
            smallest_error = error;
        }

        last_error = error;
        last_mired = mired;
        mired += step;
    }

    debug!(estimated_mired = estimated, "resolved scene colour temperature");
    Ok(xyz_to_camera_weighted(estimated, mired1, mired2, &matrix1, &matrix2))
}

/// The camera-to-XYZ matrix (scaled by the baseline exposure gain) and the
/// camera's white point in XYZ, normalised to Y = 1.
fn camera_xyz_and_white(metadata: &Metadata) -> SolverResult<(Mat3, Vec3)> {
    let xyz_to_camera = find_xyz_to_camera(metadata)?;
    let camera_to_xyz = xyz_to_camera
        .inverse()
        .ok_or(SolverError::Singular("XYZ-to-camera matrix"))?;

    if camera_to_xyz.sum().abs() <= 1e-9 {
        return Err(SolverError::Singular("camera-to-XYZ matrix sums to zero"));
    }

    let camera_to_xyz = camera_to_xyz * 2.0_f64.powf(metadata.baseline_exposure);

    let white = if metadata.neutral_rgb.len() == 3 {
        camera_to_xyz
            * Vec3::new(
                metadata.neutral_rgb[0],
                metadata.neutral_rgb[1],
                metadata.neutral_rgb[2],
            )
    } else {
        cct_to_xyz(light_source_to_cct(metadata.calibration[0].illuminant))
    };

    if white.y == 0.0 || white.sum() == 0.0 {
        return Err(SolverError::Singular("camera white point"));
    }

    Ok((camera_to_xyz, white / white.y))
}

/// Derives IDT matrices from DNG calibration metadata.
#[derive(Debug, Clone)]
pub struct MetadataSolver {
    metadata: Metadata,
}

impl MetadataSolver {
    /// Creates a solver over the given metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self { metadata }
    }

    /// The chromatic adaptation from the camera's white point to the ACES
    /// white.
    pub fn calculate_cat_matrix(&self) -> SolverResult<Mat3> {
        let (_, camera_white) = camera_xyz_and_white(&self.metadata)?;

        let aces_rgb_to_xyz =
            rgb_to_xyz_matrix(&ACES_AP0).ok_or(SolverError::Singular("ACES primaries"))?;
        let aces_white = aces_rgb_to_xyz * Vec3::ONE;

        Ok(cat_matrix(camera_white, aces_white))
    }

    /// The full IDT: the D65-referred XYZ-to-AP0 matrix composed with the
    /// chromatic adaptation.
    ///
    /// The adaptation is baked in; downstream consumers apply this matrix
    /// to XYZ pixel data and nothing else.
    pub fn calculate_idt_matrix(&self) -> SolverResult<Mat3> {
        let cat = self.calculate_cat_matrix()?;
        let idt = XYZ_D65_TO_ACES_RGB * cat;

        if idt.sum().abs() <= 1e-9 {
            return Err(SolverError::Singular("IDT matrix sums to zero"));
        }

        Ok(idt)
    }
}

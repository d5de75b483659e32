//! Colour primaries, the ACES AP0 definition, and RGB-XYZ matrix generation.
//!
//! A colour space is defined by the CIE xy chromaticities of its three
//! primaries and its white point. [`rgb_to_xyz_matrix`] turns that definition
//! into the 3x3 matrix mapping the space's RGB onto CIE XYZ.

use idt_math::{Mat3, Vec3};

/// RGB colour space primaries definition.
///
/// Each primary and the white point is a CIE xy chromaticity pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary (x, y) chromaticity
    pub r: (f64, f64),
    /// Green primary (x, y) chromaticity
    pub g: (f64, f64),
    /// Blue primary (x, y) chromaticity
    pub b: (f64, f64),
    /// White point (x, y) chromaticity
    pub w: (f64, f64),
    /// Colour space name
    pub name: &'static str,
}

impl Primaries {
    /// White point as XYZ with Y normalised to 1.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        let w = xy_to_xyz(self.w.0, self.w.1);
        w / w.y
    }
}

/// ACES AP0 primaries (SMPTE ST 2065-1).
pub const ACES_AP0: Primaries = Primaries {
    r: (0.73470, 0.26530),
    g: (0.00000, 1.00000),
    b: (0.00010, -0.07700),
    w: (0.32168, 0.33767),
    name: "ACES AP0",
};

/// The ACES neutral (~D60) white point in XYZ, Y = 1.
pub const ACES_WHITE_XYZ: Vec3 = Vec3::new(0.952646074569846, 1.0, 1.00882518435159);

/// XYZ to ACES AP0 RGB, for inputs already adapted to the ACES white.
pub const XYZ_TO_ACES_RGB: Mat3 = Mat3::from_rows([
    [1.0498110175, 0.0000000000, -0.0000974845],
    [-0.4959030231, 1.3733130458, 0.0982400361],
    [0.0000000000, 0.0000000000, 0.9912520182],
]);

/// ACES AP0 RGB to XYZ. Inverse companion of [`XYZ_TO_ACES_RGB`].
pub const ACES_RGB_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.952552395938186, 0.0, 9.36786316604686e-05],
    [0.343966449765075, 0.728166096613485, -0.0721325463785608],
    [0.0, 0.0, 1.00882518435159],
]);

/// XYZ to ACES AP0 RGB for D65-referred inputs (Bradford-adapted).
///
/// Used on the metadata path, where the solved chromatic adaptation lands
/// camera values in D65-referred XYZ.
pub const XYZ_D65_TO_ACES_RGB: Mat3 = Mat3::from_rows([
    [1.0634731317028, 0.00639793641966071, -0.0157891874506841],
    [-0.492082784686793, 1.36823709310019, 0.0913444629573544],
    [-0.0028137154424595, 0.00463991165243123, 0.91649468506889],
]);

/// Converts a CIE xy chromaticity to XYZ on the X + Y + Z = 1 plane.
#[inline]
pub fn xy_to_xyz(x: f64, y: f64) -> Vec3 {
    Vec3::new(x, y, 1.0 - x - y)
}

/// Computes the RGB-to-XYZ matrix for a set of primaries.
///
/// Column-stacks the primaries' XYZ, solves for the channel gains that map
/// RGB (1, 1, 1) onto the white point's XYZ (with Y = 1), and scales the
/// columns by those gains.
///
/// Returns `None` if the primaries are colinear (singular system).
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> Option<Mat3> {
    let r = xy_to_xyz(primaries.r.0, primaries.r.1);
    let g = xy_to_xyz(primaries.g.0, primaries.g.1);
    let b = xy_to_xyz(primaries.b.0, primaries.b.1);
    let w = primaries.white_xyz();

    let cols = Mat3::from_col_vecs(r, g, b);
    let gains = cols.inverse()? * w;

    Some(cols * Mat3::diagonal_vec(gains))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aces_rgb_to_xyz_matrix() {
        // The AP0 primaries must reproduce the published ACES RGB-to-XYZ
        // matrix bit-for-bit at working precision.
        let m = rgb_to_xyz_matrix(&ACES_AP0).unwrap();
        let expected = [
            0.952552395938,
            0.0,
            0.000093678632,
            0.343966449765,
            0.728166096613,
            -0.072132546379,
            0.0,
            0.0,
            1.008825184352,
        ];
        let got = m.to_row_major();
        for (a, b) in got.iter().zip(expected) {
            assert!((a - b).abs() < 1e-5, "{a} vs {b}");
        }
    }

    #[test]
    fn test_aces_matrix_constants_are_inverses() {
        let product = XYZ_TO_ACES_RGB * ACES_RGB_TO_XYZ;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_aces_white_from_primaries() {
        let w = ACES_AP0.white_xyz();
        assert!((w.x - ACES_WHITE_XYZ.x).abs() < 1e-10);
        assert_eq!(w.y, 1.0);
        assert!((w.z - ACES_WHITE_XYZ.z).abs() < 1e-10);
    }

    #[test]
    fn test_white_maps_to_unit_rgb() {
        let m = rgb_to_xyz_matrix(&ACES_AP0).unwrap();
        let rgb_white = m * Vec3::ONE;
        let w = ACES_AP0.white_xyz();
        assert!((rgb_white.x - w.x).abs() < 1e-12);
        assert!((rgb_white.y - w.y).abs() < 1e-12);
        assert!((rgb_white.z - w.z).abs() < 1e-12);
    }
}

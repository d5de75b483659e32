//! Chromatic Adaptation Transforms (CAT).
//!
//! Adapting a set of tristimulus values from one white point to another is
//! done in a cone-response domain: transform both whites to LMS, scale by
//! the per-channel ratio, and transform back.
//!
//! [`cat_matrix`] uses CAT02 (the default throughout the solvers);
//! [`cat_matrix_with`] accepts any cone-response matrix, e.g. [`BRADFORD`].
//!
//! # Usage
//!
//! ```rust
//! use idt_math::{cat_matrix, Vec3};
//!
//! let d65 = Vec3::new(0.9547, 1.0, 1.0883);
//! let d60 = Vec3::new(0.952646074569846, 1.0, 1.00882518435159);
//!
//! let adapt = cat_matrix(d65, d60);
//! let mapped = adapt * d65;
//! assert!((mapped.x - d60.x).abs() < 1e-9);
//! ```

use crate::{Mat3, Vec3};

/// CAT02 cone-response matrix (from the CIECAM02 appearance model).
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Inverse of [`CAT02`].
pub const CAT02_INV: Mat3 = Mat3::from_rows([
    [1.0961238208355142, -0.27886900021828726, 0.18274517938277304],
    [0.45436904197535921, 0.47353315430741177, 0.072097803717229125],
    [-0.0096276087384293551, -0.0056980312161134198, 1.0153256399545427],
]);

/// Bradford cone-response matrix.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Inverse of [`BRADFORD`].
pub const BRADFORD_INV: Mat3 = Mat3::from_rows([
    [0.9869929054667123, -0.14705425642099013, 0.15996265166373125],
    [0.43230526972339456, 0.5183602715367776, 0.0492912282128556],
    [-0.008528664575177328, 0.04004282165408487, 0.9684866957875502],
]);

/// Computes a chromatic adaptation matrix between two white points, using
/// the CAT02 cone-response domain.
///
/// The resulting matrix maps XYZ values adapted to `src_white` onto XYZ
/// values adapted to `dst_white`:
///
/// ```text
/// M = CAT02⁻¹ · diag(dst_LMS / src_LMS) · CAT02
/// ```
pub fn cat_matrix(src_white: Vec3, dst_white: Vec3) -> Mat3 {
    cat_matrix_with(CAT02, CAT02_INV, src_white, dst_white)
}

/// Computes a chromatic adaptation matrix in an arbitrary cone-response
/// domain given by `method` and its inverse.
pub fn cat_matrix_with(method: Mat3, method_inv: Mat3, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let src_lms = method * src_white;
    let dst_lms = method * dst_white;

    let scale = Mat3::diagonal_vec(dst_lms.div_element(src_lms));

    method_inv * scale * method
}

#[cfg(test)]
mod tests {
    use super::*;

    const D65: Vec3 = Vec3::new(0.9547, 1.0, 1.0883);
    const D60: Vec3 = Vec3::new(0.952646074569846, 1.0, 1.00882518435159);

    #[test]
    fn test_cat02_inverse_constant() {
        let product = CAT02 * CAT02_INV;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_bradford_inverse_constant() {
        let product = BRADFORD * BRADFORD_INV;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cat_maps_source_white_to_destination() {
        let adapt = cat_matrix(D65, D60);
        let mapped = adapt * D65;
        assert!((mapped.x - D60.x).abs() < 1e-9);
        assert!((mapped.y - D60.y).abs() < 1e-9);
        assert!((mapped.z - D60.z).abs() < 1e-9);
    }

    #[test]
    fn test_cat_identity_for_same_white() {
        let same = cat_matrix(D65, D65);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((same.m[i][j] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_cat_roundtrip() {
        let forward = cat_matrix(D65, D60);
        let back = cat_matrix(D60, D65);
        let roundtrip = back * forward;

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((roundtrip.m[i][j] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_bradford_maps_white() {
        let adapt = cat_matrix_with(BRADFORD, BRADFORD_INV, D65, D60);
        let mapped = adapt * D65;
        assert!((mapped.x - D60.x).abs() < 1e-9);
        assert!((mapped.y - D60.y).abs() < 1e-9);
        assert!((mapped.z - D60.z).abs() < 1e-9);
    }
}

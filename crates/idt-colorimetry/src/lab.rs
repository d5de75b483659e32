//! CIE 1976 L\*a\*b\* conversion.
//!
//! The spectral matrix fit minimises residuals in L\*a\*b\* rather than XYZ
//! so the objective weights colour differences perceptually. The conversion
//! is generic over [`Real`] so the same code produces both the fit targets
//! (plain `f64`) and the differentiated predictions (dual numbers).

use idt_math::{Real, Vec3};

// 216 / 24389
const E: f64 = 216.0 / 24389.0;
// (24389 / 27) / 116
const K: f64 = (24389.0 / 27.0) / 116.0;

#[inline]
fn lab_f<T: Real>(t: T) -> T {
    if t.value() > E {
        t.cbrt()
    } else {
        T::from_f64(K) * t + T::from_f64(16.0 / 116.0)
    }
}

/// Converts an XYZ triple to L\*a\*b\* relative to `white`.
pub fn xyz_to_lab<T: Real>(xyz: [T; 3], white: Vec3) -> [T; 3] {
    let fx = lab_f(xyz[0] / T::from_f64(white.x));
    let fy = lab_f(xyz[1] / T::from_f64(white.y));
    let fz = lab_f(xyz[2] / T::from_f64(white.z));

    [
        T::from_f64(116.0) * fy - T::from_f64(16.0),
        T::from_f64(500.0) * (fx - fy),
        T::from_f64(200.0) * (fy - fz),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ACES_WHITE_XYZ;
    use idt_math::Dual;

    #[test]
    fn test_white_maps_to_l100() {
        let lab = xyz_to_lab(ACES_WHITE_XYZ.to_array(), ACES_WHITE_XYZ);
        assert!((lab[0] - 100.0).abs() < 1e-10);
        assert!(lab[1].abs() < 1e-10);
        assert!(lab[2].abs() < 1e-10);
    }

    #[test]
    fn test_black_maps_to_l0() {
        let lab = xyz_to_lab([0.0, 0.0, 0.0], ACES_WHITE_XYZ);
        assert!(lab[0].abs() < 1e-10);
    }

    #[test]
    fn test_linear_branch_below_threshold() {
        // Y/Yn below 216/24389 takes the linear segment.
        let y = 0.005;
        let lab = xyz_to_lab([0.0, y, 0.0], Vec3::new(1.0, 1.0, 1.0));
        let expected_l = 116.0 * (K * y + 16.0 / 116.0) - 16.0;
        assert!((lab[0] - expected_l).abs() < 1e-12);
    }

    #[test]
    fn test_generic_over_dual() {
        // Derivative of L* with respect to Y at a mid grey, against a
        // central finite difference.
        let y0 = 0.18;
        let white = Vec3::new(1.0, 1.0, 1.0);

        let l = |y: f64| xyz_to_lab([0.18, y, 0.18], white)[0];
        let h = 1e-7;
        let fd = (l(y0 + h) - l(y0 - h)) / (2.0 * h);

        let y = Dual::<1>::variable(y0, 0);
        let lab = xyz_to_lab([Dual::constant(0.18), y, Dual::constant(0.18)], white);

        assert!((lab[0].eps[0] - fd).abs() < 1e-5);
    }
}

//! CIE 1960 UCS (u, v) chromaticity conversions.
//!
//! The Robertson CCT machinery (see [`crate::xyz_to_cct`]) works in the
//! CIE 1960 uniform chromaticity scale.

use crate::xy_to_xyz;
use idt_math::Vec3;

/// Converts CIE 1960 (u, v) to CIE xy chromaticity.
#[inline]
pub fn uv_to_xy(u: f64, v: f64) -> (f64, f64) {
    let scale = 2.0 * u - 8.0 * v + 4.0;
    (3.0 * u / scale, 2.0 * v / scale)
}

/// Converts CIE 1960 (u, v) to XYZ on the X + Y + Z = 1 plane.
#[inline]
pub fn uv_to_xyz(u: f64, v: f64) -> Vec3 {
    let (x, y) = uv_to_xy(u, v);
    xy_to_xyz(x, y)
}

/// Converts XYZ to CIE 1960 (u, v).
#[inline]
pub fn xyz_to_uv(xyz: Vec3) -> (f64, f64) {
    let scale = xyz.x + 15.0 * xyz.y + 3.0 * xyz.z;
    (4.0 * xyz.x / scale, 6.0 * xyz.y / scale)
}

//! Correlated colour temperature via the Robertson isotherm table.
//!
//! Robertson's method relates mired (reciprocal mega-Kelvin) to isothermal
//! lines in the CIE 1960 UCS plane. Each table row holds the (u, v) of a
//! blackbody point plus the slope of its isotherm; CCT lookup walks the
//! table for a sign change of the signed distance to the isotherm and
//! interpolates in mired space.

use crate::{uv_to_xyz, xyz_to_uv};
use idt_math::Vec3;

/// Robertson isotherm table: 31 rows of (u, v, isotherm slope).
pub const ROBERTSON_UVT: [[f64; 3]; 31] = [
    [0.18006, 0.26352, -0.24341],
    [0.18066, 0.26589, -0.25479],
    [0.18133, 0.26846, -0.26876],
    [0.18208, 0.27119, -0.28539],
    [0.18293, 0.27407, -0.3047],
    [0.18388, 0.27709, -0.32675],
    [0.18494, 0.28021, -0.35156],
    [0.18611, 0.28342, -0.37915],
    [0.18740, 0.28668, -0.40955],
    [0.18880, 0.28997, -0.44278],
    [0.19032, 0.29326, -0.47888],
    [0.19462, 0.30141, -0.58204],
    [0.19962, 0.30921, -0.70471],
    [0.20525, 0.31647, -0.84901],
    [0.21142, 0.32312, -1.0182],
    [0.21807, 0.32909, -1.2168],
    [0.22511, 0.33439, -1.4512],
    [0.23247, 0.33904, -1.7298],
    [0.24010, 0.34308, -2.0637],
    [0.24792, 0.34655, -2.4681],
    [0.25591, 0.34951, -2.9641],
    [0.26400, 0.35200, -3.5814],
    [0.27218, 0.35407, -4.3633],
    [0.28039, 0.35577, -5.3762],
    [0.28863, 0.35714, -6.7262],
    [0.29685, 0.35823, -8.5955],
    [0.30505, 0.35907, -11.324],
    [0.31320, 0.35968, -15.628],
    [0.32129, 0.36011, -23.325],
    [0.32931, 0.36038, -40.77],
    [0.33724, 0.36051, -116.45],
];

/// Mired values corresponding to the [`ROBERTSON_UVT`] rows.
pub const ROBERTSON_MIRED: [f64; 31] = [
    1.0e-10, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 125.0, 150.0, 175.0,
    200.0, 225.0, 250.0, 275.0, 300.0, 325.0, 350.0, 375.0, 400.0, 425.0, 450.0, 475.0, 500.0,
    525.0, 550.0, 575.0, 600.0,
];

/// CCT clamp range for Robertson lookups, in Kelvin.
pub const CCT_RANGE: (f64, f64) = (2000.0, 50000.0);

/// Converts a correlated colour temperature in Kelvin to mired.
#[inline]
pub fn cct_to_mired(cct: f64) -> f64 {
    1.0e6 / cct
}

/// Converts mired to a correlated colour temperature in Kelvin.
#[inline]
pub fn mired_to_cct(mired: f64) -> f64 {
    1.0e6 / mired
}

/// Signed distance from a (u, v) point to a Robertson isotherm row.
///
/// The distance is the 2D cross product of the isotherm's unit slope vector
/// with the offset from the row's blackbody point; its sign flips as the
/// point crosses the isotherm, which is what the CCT walk looks for.
pub fn robertson_length(u: f64, v: f64, uvt: &[f64; 3]) -> f64 {
    let t = uvt[2];
    let sign = if t < 0.0 {
        -1.0
    } else if t > 0.0 {
        1.0
    } else {
        0.0
    };

    let slope_u = -sign / (1.0 + t * t).sqrt();
    let slope_v = t * slope_u;

    let du = u - uvt[0];
    let dv = v - uvt[1];

    // cross((slope_u, slope_v), (du, dv))
    slope_u * dv - slope_v * du
}

/// Estimates the correlated colour temperature of an XYZ value.
///
/// Walks the Robertson table for a sign change of [`robertson_length`],
/// interpolates the bracketing rows in mired space, and clamps the result
/// to [`CCT_RANGE`].
pub fn xyz_to_cct(xyz: Vec3) -> f64 {
    let (u, v) = xyz_to_uv(xyz);

    let n = ROBERTSON_UVT.len();
    let mut this_len = 0.0;
    let mut prev_len = 0.0;
    let mut index = n;

    for (i, row) in ROBERTSON_UVT.iter().enumerate() {
        this_len = robertson_length(u, v, row);
        if this_len <= 0.0 {
            index = i;
            break;
        }
        prev_len = this_len;
    }

    let mired = if index == 0 {
        ROBERTSON_MIRED[0]
    } else if index >= n {
        ROBERTSON_MIRED[n - 1]
    } else {
        ROBERTSON_MIRED[index - 1]
            + prev_len * (ROBERTSON_MIRED[index] - ROBERTSON_MIRED[index - 1])
                / (prev_len - this_len)
    };

    mired_to_cct(mired).clamp(CCT_RANGE.0, CCT_RANGE.1)
}

/// Converts a correlated colour temperature to an XYZ chromaticity point.
///
/// Inverse Robertson lookup: (u, v) is linearly interpolated between the
/// bracketing mired entries, then lifted to the X + Y + Z = 1 plane.
pub fn cct_to_xyz(cct: f64) -> Vec3 {
    let mired = cct_to_mired(cct);

    let n = ROBERTSON_MIRED.len();
    let index = ROBERTSON_MIRED
        .iter()
        .position(|&m| m >= mired)
        .unwrap_or(n);

    let (u, v) = if index == 0 {
        (ROBERTSON_UVT[0][0], ROBERTSON_UVT[0][1])
    } else if index >= n {
        (ROBERTSON_UVT[n - 1][0], ROBERTSON_UVT[n - 1][1])
    } else {
        let weight = (mired - ROBERTSON_MIRED[index - 1])
            / (ROBERTSON_MIRED[index] - ROBERTSON_MIRED[index - 1]);
        (
            ROBERTSON_UVT[index][0] * weight + ROBERTSON_UVT[index - 1][0] * (1.0 - weight),
            ROBERTSON_UVT[index][1] * weight + ROBERTSON_UVT[index - 1][1] * (1.0 - weight),
        )
    };

    uv_to_xyz(u, v)
}

/// Decodes an EXIF LightSource tag to a correlated colour temperature.
///
/// Tags at or above 32768 encode the temperature directly as `tag - 32768`;
/// the standardised enumerated sources map through a fixed table; anything
/// unrecognised falls back to 5500 K.
pub fn light_source_to_cct(tag: u16) -> f64 {
    if tag >= 32768 {
        return f64::from(tag) - 32768.0;
    }

    const TABLE: [(u16, f64); 11] = [
        (0, 5500.0),
        (1, 5500.0),
        (2, 3500.0),
        (3, 3400.0),
        (10, 5550.0),
        (17, 2856.0),
        (18, 4874.0),
        (19, 6774.0),
        (20, 5500.0),
        (21, 6500.0),
        (22, 7500.0),
    ];

    TABLE
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|&(_, cct)| cct)
        .unwrap_or(5500.0)
}

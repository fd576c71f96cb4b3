//! Small numeric and calendar helpers used across the crate.

use chrono::NaiveDateTime;

/// Bad data sentinels used by the OMNI solar wind listings.
pub const OMNI_SENTINELS: [f64; 4] = [999.99, 9999.99, 99999.9, 9_999_999.0];

/// Fill NaN gaps in `y` by linear interpolation along `x`.
///
/// Runs of NaN between finite samples are interpolated on the `x` axis; NaN
/// runs touching either end take the nearest finite value. A slice with no
/// finite value at all comes back unchanged.
///
/// # Panics
///
/// Panics if `x` and `y` have different lengths.
pub fn interp_nans(x: &[f64], y: &[f64]) -> Vec<f64> {
    assert_eq!(x.len(), y.len(), "x and y must have the same length");

    let finite: Vec<usize> = (0..y.len()).filter(|&i| !y[i].is_nan()).collect();
    if finite.is_empty() {
        return y.to_vec();
    }

    let mut filled = y.to_vec();

    for i in 0..filled.len() {
        if !filled[i].is_nan() {
            continue;
        }

        let after = finite.iter().find(|&&j| j > i);
        let before = finite.iter().rev().find(|&&j| j < i);

        filled[i] = match (before, after) {
            (Some(&lo), Some(&hi)) => {
                let frac = (x[i] - x[lo]) / (x[hi] - x[lo]);
                y[lo] + frac * (y[hi] - y[lo])
            }
            (Some(&lo), None) => y[lo],
            (None, Some(&hi)) => y[hi],
            (None, None) => unreachable!("finite is non-empty"),
        };
    }

    filled
}

/// Replace every sentinel value in `values` with NaN.
///
/// OMNI marks washed out samples with all-9 sentinels; turning them into NaN
/// lets [`interp_nans`] fill the gaps.
pub fn clean_sentinels(values: &mut [f64], sentinels: &[f64]) {
    for value in values.iter_mut() {
        if sentinels.iter().any(|s| s == value) {
            *value = std::f64::NAN;
        }
    }
}

/// The Julian date of a UT time.
pub fn julian_date(time: NaiveDateTime) -> f64 {
    const UNIX_EPOCH_JD: f64 = 2_440_587.5;
    time.timestamp() as f64 / 86_400.0 + UNIX_EPOCH_JD
}

/// The fractional Carrington rotation number at a UT time.
///
/// Rotation 1 began 1853-11-09 (JD 2398167.329) and a rotation lasts
/// 27.2753 days. Synoptic magnetogram archives are keyed by the integer
/// part.
pub fn carrington_rotation_number(time: NaiveDateTime) -> f64 {
    const ROTATION_1_JD: f64 = 2_398_167.329;
    const ROTATION_DAYS: f64 = 27.2753;

    (julian_date(time) - ROTATION_1_JD) / ROTATION_DAYS + 1.0
}

/// The element of `times` nearest to `pivot`, or `None` for an empty slice.
pub fn nearest_time(pivot: NaiveDateTime, times: &[NaiveDateTime]) -> Option<NaiveDateTime> {
    times
        .iter()
        .min_by_key(|&&t| (t - pivot).num_seconds().abs())
        .copied()
}

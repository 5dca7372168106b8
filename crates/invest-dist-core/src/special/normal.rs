use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::InvestDistError;
use crate::InvestDistResult;

// ---------------------------------------------------------------------------
// Error function
// ---------------------------------------------------------------------------

/// Gauss error function, Abramowitz & Stegun 7.1.26.
///
/// Max absolute error ~1.5e-7. Evaluated on `|x|` and sign-restored, so
/// `erf(-x) == -erf(x)` holds exactly.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const P: f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;

    let t = 1.0 / (1.0 + P * x);
    let poly = t * (A1 + t * (A2 + t * (A3 + t * (A4 + t * A5))));
    sign * (1.0 - poly * (-x * x).exp())
}

// ---------------------------------------------------------------------------
// Standard normal
// ---------------------------------------------------------------------------

/// Standard normal CDF: Phi(x) = 0.5 * (1 + erf(x / sqrt(2)))
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x * FRAC_1_SQRT_2))
}

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

// Beasley-Springer-Moro coefficients
const BSM_A: [f64; 4] = [
    2.506_628_238_84,
    -18.615_000_625_29,
    41.391_197_735_34,
    -25.441_060_496_37,
];
const BSM_B: [f64; 4] = [
    -8.473_510_930_90,
    23.083_367_437_43,
    -21.062_241_018_26,
    3.130_829_098_33,
];
const BSM_C: [f64; 9] = [
    0.337_475_482_272_614_7,
    0.976_169_019_091_718_6,
    0.160_797_971_491_820_9,
    0.027_643_881_033_386_3,
    0.003_840_572_937_360_9,
    0.000_395_189_651_191_9,
    0.000_032_176_788_176_8,
    0.000_000_288_816_736_4,
    0.000_000_396_031_518_7,
];

/// Inverse standard normal CDF (percentile point function), Beasley-Springer-Moro.
///
/// Central branch for `|p - 0.5| < 0.42`, tail branch in `ln(-ln r)` beyond.
/// Returns `InvalidProbability` unless `0 < p < 1`; the input is never clamped.
pub fn normal_inverse_cdf(p: f64) -> InvestDistResult<f64> {
    if p.is_nan() || p <= 0.0 || p >= 1.0 {
        return Err(InvestDistError::InvalidProbability(p));
    }

    let y = p - 0.5;
    if y.abs() < 0.42 {
        let r = y * y;
        let num = ((BSM_A[3] * r + BSM_A[2]) * r + BSM_A[1]) * r + BSM_A[0];
        let den = (((BSM_B[3] * r + BSM_B[2]) * r + BSM_B[1]) * r + BSM_B[0]) * r + 1.0;
        return Ok(y * num / den);
    }

    let r = if y < 0.0 { p } else { 1.0 - p };
    let s = (-r.ln()).ln();
    let x = BSM_C.iter().rev().fold(0.0, |acc, c| acc * s + c);

    Ok(if y < 0.0 { -x } else { x })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Special functions needed by the spectral corrections.

use nalgebra::Complex;
use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural logarithm of the gamma function for complex arguments (Lanczos approximation).
///
/// Only the real part is branch independent; callers needing `|Γ(z)|` should use
/// [`ln_gamma_modulus`].
pub fn ln_gamma_complex(z: Complex<f64>) -> Complex<f64> {
    if z.re < 0.5 {
        let pi = Complex::new(PI, 0.0);
        let reflected = ln_gamma_complex(Complex::new(1.0, 0.0) - z);
        return pi.ln() - (pi * z).sin().ln() - reflected;
    }

    let z = z - 1.0;
    let mut series = Complex::new(LANCZOS_COEFFICIENTS[0], 0.0);
    for (i, &c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        series += c / (z + i as f64);
    }
    let t = z + (LANCZOS_G + 0.5);
    Complex::new(0.5 * (2.0 * PI).ln(), 0.0) + (z + 0.5) * t.ln() - t + series.ln()
}

/// `ln |Γ(x + iy)|`.
#[inline]
pub fn ln_gamma_modulus(x: f64, y: f64) -> f64 {
    ln_gamma_complex(Complex::new(x, y)).re
}

/// `ln Γ(x)` for real `x > 0`.
#[inline]
pub fn ln_gamma(x: f64) -> f64 {
    ln_gamma_modulus(x, 0.0)
}

/// Dilogarithm `Li₂(x)` for `-1 ≤ x ≤ 1`.
pub fn dilog(x: f64) -> f64 {
    if x == 1.0 {
        return PI * PI / 6.0;
    }
    if x > 0.5 {
        return PI * PI / 6.0 - x.ln() * (1.0 - x).ln() - dilog(1.0 - x);
    }
    let mut term = x;
    let mut sum = 0.0_f64;
    let mut k = 1.0_f64;
    while term.abs() > 1e-17 * sum.abs().max(1e-300) && k < 10_000.0 {
        sum += term / (k * k);
        k += 1.0;
        term *= x;
    }
    sum
}

/// Spence function in Sirlin's convention, `L(x) = ∫₀ˣ ln(1 - t)/t dt = -Li₂(x)`.
#[inline]
pub fn spence(x: f64) -> f64 {
    -dilog(x)
}

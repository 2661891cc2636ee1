//! Integral observables derived from a generated spectrum.
//!
//! All integrals use the composite Simpson rule over the spectrum's own grid, so a single
//! generated table serves every observable.

use super::error::EngineError;
use super::spectrum::{Spectrum, SpectrumPoint};
use crate::core::constants::w_to_kev;
use crate::core::utils::integration::simpson_by;

fn require_points(spectrum: &Spectrum) -> Result<(), EngineError> {
    if spectrum.is_empty() {
        Err(EngineError::EmptySpectrum)
    } else {
        Ok(())
    }
}

/// Phase-space integral `f = ∫ electron dW`.
pub fn phase_space_integral(spectrum: &Spectrum) -> Result<f64, EngineError> {
    require_points(spectrum)?;
    Ok(simpson_by(spectrum.points(), |p| (p.w, p.electron))?)
}

/// `log10(f · t½)` with the partial half-life `t½` in seconds.
///
/// # Errors
///
/// Returns [`EngineError::InvalidHalflife`] unless `halflife` is positive and finite,
/// [`EngineError::EmptySpectrum`] for an empty spectrum and [`EngineError::Integration`]
/// when the grid cannot be integrated.
pub fn log_ft(spectrum: &Spectrum, halflife: f64) -> Result<f64, EngineError> {
    if !(halflife > 0.0) || !halflife.is_finite() {
        return Err(EngineError::InvalidHalflife(halflife));
    }
    let f = phase_space_integral(spectrum)?;
    Ok((f * halflife).log10())
}

fn first_moment<F>(spectrum: &Spectrum, weight: F) -> Result<f64, EngineError>
where
    F: Fn(&SpectrumPoint) -> f64,
{
    require_points(spectrum)?;
    let norm = simpson_by(spectrum.points(), |p| (p.w, weight(p)))?;
    let moment = simpson_by(spectrum.points(), |p| (p.w, p.w * weight(p)))?;
    if !(norm > 0.0) {
        return Err(EngineError::EmptySpectrum);
    }
    Ok(moment / norm)
}

/// Mean total electron energy `∫ W·N(W) dW / ∫ N(W) dW`.
pub fn mean_energy(spectrum: &Spectrum) -> Result<f64, EngineError> {
    first_moment(spectrum, |p| p.electron)
}

pub fn mean_kinetic_energy_kev(spectrum: &Spectrum) -> Result<f64, EngineError> {
    mean_energy(spectrum).map(w_to_kev)
}

/// Mean total antineutrino energy over the same grid.
pub fn mean_neutrino_energy(spectrum: &Spectrum) -> Result<f64, EngineError> {
    first_moment(spectrum, |p| p.neutrino)
}

/// Ratio of a calculated ft value to an external one, given both as log ft.
pub fn ft_ratio(log_ft_calculated: f64, log_ft_external: f64) -> f64 {
    10f64.powf(log_ft_calculated - log_ft_external)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_spectrum(n: usize, w0: f64) -> Spectrum {
        let points = (0..=n)
            .map(|i| {
                let w = 1.0 + (w0 - 1.0) * i as f64 / n as f64;
                SpectrumPoint {
                    w,
                    electron: 1.0,
                    neutrino: 1.0,
                }
            })
            .collect();
        Spectrum::new(points, w0)
    }

    #[test]
    fn log_ft_of_a_flat_spectrum() {
        let spectrum = flat_spectrum(10, 3.0);
        // f = 2, t = 50 s
        assert!((log_ft(&spectrum, 50.0).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn log_ft_requires_a_positive_halflife() {
        let spectrum = flat_spectrum(10, 3.0);
        assert!(matches!(log_ft(&spectrum, 0.0), Err(EngineError::InvalidHalflife(_))));
        assert!(matches!(log_ft(&spectrum, -1.0), Err(EngineError::InvalidHalflife(_))));
    }

    #[test]
    fn empty_spectra_have_no_observables() {
        let empty = Spectrum::new(Vec::new(), 2.0);
        assert!(matches!(log_ft(&empty, 1.0), Err(EngineError::EmptySpectrum)));
        assert!(matches!(mean_energy(&empty), Err(EngineError::EmptySpectrum)));
    }

    #[test]
    fn single_point_spectra_cannot_be_integrated() {
        let single = Spectrum::new(
            vec![SpectrumPoint {
                w: 1.5,
                electron: 1.0,
                neutrino: 1.0,
            }],
            2.0,
        );
        assert!(matches!(log_ft(&single, 1.0), Err(EngineError::Integration { .. })));
    }

    #[test]
    fn mean_energy_of_a_flat_spectrum_is_the_midpoint() {
        let spectrum = flat_spectrum(20, 3.0);
        assert!((mean_energy(&spectrum).unwrap() - 2.0).abs() < 1e-12);
        assert!((mean_neutrino_energy(&spectrum).unwrap() - 2.0).abs() < 1e-12);
        let kinetic = mean_kinetic_energy_kev(&spectrum).unwrap();
        assert!((kinetic - 510.99895).abs() < 1e-9);
    }

    #[test]
    fn mean_energy_of_a_weightless_spectrum_is_undefined() {
        let points = vec![
            SpectrumPoint {
                w: 1.0,
                electron: 0.0,
                neutrino: 0.0,
            },
            SpectrumPoint {
                w: 2.0,
                electron: 0.0,
                neutrino: 0.0,
            },
        ];
        let spectrum = Spectrum::new(points, 2.0);
        assert!(matches!(mean_energy(&spectrum), Err(EngineError::EmptySpectrum)));
    }

    #[test]
    fn ft_ratio_compares_on_a_linear_scale() {
        assert!((ft_ratio(3.5, 3.5) - 1.0).abs() < 1e-12);
        assert!((ft_ratio(4.0, 3.0) - 10.0).abs() < 1e-12);
    }
}

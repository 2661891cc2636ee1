use super::{ChargeDistribution, NuclearShape, ShapeFactorInputs, SpectralFunctions};
use crate::core::constants::{ELECTRON_MASS_KEV, FINE_STRUCTURE_CONSTANT as ALPHA, nucleon_mass_w};
use crate::core::tables::EXPANSION_ROWS;
use crate::core::transition::TransitionParameters;
use crate::core::utils::special::{ln_gamma, ln_gamma_modulus, spence};
use std::f64::consts::PI;

/// Momentum floor keeping the Coulomb functions finite at the `W = 1` grid edge, where the
/// phase space already vanishes.
const MIN_MOMENTUM: f64 = 1e-6;
/// Rose screening strength `N` in `V0 = N α² Z^(4/3)`.
const SCREENING_STRENGTH: f64 = 1.45;

/// Leading-order closed forms for every spectral correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardCorrections;

#[inline]
fn momentum(w: f64) -> f64 {
    (w * w - 1.0).max(0.0).sqrt()
}

/// `αZ` of the daughter, negative for positron emission.
#[inline]
fn signed_alpha_z(params: &TransitionParameters) -> f64 {
    params.beta_type.sign() * ALPHA * f64::from(params.zf)
}

#[inline]
fn coulomb_gamma(alpha_z: f64) -> f64 {
    (1.0 - alpha_z * alpha_z).sqrt()
}

#[inline]
fn nuclear_mass(params: &TransitionParameters) -> f64 {
    f64::from(params.a) * nucleon_mass_w()
}

fn ln_point_fermi_function(w: f64, alpha_z: f64, r: f64) -> f64 {
    let p = momentum(w).max(MIN_MOMENTUM);
    let w = w.max(1.0);
    let gamma = coulomb_gamma(alpha_z);
    let eta = alpha_z * w / p;
    (2.0 * (gamma + 1.0)).ln() + 2.0 * (gamma - 1.0) * (2.0 * p * r).ln()
        + PI * eta
        + 2.0 * ln_gamma_modulus(gamma, eta)
        - 2.0 * ln_gamma(2.0 * gamma + 1.0)
}

fn l0(w: f64, alpha_z: f64, r: f64, a: &[f64; EXPANSION_ROWS]) -> f64 {
    let gamma = coulomb_gamma(alpha_z);
    let wr = w * r;

    let mut sum = 0.0;
    let mut power = 1.0;
    for &coefficient in &a[1..] {
        sum += coefficient * power;
        power *= wr;
    }

    1.0 + 13.0 / 60.0 * alpha_z * alpha_z
        - wr * alpha_z * (41.0 - 26.0 * gamma) / (15.0 * (2.0 * gamma - 1.0))
        - alpha_z * r * gamma * (17.0 - 2.0 * gamma) / (30.0 * w * (2.0 * gamma - 1.0))
        + a[0] * r / w
        + sum
        + 0.41 * (r - 0.0164) * alpha_z.abs().powf(4.5)
}

/// Scale of the isovector correction for the assumed weak-charge distribution.
fn isovector_coefficient(shape: NuclearShape, fit: f64) -> f64 {
    match shape {
        NuclearShape::Fermi => 0.2,
        NuclearShape::ModifiedGaussian => (2.0 + 5.0 * fit) / (5.0 * (2.0 + 3.0 * fit)),
    }
}

impl SpectralFunctions for StandardCorrections {
    fn phase_space(&self, w: f64, params: &TransitionParameters) -> f64 {
        if w < 1.0 || w > params.w0 {
            return 0.0;
        }
        momentum(w) * w * (params.w0 - w).powi(2)
    }

    fn fermi_function(&self, w: f64, params: &TransitionParameters) -> f64 {
        ln_point_fermi_function(w, signed_alpha_z(params), params.r).exp()
    }

    fn shape_factor(
        &self,
        w: f64,
        params: &TransitionParameters,
        inputs: &ShapeFactorInputs,
    ) -> f64 {
        let alpha_z = signed_alpha_z(params);
        let s = params.beta_type.sign();
        let r = params.r;
        let w0 = params.w0;
        let m = nucleon_mass_w();
        let (vector, axial) = params.vector_axial_weights();

        let common = 1.0 - 233.0 / 630.0 * alpha_z * alpha_z - (w0 * r).powi(2) / 5.0
            + 4.0 / 9.0 * w0 * r * r * w
            - 4.0 / 9.0 * r * r * w * w;
        let fermi = common + 2.0 / 35.0 * w0 * r * alpha_z - 21.0 / 35.0 * r * alpha_z * w;
        let gamow_teller = common - 6.0 / 35.0 * w0 * r * alpha_z - 13.0 / 35.0 * r * alpha_z * w;

        let weak_magnetism = s * 2.0 / (3.0 * m) * inputs.b_ac * (2.0 * w - w0);
        let induced_tensor = s * inputs.d_ac / (3.0 * m) * (w0 - 2.0 * w);
        let higher_order = (2.0_f64 / 5.0).sqrt() * inputs.lambda * 4.0 / 45.0 * (r * (w0 - w)).powi(2);
        let pseudoscalar = if inputs.g_a != 0.0 {
            -(inputs.g_p / inputs.g_a) * (w0 - w).powi(2) / (12.0 * m * m)
        } else {
            0.0
        };

        let mut c = vector * fermi
            + axial * (gamow_teller + weak_magnetism + induced_tensor + higher_order + pseudoscalar);
        if inputs.isovector {
            c += alpha_z * r * (w0 - w) * isovector_coefficient(inputs.ns_shape, inputs.mod_gauss_fit);
        }
        c
    }

    fn relativistic(&self, w: f64, params: &TransitionParameters) -> f64 {
        let alpha_z = signed_alpha_z(params);
        let (vector, axial) = params.vector_axial_weights();
        vector + axial * (1.0 - alpha_z * alpha_z * (params.w0 - w) / (6.0 * w))
    }

    fn deformation(&self, w: f64, params: &TransitionParameters) -> f64 {
        let beta2 = params.daughter_beta2;
        if beta2 == 0.0 {
            return 1.0;
        }
        let alpha_z = signed_alpha_z(params);
        let expansion = params.expansion();
        let deformed_r = params.r * (1.0 + 5.0 / (4.0 * PI) * beta2 * beta2).sqrt();
        l0(w, alpha_z, deformed_r, expansion) / l0(w, alpha_z, params.r, expansion)
    }

    fn finite_size(&self, w: f64, params: &TransitionParameters) -> f64 {
        l0(w, signed_alpha_z(params), params.r, params.expansion())
    }

    fn charge_distribution(
        &self,
        w: f64,
        params: &TransitionParameters,
        distribution: &ChargeDistribution,
    ) -> f64 {
        match distribution.shape {
            NuclearShape::Fermi => {
                let z = f64::from(params.zf);
                let s = params.beta_type.sign();
                let p = momentum(w);
                let a0 = -5.6e-5 - s * 4.94e-5 * z + 6.23e-8 * z * z;
                let a1 = 5.17e-6 + s * 2.517e-6 * z + 2.00e-8 * z * z;
                let a2 = -9.17e-8 + s * 5.53e-9 * z + 1.25e-10 * z * z;
                1.0 + a0 + a1 * p + a2 * p * p
            }
            NuclearShape::ModifiedGaussian => {
                // first order in the potential difference, volume averaged over the nucleus
                let averaged: f64 = distribution
                    .expansion
                    .deltas()
                    .iter()
                    .enumerate()
                    .map(|(k, dv)| dv / (2.0 * k as f64 + 3.0))
                    .sum();
                1.0 + 2.0 * signed_alpha_z(params) * w * params.r * averaged
            }
        }
    }

    fn coulomb_recoil(&self, w: f64, params: &TransitionParameters) -> f64 {
        let p = momentum(w).max(MIN_MOMENTUM);
        let (vector, axial) = params.vector_axial_weights();
        let asymmetry = vector - axial / 3.0;
        1.0 - PI * signed_alpha_z(params) / (nuclear_mass(params) * p)
            * (1.0 + asymmetry * (params.w0 - w) / (3.0 * w))
    }

    fn radiative(&self, w: f64, params: &TransitionParameters) -> f64 {
        let w0 = params.w0;
        if w <= 1.0 || w >= w0 {
            return 1.0;
        }
        let beta = momentum(w) / w;
        let atanh = beta.atanh();
        let ln_mass = nucleon_mass_w().ln();

        let g = 3.0 * ln_mass - 0.75
            + 4.0 * (atanh / beta - 1.0) * ((w0 - w) / (3.0 * w) - 1.5 + (2.0 * (w0 - w)).ln())
            + 4.0 / beta * spence(2.0 * beta / (1.0 + beta))
            + atanh / beta
                * (2.0 * (1.0 + beta * beta) + (w0 - w).powi(2) / (6.0 * w * w) - 4.0 * atanh);
        let order_z_alpha2 =
            signed_alpha_z(params) * ALPHA * (ln_mass - 5.0 / 3.0 * (2.0 * w).ln() + 43.0 / 18.0);

        1.0 + ALPHA / (2.0 * PI) * g + order_z_alpha2
    }

    fn neutrino_radiative(&self, w: f64, params: &TransitionParameters) -> f64 {
        if w <= 1.0 || w >= params.w0 {
            return 1.0;
        }
        let beta = momentum(w) / w;
        let atanh = beta.atanh();

        let h = 3.0 * nucleon_mass_w().ln() + 23.0 / 4.0
            - 8.0 / beta * spence(2.0 * beta / (1.0 + beta))
            + 8.0 * (atanh / beta - 1.0) * (2.0 * w * beta).ln()
            + 4.0 * atanh / beta * ((7.0 + 3.0 * beta * beta) / 8.0 - 2.0 * atanh);

        1.0 + ALPHA / (2.0 * PI) * h
    }

    fn kinematic_recoil(&self, w: f64, params: &TransitionParameters) -> f64 {
        let m = nuclear_mass(params);
        let m2 = m * m;
        let w0 = params.w0;
        let (vector, axial) = params.vector_axial_weights();

        let vector_terms = [
            w0 * w0 / (2.0 * m2) - 11.0 / (6.0 * m2),
            w0 / (3.0 * m2),
            2.0 / m - 4.0 * w0 / (3.0 * m2),
            16.0 / (3.0 * m2),
        ];
        let axial_terms = [
            -2.0 * w0 / (3.0 * m) - w0 * w0 / (6.0 * m2) - 77.0 / (18.0 * m2),
            -2.0 / (3.0 * m) + 7.0 * w0 / (9.0 * m2),
            10.0 / (3.0 * m) - 28.0 * w0 / (9.0 * m2),
            88.0 / (9.0 * m2),
        ];

        let mut r = [0.0; 4];
        for (i, coefficient) in r.iter_mut().enumerate() {
            *coefficient = vector * vector_terms[i] + axial * axial_terms[i];
        }
        1.0 + r[0] + r[1] / w + r[2] * w + r[3] * w * w
    }

    fn atomic_screening(&self, w: f64, params: &TransitionParameters) -> f64 {
        let z = f64::from(params.zf);
        let potential = SCREENING_STRENGTH * ALPHA * ALPHA * z.powf(4.0 / 3.0);
        let screened_w = w - params.beta_type.sign() * potential;
        if w <= 1.0 || screened_w <= 1.0 {
            return 1.0;
        }

        let alpha_z = signed_alpha_z(params);
        let gamma = coulomb_gamma(alpha_z);
        let p = momentum(w);
        let screened_p = momentum(screened_w);
        let eta = alpha_z * w / p;
        let screened_eta = alpha_z * screened_w / screened_p;

        ((screened_w / w).ln()
            + (2.0 * gamma - 1.0) * (screened_p / p).ln()
            + PI * (screened_eta - eta)
            + 2.0 * (ln_gamma_modulus(gamma, screened_eta) - ln_gamma_modulus(gamma, eta)))
        .exp()
    }

    fn atomic_exchange(&self, w: f64, params: &TransitionParameters) -> f64 {
        let e = w - 1.0;
        if e <= 0.0 {
            return 1.0;
        }
        let [p0, p1, p2, p3, p4, p5, p6, p7, p8] = params.exchange_coefficients;
        1.0 + p0 / e
            + p1 / (e * e)
            + p2 * (-p3 * e).exp()
            + p4 * ((w - p6).max(0.0).powf(p5) + p7).sin() / w.powf(p8)
    }

    fn atomic_mismatch(&self, w: f64, params: &TransitionParameters) -> f64 {
        let remaining = params.w0 - w;
        if remaining <= 0.0 {
            return 1.0;
        }
        let z = f64::from(params.zf);
        let binding_ev = 44.200 * z.powf(0.41) + 2.3196e-7 * z.powf(4.45);
        1.0 - 0.5 / remaining * binding_ev / (ELECTRON_MASS_KEV * 1e3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spectral::PotentialExpansion;
    use crate::core::transition::fixtures::cobalt_60_parameters;
    use crate::core::transition::{BetaType, DecayType};

    const F: StandardCorrections = StandardCorrections;

    fn positron_parameters() -> TransitionParameters {
        let mut params = cobalt_60_parameters();
        params.beta_type = BetaType::BetaPlus;
        params
    }

    fn inputs() -> ShapeFactorInputs {
        ShapeFactorInputs {
            g_a: 1.2754,
            g_p: 0.0,
            b_ac: 5.0,
            d_ac: 0.0,
            lambda: 0.0,
            isovector: false,
            ns_shape: NuclearShape::Fermi,
            mod_gauss_fit: 0.0,
        }
    }

    #[test]
    fn phase_space_vanishes_at_both_edges() {
        let params = cobalt_60_parameters();
        assert_eq!(F.phase_space(1.0, &params), 0.0);
        assert_eq!(F.phase_space(params.w0, &params), 0.0);
        assert_eq!(F.phase_space(params.w0 + 0.1, &params), 0.0);
        assert!(F.phase_space(0.5 * (1.0 + params.w0), &params) > 0.0);
    }

    #[test]
    fn fermi_function_enhances_electrons_and_suppresses_positrons() {
        let w = 1.3;
        assert!(F.fermi_function(w, &cobalt_60_parameters()) > 1.0);
        assert!(F.fermi_function(w, &positron_parameters()) < 1.0);
    }

    #[test]
    fn fermi_function_reduces_to_the_nonrelativistic_limit_for_hydrogen() {
        let mut params = cobalt_60_parameters();
        params.zf = 1;
        params.r = 1e-3;
        let w: f64 = 1.2;
        let p = (w * w - 1.0).sqrt();
        let eta = ALPHA * w / p;
        let expected = 2.0 * PI * eta / (1.0 - (-2.0 * PI * eta).exp());
        let value = F.fermi_function(w, &params);
        assert!(((value - expected) / expected).abs() < 1e-3);
    }

    #[test]
    fn fermi_function_stays_finite_at_rest() {
        let params = cobalt_60_parameters();
        assert!(F.fermi_function(1.0, &params).is_finite());
        assert!(F.fermi_function(1.0, &positron_parameters()).is_finite());
    }

    #[test]
    fn finite_size_correction_is_close_to_one() {
        let params = cobalt_60_parameters();
        for w in [1.05, 1.3, params.w0] {
            let l0 = F.finite_size(w, &params);
            assert!((l0 - 1.0).abs() < 0.05, "L0({}) = {}", w, l0);
        }
    }

    #[test]
    fn deformation_is_neutral_for_spherical_nuclei() {
        let mut params = cobalt_60_parameters();
        assert_eq!(F.deformation(1.2, &params), 1.0);
        params.daughter_beta2 = 0.3;
        let value = F.deformation(1.2, &params);
        assert!(value.is_finite());
        assert_ne!(value, 1.0);
    }

    #[test]
    fn shape_factor_mixes_fermi_and_gamow_teller_parts() {
        let mut params = cobalt_60_parameters();
        let w = 1.3;
        params.decay_type = DecayType::Fermi;
        let fermi = F.shape_factor(w, &params, &inputs());
        params.decay_type = DecayType::GamowTeller;
        let gamow_teller = F.shape_factor(w, &params, &inputs());
        params.decay_type = DecayType::Mixed;
        params.mixing_ratio = 1.0;
        let mixed = F.shape_factor(w, &params, &inputs());
        assert!((mixed - 0.5 * (fermi + gamow_teller)).abs() < 1e-12);
    }

    #[test]
    fn weak_magnetism_raises_the_electron_slope() {
        let params = cobalt_60_parameters();
        let mut without = inputs();
        without.b_ac = 0.0;
        let with = inputs();
        let w_high = params.w0 - 0.01;
        let slope_with = F.shape_factor(w_high, &params, &with) - F.shape_factor(1.01, &params, &with);
        let slope_without =
            F.shape_factor(w_high, &params, &without) - F.shape_factor(1.01, &params, &without);
        assert!(slope_with > slope_without);
    }

    #[test]
    fn isovector_term_vanishes_at_the_endpoint() {
        let params = cobalt_60_parameters();
        let mut with = inputs();
        with.isovector = true;
        let plain = F.shape_factor(params.w0, &params, &inputs());
        assert!((F.shape_factor(params.w0, &params, &with) - plain).abs() < 1e-15);
    }

    #[test]
    fn relativistic_correction_is_neutral_for_fermi_transitions() {
        let mut params = cobalt_60_parameters();
        params.decay_type = DecayType::Fermi;
        assert_eq!(F.relativistic(1.2, &params), 1.0);
    }

    #[test]
    fn charge_distribution_corrections_are_small() {
        let params = cobalt_60_parameters();
        let fermi = ChargeDistribution {
            shape: NuclearShape::Fermi,
            expansion: PotentialExpansion::modified_gaussian(0.0),
        };
        let gaussian = ChargeDistribution {
            shape: NuclearShape::ModifiedGaussian,
            expansion: PotentialExpansion::modified_gaussian(0.5),
        };
        for distribution in [fermi, gaussian] {
            let u = F.charge_distribution(1.4, &params, &distribution);
            assert!((u - 1.0).abs() < 0.01, "U = {}", u);
        }
    }

    #[test]
    fn identical_potentials_leave_the_spectrum_unchanged() {
        let params = cobalt_60_parameters();
        let distribution = ChargeDistribution {
            shape: NuclearShape::ModifiedGaussian,
            expansion: PotentialExpansion {
                old: PotentialExpansion::uniform_sphere(),
                new: PotentialExpansion::uniform_sphere(),
            },
        };
        assert_eq!(F.charge_distribution(1.4, &params, &distribution), 1.0);
    }

    #[test]
    fn coulomb_and_kinematic_recoil_are_tiny_away_from_rest() {
        let params = cobalt_60_parameters();
        let q = F.coulomb_recoil(1.5, &params);
        let r = F.kinematic_recoil(1.5, &params);
        assert!((q - 1.0).abs() < 1e-3);
        assert!((r - 1.0).abs() < 1e-3);
    }

    #[test]
    fn radiative_corrections_are_percent_level_inside_the_window() {
        let params = cobalt_60_parameters();
        let w = 0.5 * (1.0 + params.w0);
        let electron = F.radiative(w, &params);
        let neutrino = F.neutrino_radiative(params.conjugate(w), &params);
        assert!(electron.is_finite() && (electron - 1.0).abs() < 0.1);
        assert!(neutrino.is_finite() && (neutrino - 1.0).abs() < 0.1);
        assert_eq!(F.radiative(1.0, &params), 1.0);
        assert_eq!(F.radiative(params.w0, &params), 1.0);
    }

    #[test]
    fn screening_suppresses_slow_electrons() {
        let params = cobalt_60_parameters();
        assert!(F.atomic_screening(1.05, &params) < 1.0);
        assert!((F.atomic_screening(1.6, &params) - 1.0).abs() < 0.01);
    }

    #[test]
    fn exchange_with_zero_coefficients_is_neutral() {
        let params = cobalt_60_parameters();
        assert_eq!(F.atomic_exchange(1.2, &params), 1.0);
        assert_eq!(F.atomic_exchange(1.0, &params), 1.0);
    }

    #[test]
    fn exchange_uses_the_fitted_coefficients() {
        let mut params = cobalt_60_parameters();
        params.exchange_coefficients = [0.001, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let w = 1.1;
        assert!((F.atomic_exchange(w, &params) - (1.0 + 0.001 / 0.1)).abs() < 1e-12);
    }

    #[test]
    fn mismatch_lowers_the_spectrum_below_the_endpoint() {
        let params = cobalt_60_parameters();
        assert!(F.atomic_mismatch(1.2, &params) < 1.0);
        assert_eq!(F.atomic_mismatch(params.w0, &params), 1.0);
    }
}

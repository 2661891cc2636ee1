//! Spectral correction functions.
//!
//! Every correction to the allowed beta spectrum is a pure function of an energy argument
//! and the transition parameters. [`SpectralFunctions`] is the seam through which the
//! correction pipeline reaches them; [`StandardCorrections`] provides the leading-order
//! closed forms used by default.

pub mod functions;

pub use functions::StandardCorrections;

use crate::core::transition::TransitionParameters;
use serde::Deserialize;

/// Radial shape assumed for the nuclear charge or weak-current distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NuclearShape {
    #[default]
    #[serde(alias = "Fermi")]
    Fermi,
    #[serde(alias = "Modified_Gaussian")]
    ModifiedGaussian,
}

impl std::fmt::Display for NuclearShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NuclearShape::Fermi => write!(f, "Fermi"),
            NuclearShape::ModifiedGaussian => write!(f, "Modified Gaussian"),
        }
    }
}

/// Resolved coupling constants and matrix-element ratios entering the shape factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFactorInputs {
    pub g_a: f64,
    pub g_p: f64,
    /// Weak magnetism form factor ratio b/Ac.
    pub b_ac: f64,
    /// Induced tensor form factor ratio d/Ac.
    pub d_ac: f64,
    /// Ratio of the M121 and M101 matrix elements.
    pub lambda: f64,
    pub isovector: bool,
    pub ns_shape: NuclearShape,
    pub mod_gauss_fit: f64,
}

/// Coefficients `v_k` of an electrostatic potential `V(r) = -(αZ/R) Σ v_k (r/R)^(2k)`
/// inside the nucleus, for the reference (uniform sphere) and the actual distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialExpansion {
    pub old: Vec<f64>,
    pub new: Vec<f64>,
}

impl PotentialExpansion {
    /// Uniformly charged sphere.
    pub fn uniform_sphere() -> Vec<f64> {
        vec![1.5, -0.5, 0.0]
    }

    /// Expansion of the modified Gaussian distribution with fit parameter `fit`, relative to
    /// the uniform sphere.
    pub fn modified_gaussian(fit: f64) -> Self {
        let sqrt_pi = std::f64::consts::PI.sqrt();
        let ratio = 5.0 * (2.0 + 5.0 * fit) / 2.0 / (2.0 + 3.0 * fit);
        let new = vec![
            (5.0_f64 / 2.0).sqrt() * 4.0 * (1.0 + fit) * (2.0 + 5.0 * fit).sqrt()
                / sqrt_pi
                / (2.0 + 3.0 * fit).powf(1.5),
            -4.0 / 3.0 / (3.0 * fit + 2.0) / sqrt_pi * ratio.powf(1.5),
            (2.0 - 7.0 * fit) / 5.0 / (3.0 * fit + 2.0) / sqrt_pi * ratio.powf(5.0 / 3.0),
        ];
        Self {
            old: Self::uniform_sphere(),
            new,
        }
    }

    /// `new - old` coefficient by coefficient, padding the shorter side with zeros.
    pub fn deltas(&self) -> Vec<f64> {
        let len = self.old.len().max(self.new.len());
        (0..len)
            .map(|k| {
                self.new.get(k).copied().unwrap_or(0.0) - self.old.get(k).copied().unwrap_or(0.0)
            })
            .collect()
    }
}

/// Electrostatic description used by the charge-distribution (U) correction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeDistribution {
    pub shape: NuclearShape,
    pub expansion: PotentialExpansion,
}

/// One pure function per spectral correction kind.
///
/// `w` is the total energy of the lepton in units of the electron rest energy. Every function
/// returns a multiplicative factor. Implementations must be callable from several threads.
pub trait SpectralFunctions: Send + Sync {
    fn phase_space(&self, w: f64, params: &TransitionParameters) -> f64;

    fn fermi_function(&self, w: f64, params: &TransitionParameters) -> f64;

    fn shape_factor(
        &self,
        w: f64,
        params: &TransitionParameters,
        inputs: &ShapeFactorInputs,
    ) -> f64;

    fn relativistic(&self, w: f64, params: &TransitionParameters) -> f64;

    fn deformation(&self, w: f64, params: &TransitionParameters) -> f64;

    fn finite_size(&self, w: f64, params: &TransitionParameters) -> f64;

    fn charge_distribution(
        &self,
        w: f64,
        params: &TransitionParameters,
        distribution: &ChargeDistribution,
    ) -> f64;

    fn coulomb_recoil(&self, w: f64, params: &TransitionParameters) -> f64;

    fn radiative(&self, w: f64, params: &TransitionParameters) -> f64;

    /// Radiative correction to the antineutrino spectrum. `w` is the energy of the electron
    /// sharing the decay, which the pipeline obtains by conjugating the antineutrino energy.
    fn neutrino_radiative(&self, w: f64, params: &TransitionParameters) -> f64;

    fn kinematic_recoil(&self, w: f64, params: &TransitionParameters) -> f64;

    fn atomic_screening(&self, w: f64, params: &TransitionParameters) -> f64;

    fn atomic_exchange(&self, w: f64, params: &TransitionParameters) -> f64;

    fn atomic_mismatch(&self, w: f64, params: &TransitionParameters) -> f64;
}

use crate::core::spectral::{ChargeDistribution, NuclearShape, PotentialExpansion, ShapeFactorInputs};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Potential expansions must be given together: v-old and v-new")]
    IncompletePotentialExpansion,
}

/// Switches for the thirteen spectral corrections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionToggles {
    pub phase_space: bool,
    pub fermi_function: bool,
    pub shape_factor: bool,
    pub relativistic: bool,
    pub deformation: bool,
    pub finite_size: bool,
    pub charge_distribution: bool,
    pub coulomb_recoil: bool,
    pub radiative: bool,
    pub kinematic_recoil: bool,
    pub atomic_screening: bool,
    pub atomic_exchange: bool,
    pub atomic_mismatch: bool,
}

impl CorrectionToggles {
    pub fn all() -> Self {
        Self::uniform(true)
    }

    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            phase_space: enabled,
            fermi_function: enabled,
            shape_factor: enabled,
            relativistic: enabled,
            deformation: enabled,
            finite_size: enabled,
            charge_distribution: enabled,
            coulomb_recoil: enabled,
            radiative: enabled,
            kinematic_recoil: enabled,
            atomic_screening: enabled,
            atomic_exchange: enabled,
            atomic_mismatch: enabled,
        }
    }
}

impl Default for CorrectionToggles {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingConstants {
    pub g_a: f64,
    pub g_p: f64,
    pub g_m: f64,
}

/// Resolved matrix-element ratios of an allowed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllowedMatrixElements {
    /// Weak magnetism, b/Ac.
    pub weak_magnetism: f64,
    /// Induced tensor, d/Ac.
    pub induced_tensor: f64,
    /// M121/M101.
    pub lambda: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedOptions {
    pub ns_shape: NuclearShape,
    pub es_shape: NuclearShape,
    pub mod_gauss_fit: f64,
    pub potential: Option<PotentialExpansion>,
    pub isovector: bool,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            ns_shape: NuclearShape::Fermi,
            es_shape: NuclearShape::Fermi,
            mod_gauss_fit: 0.0,
            potential: None,
            isovector: false,
        }
    }
}

impl AdvancedOptions {
    /// Explicit potential expansions win; otherwise the modified Gaussian expansion is derived
    /// from the fit parameter.
    pub fn charge_distribution(&self) -> ChargeDistribution {
        let expansion = match (&self.potential, self.es_shape) {
            (Some(potential), _) => potential.clone(),
            (None, NuclearShape::ModifiedGaussian) => {
                PotentialExpansion::modified_gaussian(self.mod_gauss_fit)
            }
            (None, NuclearShape::Fermi) => PotentialExpansion {
                old: PotentialExpansion::uniform_sphere(),
                new: PotentialExpansion::uniform_sphere(),
            },
        };
        ChargeDistribution {
            shape: self.es_shape,
            expansion,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub corrections: CorrectionToggles,
    pub couplings: Option<CouplingConstants>,
    pub matrix_elements: Option<AllowedMatrixElements>,
    pub advanced: AdvancedOptions,
}

impl GeneratorConfig {
    /// Combines couplings and matrix elements into the shape factor inputs, if both exist.
    pub fn shape_factor_inputs(&self) -> Option<ShapeFactorInputs> {
        let couplings = self.couplings?;
        let elements = self.matrix_elements?;
        Some(ShapeFactorInputs {
            g_a: couplings.g_a,
            g_p: couplings.g_p,
            b_ac: elements.weak_magnetism,
            d_ac: elements.induced_tensor,
            lambda: elements.lambda,
            isovector: self.advanced.isovector,
            ns_shape: self.advanced.ns_shape,
            mod_gauss_fit: self.advanced.mod_gauss_fit,
        })
    }
}

#[derive(Default)]
pub struct GeneratorConfigBuilder {
    corrections: Option<CorrectionToggles>,
    couplings: Option<CouplingConstants>,
    matrix_elements: Option<AllowedMatrixElements>,
    ns_shape: Option<NuclearShape>,
    es_shape: Option<NuclearShape>,
    mod_gauss_fit: Option<f64>,
    v_old: Option<Vec<f64>>,
    v_new: Option<Vec<f64>>,
    isovector: Option<bool>,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corrections(mut self, toggles: CorrectionToggles) -> Self {
        self.corrections = Some(toggles);
        self
    }
    pub fn couplings(mut self, couplings: CouplingConstants) -> Self {
        self.couplings = Some(couplings);
        self
    }
    pub fn matrix_elements(mut self, elements: AllowedMatrixElements) -> Self {
        self.matrix_elements = Some(elements);
        self
    }
    pub fn ns_shape(mut self, shape: NuclearShape) -> Self {
        self.ns_shape = Some(shape);
        self
    }
    pub fn es_shape(mut self, shape: NuclearShape) -> Self {
        self.es_shape = Some(shape);
        self
    }
    pub fn mod_gauss_fit(mut self, fit: f64) -> Self {
        self.mod_gauss_fit = Some(fit);
        self
    }
    pub fn v_old(mut self, coefficients: Vec<f64>) -> Self {
        self.v_old = Some(coefficients);
        self
    }
    pub fn v_new(mut self, coefficients: Vec<f64>) -> Self {
        self.v_new = Some(coefficients);
        self
    }
    pub fn isovector(mut self, enabled: bool) -> Self {
        self.isovector = Some(enabled);
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        let potential = match (self.v_old, self.v_new) {
            (Some(old), Some(new)) => Some(PotentialExpansion { old, new }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompletePotentialExpansion),
        };
        let defaults = AdvancedOptions::default();
        Ok(GeneratorConfig {
            corrections: self.corrections.unwrap_or_default(),
            couplings: self.couplings,
            matrix_elements: self.matrix_elements,
            advanced: AdvancedOptions {
                ns_shape: self.ns_shape.unwrap_or(defaults.ns_shape),
                es_shape: self.es_shape.unwrap_or(defaults.es_shape),
                mod_gauss_fit: self.mod_gauss_fit.unwrap_or(defaults.mod_gauss_fit),
                potential,
                isovector: self.isovector.unwrap_or(defaults.isovector),
            },
        })
    }
}

/// Grid spacing of a spectrum window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepSpec {
    /// Fixed step in keV.
    Size(f64),
    /// Number of intervals between the window bounds.
    Count(usize),
}

/// Kinetic energy window in keV. An `end_kev` of zero stands for the endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumWindow {
    pub begin_kev: f64,
    pub end_kev: f64,
    pub step: StepSpec,
}

impl SpectrumWindow {
    pub fn new(begin_kev: f64, end_kev: f64, step: StepSpec) -> Self {
        Self {
            begin_kev,
            end_kev,
            step,
        }
    }

    /// The whole spectrum with the given step.
    pub fn full(step: StepSpec) -> Self {
        Self::new(0.0, 0.0, step)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn physical_config() -> GeneratorConfig {
        let built = GeneratorConfigBuilder::new()
            .couplings(CouplingConstants {
                g_a: 1.2754,
                g_p: 0.0,
                g_m: 4.706,
            })
            .matrix_elements(AllowedMatrixElements {
                weak_magnetism: 5.0,
                induced_tensor: 0.0,
                lambda: 0.0,
            })
            .build();
        match built {
            Ok(config) => config,
            Err(e) => panic!("fixture must build: {e}"),
        }
    }

    pub(crate) fn bare_config() -> GeneratorConfig {
        GeneratorConfig {
            corrections: CorrectionToggles::none(),
            couplings: None,
            matrix_elements: None,
            advanced: AdvancedOptions::default(),
        }
    }
}

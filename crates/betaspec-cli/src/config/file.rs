use crate::error::{CliError, Result};
use betaspec::core::spectral::NuclearShape;
use betaspec::engine::config::{AllowedMatrixElements, CorrectionToggles, CouplingConstants};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSpectrumConfig {
    pub begin: Option<f64>,
    pub end: Option<f64>,
    pub step_size: Option<f64>,
    pub steps: Option<usize>,
    pub neutrino: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileCorrectionsConfig {
    pub phase_space: Option<bool>,
    pub fermi_function: Option<bool>,
    pub shape_factor: Option<bool>,
    pub relativistic: Option<bool>,
    pub deformation: Option<bool>,
    pub finite_size: Option<bool>,
    pub charge_distribution: Option<bool>,
    pub coulomb_recoil: Option<bool>,
    pub radiative: Option<bool>,
    pub kinematic_recoil: Option<bool>,
    pub atomic_screening: Option<bool>,
    pub atomic_exchange: Option<bool>,
    pub atomic_mismatch: Option<bool>,
    pub isovector: Option<bool>,
}

impl FileCorrectionsConfig {
    /// Mutable slot of the toggle named `key`, if it is one.
    pub fn toggle_mut(&mut self, key: &str) -> Option<&mut Option<bool>> {
        let slot = match key {
            "phase-space" => &mut self.phase_space,
            "fermi-function" => &mut self.fermi_function,
            "shape-factor" => &mut self.shape_factor,
            "relativistic" => &mut self.relativistic,
            "deformation" => &mut self.deformation,
            "finite-size" => &mut self.finite_size,
            "charge-distribution" => &mut self.charge_distribution,
            "coulomb-recoil" => &mut self.coulomb_recoil,
            "radiative" => &mut self.radiative,
            "kinematic-recoil" => &mut self.kinematic_recoil,
            "atomic-screening" => &mut self.atomic_screening,
            "atomic-exchange" => &mut self.atomic_exchange,
            "atomic-mismatch" => &mut self.atomic_mismatch,
            "isovector" => &mut self.isovector,
            _ => return None,
        };
        Some(slot)
    }

    /// Unset toggles fall back to enabled.
    pub fn resolve(&self) -> CorrectionToggles {
        let on = |flag: Option<bool>| flag.unwrap_or(true);
        CorrectionToggles {
            phase_space: on(self.phase_space),
            fermi_function: on(self.fermi_function),
            shape_factor: on(self.shape_factor),
            relativistic: on(self.relativistic),
            deformation: on(self.deformation),
            finite_size: on(self.finite_size),
            charge_distribution: on(self.charge_distribution),
            coulomb_recoil: on(self.coulomb_recoil),
            radiative: on(self.radiative),
            kinematic_recoil: on(self.kinematic_recoil),
            atomic_screening: on(self.atomic_screening),
            atomic_exchange: on(self.atomic_exchange),
            atomic_mismatch: on(self.atomic_mismatch),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileCouplingsConfig {
    pub g_a: Option<f64>,
    pub g_p: Option<f64>,
    pub g_m: Option<f64>,
}

impl FileCouplingsConfig {
    pub fn resolve(&self) -> Result<CouplingConstants> {
        Ok(CouplingConstants {
            g_a: require(self.g_a, "couplings", "g-a")?,
            g_p: require(self.g_p, "couplings", "g-p")?,
            g_m: require(self.g_m, "couplings", "g-m")?,
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileMatrixElementsConfig {
    pub weak_magnetism: Option<f64>,
    pub induced_tensor: Option<f64>,
    pub lambda: Option<f64>,
}

impl FileMatrixElementsConfig {
    pub fn resolve(&self) -> Result<AllowedMatrixElements> {
        Ok(AllowedMatrixElements {
            weak_magnetism: require(self.weak_magnetism, "matrix-elements", "weak-magnetism")?,
            induced_tensor: require(self.induced_tensor, "matrix-elements", "induced-tensor")?,
            lambda: require(self.lambda, "matrix-elements", "lambda")?,
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAdvancedConfig {
    pub ns_shape: Option<NuclearShape>,
    pub es_shape: Option<NuclearShape>,
    pub mod_gauss_fit: Option<f64>,
    pub v_old: Option<Vec<f64>>,
    pub v_new: Option<Vec<f64>>,
    pub exchange_table: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub spectrum: Option<FileSpectrumConfig>,
    pub corrections: Option<FileCorrectionsConfig>,
    pub couplings: Option<FileCouplingsConfig>,
    pub matrix_elements: Option<FileMatrixElementsConfig>,
    pub advanced: Option<FileAdvancedConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

fn require(value: Option<f64>, section: &str, key: &str) -> Result<f64> {
    value.ok_or_else(|| CliError::Config(format!("`{}` requires `{}`", section, key)))
}

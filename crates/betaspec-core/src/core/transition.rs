use crate::core::constants::{ELECTRON_MASS_KEV, fm_to_natural, w_to_kev};
use crate::core::io::exchange::{EXCHANGE_PARAMETERS, ExchangeTable};
use crate::core::tables::{EXPANSION_ROWS, L0_ELECTRON, L0_POSITRON, expansion_coefficients};
use crate::core::utils::elements::nuclide_label;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetaType {
    #[serde(alias = "B-")]
    BetaMinus,
    #[serde(alias = "B+")]
    BetaPlus,
}

impl BetaType {
    /// `+1` for electron emission, `-1` for positron emission.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            BetaType::BetaMinus => 1.0,
            BetaType::BetaPlus => -1.0,
        }
    }

    fn charge_change(self) -> i64 {
        match self {
            BetaType::BetaMinus => 1,
            BetaType::BetaPlus => -1,
        }
    }
}

impl std::fmt::Display for BetaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetaType::BetaMinus => write!(f, "B-"),
            BetaType::BetaPlus => write!(f, "B+"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecayType {
    Fermi,
    GamowTeller,
    Mixed,
}

impl std::fmt::Display for DecayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecayType::Fermi => write!(f, "Fermi"),
            DecayType::GamowTeller => write!(f, "Gamow-Teller"),
            DecayType::Mixed => write!(f, "Mixed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Nucleus {
    pub z: u32,
    pub a: u32,
    /// Twice the nuclear spin, signed with the parity.
    #[serde(default)]
    pub spin_parity: Option<i32>,
    /// Excitation energy in keV.
    #[serde(default)]
    pub excitation_energy: f64,
    /// Root-mean-square charge radius in fm.
    #[serde(default)]
    pub radius: Option<f64>,
    /// Quadrupole deformation.
    #[serde(default)]
    pub beta2: f64,
}

impl Nucleus {
    pub fn new(z: u32, a: u32) -> Self {
        Self {
            z,
            a,
            spin_parity: None,
            excitation_energy: 0.0,
            radius: None,
            beta2: 0.0,
        }
    }

    /// Root-mean-square charge radius in fm, falling back to the empirical systematics
    /// `0.836 A^(1/3) + 0.570` fm (or a uniform sphere of radius `1.2 A^(1/3)` fm for light
    /// nuclei) when no measured value is given.
    pub fn rms_radius_fm(&self) -> f64 {
        self.radius.unwrap_or_else(|| {
            let cube_root = f64::from(self.a).cbrt();
            if self.a < 10 {
                1.2 * cube_root * (3.0_f64 / 5.0).sqrt()
            } else {
                0.836 * cube_root + 0.570
            }
        })
    }

    pub fn label(&self) -> String {
        nuclide_label(self.z, self.a)
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition: {reason}")]
    InvalidTransition { reason: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl TransitionError {
    fn invalid(reason: impl Into<String>) -> Self {
        TransitionError::InvalidTransition {
            reason: reason.into(),
        }
    }
}

/// Parsed description of a single beta transition, energies in keV.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOptions {
    pub beta_type: BetaType,
    pub decay_type: DecayType,
    pub mixing_ratio: f64,
    pub q_value: f64,
    pub atomic_energy_deficit: f64,
    /// Partial half-life in seconds.
    pub partial_halflife: Option<f64>,
    /// Externally determined log ft value, for comparison only.
    pub log_ft: Option<f64>,
    pub mother: Nucleus,
    pub daughter: Nucleus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TransitionSection {
    process: BetaType,
    #[serde(rename = "type")]
    decay_type: DecayType,
    #[serde(default)]
    mixing_ratio: f64,
    q_value: f64,
    #[serde(default)]
    atomic_energy_deficit: f64,
    #[serde(default)]
    partial_halflife: Option<f64>,
    #[serde(default)]
    log_ft: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransitionFile {
    transition: TransitionSection,
    mother: Nucleus,
    daughter: Nucleus,
}

impl From<TransitionFile> for TransitionOptions {
    fn from(file: TransitionFile) -> Self {
        let t = file.transition;
        Self {
            beta_type: t.process,
            decay_type: t.decay_type,
            mixing_ratio: t.mixing_ratio,
            q_value: t.q_value,
            atomic_energy_deficit: t.atomic_energy_deficit,
            partial_halflife: t.partial_halflife,
            log_ft: t.log_ft,
            mother: file.mother,
            daughter: file.daughter,
        }
    }
}

impl TransitionOptions {
    pub fn load(path: &Path) -> Result<Self, TransitionError> {
        let content = std::fs::read_to_string(path).map_err(|e| TransitionError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: TransitionFile = toml::from_str(&content).map_err(|e| TransitionError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(file.into())
    }

    /// Rejects transitions that cannot describe a physical beta decay.
    pub fn sanity_check(&self) -> Result<(), TransitionError> {
        for (role, nucleus) in [("mother", &self.mother), ("daughter", &self.daughter)] {
            if nucleus.z < 1 {
                return Err(TransitionError::invalid(format!(
                    "{} nucleus must have Z >= 1",
                    role
                )));
            }
            if nucleus.a < nucleus.z {
                return Err(TransitionError::invalid(format!(
                    "{} nucleus has A = {} smaller than Z = {}",
                    role, nucleus.a, nucleus.z
                )));
            }
            if !nucleus.excitation_energy.is_finite() || nucleus.excitation_energy < 0.0 {
                return Err(TransitionError::invalid(format!(
                    "{} excitation energy must be finite and non-negative, got {}",
                    role, nucleus.excitation_energy
                )));
            }
            let radius = nucleus.rms_radius_fm();
            if !radius.is_finite() || radius <= 0.0 {
                return Err(TransitionError::invalid(format!(
                    "{} radius must be finite and positive, got {}",
                    role, radius
                )));
            }
            if !nucleus.beta2.is_finite() {
                return Err(TransitionError::invalid(format!(
                    "{} deformation must be finite",
                    role
                )));
            }
        }

        if self.mother.a != self.daughter.a {
            return Err(TransitionError::invalid(format!(
                "mass number changes from {} to {}",
                self.mother.a, self.daughter.a
            )));
        }
        let expected_zf = i64::from(self.mother.z) + self.beta_type.charge_change();
        if i64::from(self.daughter.z) != expected_zf {
            return Err(TransitionError::invalid(format!(
                "{} decay of Z = {} must populate Z = {}, found Z = {}",
                self.beta_type, self.mother.z, expected_zf, self.daughter.z
            )));
        }
        if !self.q_value.is_finite() || self.q_value <= 0.0 {
            return Err(TransitionError::invalid(format!(
                "Q value must be positive, got {} keV",
                self.q_value
            )));
        }
        if !self.atomic_energy_deficit.is_finite() || self.atomic_energy_deficit < 0.0 {
            return Err(TransitionError::invalid(format!(
                "atomic energy deficit must be finite and non-negative, got {} keV",
                self.atomic_energy_deficit
            )));
        }
        if !self.mixing_ratio.is_finite() {
            return Err(TransitionError::invalid("mixing ratio must be finite"));
        }
        if let Some(halflife) = self.partial_halflife {
            if !(halflife > 0.0) || !halflife.is_finite() {
                return Err(TransitionError::invalid(format!(
                    "partial half-life must be positive, got {} s",
                    halflife
                )));
            }
        }
        Ok(())
    }

    /// Dimensionless endpoint energy of the transition.
    pub fn endpoint_w(&self) -> f64 {
        let released = self.q_value - self.atomic_energy_deficit + self.mother.excitation_energy
            - self.daughter.excitation_energy;
        match self.beta_type {
            BetaType::BetaMinus => released / ELECTRON_MASS_KEV + 1.0,
            BetaType::BetaPlus => released / ELECTRON_MASS_KEV - 1.0,
        }
    }

    pub fn label(&self) -> String {
        format!("{} -> {}", self.mother.label(), self.daughter.label())
    }
}

/// Quantities derived once per transition and shared by every correction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionParameters {
    pub zi: u32,
    pub zf: u32,
    pub a: u32,
    /// Radius of the equivalent uniformly charged sphere, in natural units.
    pub r: f64,
    pub w0: f64,
    pub beta_type: BetaType,
    pub decay_type: DecayType,
    pub mixing_ratio: f64,
    /// Atomic energy deficit in keV.
    pub atomic_energy_deficit: f64,
    pub daughter_beta2: f64,
    pub exchange_coefficients: [f64; EXCHANGE_PARAMETERS],
    pub a_pos: [f64; EXPANSION_ROWS],
    pub a_neg: [f64; EXPANSION_ROWS],
}

impl TransitionParameters {
    /// Runs the sanity check and derives the transition parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] when the options fail the sanity check
    /// or the endpoint energy does not exceed the electron rest energy.
    pub fn initialize(
        options: &TransitionOptions,
        exchange: Option<&ExchangeTable>,
    ) -> Result<Self, TransitionError> {
        options.sanity_check()?;

        let w0 = options.endpoint_w();
        if !(w0 > 1.0) {
            return Err(TransitionError::invalid(format!(
                "endpoint W0 = {:.6} does not exceed the electron rest energy",
                w0
            )));
        }

        let zf = options.daughter.z;
        // sqrt(5/3) turns the rms radius into the radius of a uniformly charged sphere
        let r = fm_to_natural(options.daughter.rms_radius_fm()) * (5.0_f64 / 3.0).sqrt();
        let exchange_coefficients = exchange
            .and_then(|table| table.get(options.mother.z))
            .copied()
            .unwrap_or([0.0; EXCHANGE_PARAMETERS]);

        let params = Self {
            zi: options.mother.z,
            zf,
            a: options.mother.a,
            r,
            w0,
            beta_type: options.beta_type,
            decay_type: options.decay_type,
            mixing_ratio: options.mixing_ratio,
            atomic_energy_deficit: options.atomic_energy_deficit,
            daughter_beta2: options.daughter.beta2,
            exchange_coefficients,
            a_pos: expansion_coefficients(&L0_POSITRON, zf),
            a_neg: expansion_coefficients(&L0_ELECTRON, zf),
        };
        debug!(
            w0 = params.w0,
            r = params.r,
            endpoint_kev = params.endpoint_kev(),
            "Initialized transition parameters for {}.",
            options.label()
        );
        Ok(params)
    }

    /// Antineutrino energy variable sharing the release energy with an electron at `w`.
    #[inline]
    pub fn conjugate(&self, w: f64) -> f64 {
        self.w0 - w + 1.0
    }

    pub fn endpoint_kev(&self) -> f64 {
        w_to_kev(self.w0)
    }

    /// L0 expansion coefficients for the emitted lepton's charge.
    pub fn expansion(&self) -> &[f64; EXPANSION_ROWS] {
        match self.beta_type {
            BetaType::BetaMinus => &self.a_neg,
            BetaType::BetaPlus => &self.a_pos,
        }
    }

    /// Relative weights of the vector (Fermi) and axial (Gamow-Teller) parts of the transition.
    pub fn vector_axial_weights(&self) -> (f64, f64) {
        match self.decay_type {
            DecayType::Fermi => (1.0, 0.0),
            DecayType::GamowTeller => (0.0, 1.0),
            DecayType::Mixed => {
                let rho2 = self.mixing_ratio * self.mixing_ratio;
                (1.0 / (1.0 + rho2), rho2 / (1.0 + rho2))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::cobalt_60;
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn endpoint_for_beta_minus_adds_the_rest_mass() {
        let options = cobalt_60();
        let params = TransitionParameters::initialize(&options, None).unwrap();
        let expected = (2823.07 - 2505.753) / ELECTRON_MASS_KEV + 1.0;
        assert!((params.w0 - expected).abs() < 1e-12);
        assert!((params.endpoint_kev() - (2823.07 - 2505.753)).abs() < 1e-9);
    }

    #[test]
    fn endpoint_for_beta_plus_subtracts_the_rest_mass() {
        let options = TransitionOptions {
            beta_type: BetaType::BetaPlus,
            decay_type: DecayType::Mixed,
            mixing_ratio: 1.0,
            q_value: 2220.47,
            atomic_energy_deficit: 0.0,
            partial_halflife: None,
            log_ft: None,
            mother: Nucleus::new(9, 18),
            daughter: Nucleus::new(8, 18),
        };
        let params = TransitionParameters::initialize(&options, None).unwrap();
        assert!((params.w0 - (2220.47 / ELECTRON_MASS_KEV - 1.0)).abs() < 1e-12);
        assert_eq!(params.expansion(), &params.a_pos);
    }

    #[test]
    fn radius_is_scaled_to_the_equivalent_uniform_sphere() {
        let params = TransitionParameters::initialize(&cobalt_60(), None).unwrap();
        let expected = 3.8118 / 386.159_267_96 * (5.0_f64 / 3.0).sqrt();
        assert!((params.r - expected).abs() < 1e-15);
    }

    #[test]
    fn expansion_coefficients_use_the_daughter_charge() {
        let params = TransitionParameters::initialize(&cobalt_60(), None).unwrap();
        assert_eq!(params.a_neg, expansion_coefficients(&L0_ELECTRON, 28));
        assert_eq!(params.a_pos, expansion_coefficients(&L0_POSITRON, 28));
    }

    #[test]
    fn wrong_daughter_charge_is_rejected() {
        let mut options = cobalt_60();
        options.daughter.z = 26;
        let result = TransitionParameters::initialize(&options, None);
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn endpoint_below_rest_mass_is_rejected() {
        let mut options = cobalt_60();
        options.beta_type = BetaType::BetaPlus;
        options.daughter.z = 26;
        options.daughter.excitation_energy = 0.0;
        options.q_value = 800.0;
        let result = TransitionParameters::initialize(&options, None);
        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn non_positive_halflife_is_rejected() {
        let mut options = cobalt_60();
        options.partial_halflife = Some(0.0);
        assert!(options.sanity_check().is_err());
    }

    #[test]
    fn conjugate_is_an_involution() {
        let params = TransitionParameters::initialize(&cobalt_60(), None).unwrap();
        for w in [1.0, 1.1, 1.3, params.w0] {
            assert!((params.conjugate(params.conjugate(w)) - w).abs() < 1e-12);
        }
    }

    #[test]
    fn mixed_weights_follow_the_mixing_ratio() {
        let mut params = TransitionParameters::initialize(&cobalt_60(), None).unwrap();
        params.decay_type = DecayType::Mixed;
        params.mixing_ratio = 2.0;
        let (v, a) = params.vector_axial_weights();
        assert!((v - 0.2).abs() < 1e-12);
        assert!((a - 0.8).abs() < 1e-12);
    }

    #[test]
    fn empirical_radius_is_used_when_none_is_given() {
        let nucleus = Nucleus::new(28, 64);
        assert!((nucleus.rms_radius_fm() - (0.836 * 4.0 + 0.570)).abs() < 1e-12);
    }

    #[test]
    fn load_parses_a_transition_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transition.toml");
        fs::write(
            &path,
            r#"
            [transition]
            process = "beta-minus"
            type = "gamow-teller"
            q-value = 2823.07
            partial-halflife = 1.6634e8

            [mother]
            z = 27
            a = 60
            spin-parity = 10

            [daughter]
            z = 28
            a = 60
            excitation-energy = 2505.753
            radius = 3.8118
            "#,
        )
        .unwrap();

        let options = TransitionOptions::load(&path).unwrap();
        assert_eq!(options.beta_type, BetaType::BetaMinus);
        assert_eq!(options.decay_type, DecayType::GamowTeller);
        assert_eq!(options.daughter.radius, Some(3.8118));
        assert_eq!(options.mixing_ratio, 0.0);
        assert_eq!(options.label(), "60Co -> 60Ni");
    }

    #[test]
    fn load_accepts_short_process_aliases() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transition.toml");
        fs::write(
            &path,
            r#"
            [transition]
            process = "B+"
            type = "fermi"
            q-value = 5000.0
            [mother]
            z = 8
            a = 14
            [daughter]
            z = 7
            a = 14
            "#,
        )
        .unwrap();
        let options = TransitionOptions::load(&path).unwrap();
        assert_eq!(options.beta_type, BetaType::BetaPlus);
    }

    #[test]
    fn bundled_demo_transitions_match_the_fixtures() {
        let demos = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let cobalt = TransitionOptions::load(&demos.join("transition-60co.toml")).unwrap();
        assert_eq!(cobalt, super::fixtures::cobalt_60());
        let oxygen = TransitionOptions::load(&demos.join("transition-14o.toml")).unwrap();
        assert_eq!(oxygen.endpoint_w(), super::fixtures::oxygen_14().endpoint_w());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = TransitionOptions::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(TransitionError::Io { .. })));
    }

    #[test]
    fn load_fails_for_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transition.toml");
        fs::write(
            &path,
            "[transition]\nprocess = \"B-\"\ntype = \"fermi\"\nq-value = 1.0\nbogus = 1\n[mother]\nz = 1\na = 3\n[daughter]\nz = 2\na = 3\n",
        )
        .unwrap();
        let result = TransitionOptions::load(&path);
        assert!(matches!(result, Err(TransitionError::Toml { .. })));
    }
}

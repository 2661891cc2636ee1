use super::config::{CorrectionToggles, GeneratorConfig};
use super::error::EngineError;
use super::trace::{TraceError, TraceRecord, TraceSink};
use crate::core::constants::w_to_kev;
use crate::core::spectral::{
    ChargeDistribution, ShapeFactorInputs, SpectralFunctions, StandardCorrections,
};
use crate::core::transition::{BetaType, TransitionError, TransitionParameters};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correction {
    PhaseSpace,
    FermiFunction,
    ShapeFactor,
    Relativistic,
    Deformation,
    FiniteSize,
    ChargeDistribution,
    CoulombRecoil,
    Radiative,
    KinematicRecoil,
    AtomicScreening,
    AtomicExchange,
    AtomicMismatch,
}

impl Correction {
    /// Order in which the corrections multiply into a weight.
    pub const CANONICAL_ORDER: [Correction; 13] = [
        Correction::PhaseSpace,
        Correction::FermiFunction,
        Correction::ShapeFactor,
        Correction::Relativistic,
        Correction::Deformation,
        Correction::FiniteSize,
        Correction::ChargeDistribution,
        Correction::CoulombRecoil,
        Correction::Radiative,
        Correction::KinematicRecoil,
        Correction::AtomicScreening,
        Correction::AtomicExchange,
        Correction::AtomicMismatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Correction::PhaseSpace => "phase space",
            Correction::FermiFunction => "Fermi function",
            Correction::ShapeFactor => "shape factor",
            Correction::Relativistic => "relativistic",
            Correction::Deformation => "deformation",
            Correction::FiniteSize => "finite size (L0)",
            Correction::ChargeDistribution => "charge distribution (U)",
            Correction::CoulombRecoil => "Coulomb recoil (Q)",
            Correction::Radiative => "radiative",
            Correction::KinematicRecoil => "kinematic recoil",
            Correction::AtomicScreening => "atomic screening",
            Correction::AtomicExchange => "atomic exchange",
            Correction::AtomicMismatch => "atomic mismatch",
        }
    }

    fn is_enabled(self, toggles: &CorrectionToggles) -> bool {
        match self {
            Correction::PhaseSpace => toggles.phase_space,
            Correction::FermiFunction => toggles.fermi_function,
            Correction::ShapeFactor => toggles.shape_factor,
            Correction::Relativistic => toggles.relativistic,
            Correction::Deformation => toggles.deformation,
            Correction::FiniteSize => toggles.finite_size,
            Correction::ChargeDistribution => toggles.charge_distribution,
            Correction::CoulombRecoil => toggles.coulomb_recoil,
            Correction::Radiative => toggles.radiative,
            Correction::KinematicRecoil => toggles.kinematic_recoil,
            Correction::AtomicScreening => toggles.atomic_screening,
            Correction::AtomicExchange => toggles.atomic_exchange,
            Correction::AtomicMismatch => toggles.atomic_mismatch,
        }
    }

    /// Transition-level conditions under which an enabled correction still does not apply.
    fn applies_to(self, params: &TransitionParameters) -> bool {
        match self {
            Correction::AtomicExchange => params.beta_type == BetaType::BetaMinus,
            Correction::AtomicMismatch => params.atomic_energy_deficit == 0.0,
            _ => true,
        }
    }
}

impl std::fmt::Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Electron,
    Neutrino,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    pub electron: f64,
    pub neutrino: f64,
    /// At least one weight was negative or NaN and has been set to zero.
    pub clamped: bool,
}

/// Maps an electron energy `W` to the electron and antineutrino spectral weights by composing
/// every active correction in canonical order.
#[derive(Debug, Clone)]
pub struct CorrectionPipeline<F: SpectralFunctions = StandardCorrections> {
    params: TransitionParameters,
    functions: F,
    stages: Vec<Correction>,
    shape_inputs: Option<ShapeFactorInputs>,
    distribution: ChargeDistribution,
}

impl CorrectionPipeline<StandardCorrections> {
    pub fn new(params: TransitionParameters, config: &GeneratorConfig) -> Result<Self, EngineError> {
        Self::with_functions(params, config, StandardCorrections)
    }
}

impl<F: SpectralFunctions> CorrectionPipeline<F> {
    /// Validates the inputs and fixes the active stage list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingInput`] when the shape factor is enabled without coupling
    /// constants or matrix elements, [`EngineError::NonFiniteInput`] for any non-finite input
    /// scalar and [`EngineError::InvalidTransition`] when `W0 <= 1`.
    pub fn with_functions(
        params: TransitionParameters,
        config: &GeneratorConfig,
        functions: F,
    ) -> Result<Self, EngineError> {
        validate_inputs(&params, config)?;

        let toggles = &config.corrections;
        if toggles.shape_factor {
            if config.couplings.is_none() {
                return Err(EngineError::MissingInput {
                    correction: Correction::ShapeFactor.name(),
                    input: "coupling constants",
                });
            }
            if config.matrix_elements.is_none() {
                return Err(EngineError::MissingInput {
                    correction: Correction::ShapeFactor.name(),
                    input: "matrix elements",
                });
            }
        }

        let stages: Vec<Correction> = Correction::CANONICAL_ORDER
            .into_iter()
            .filter(|c| c.is_enabled(toggles) && c.applies_to(&params))
            .collect();
        debug!(
            stages = ?stages.iter().map(|c| c.name()).collect::<Vec<_>>(),
            "Assembled correction pipeline."
        );

        Ok(Self {
            params,
            functions,
            stages,
            shape_inputs: config.shape_factor_inputs(),
            distribution: config.advanced.charge_distribution(),
        })
    }

    pub fn parameters(&self) -> &TransitionParameters {
        &self.params
    }

    /// Corrections applied by [`evaluate`](Self::evaluate), in canonical order.
    pub fn active_corrections(&self) -> &[Correction] {
        &self.stages
    }

    /// Antineutrino energy conjugate to `w`; applying it twice returns `w`.
    #[inline]
    pub fn conjugate(&self, w: f64) -> f64 {
        self.params.conjugate(w)
    }

    /// Single correction factor at energy `x` for one channel.
    pub fn factor(&self, correction: Correction, x: f64, channel: Channel) -> f64 {
        let f = &self.functions;
        let p = &self.params;
        match correction {
            Correction::PhaseSpace => f.phase_space(x, p),
            Correction::FermiFunction => f.fermi_function(x, p),
            Correction::ShapeFactor => match &self.shape_inputs {
                Some(inputs) => f.shape_factor(x, p, inputs),
                None => 1.0,
            },
            Correction::Relativistic => f.relativistic(x, p),
            Correction::Deformation => f.deformation(x, p),
            Correction::FiniteSize => f.finite_size(x, p),
            Correction::ChargeDistribution => f.charge_distribution(x, p, &self.distribution),
            Correction::CoulombRecoil => f.coulomb_recoil(x, p),
            Correction::Radiative => match channel {
                Channel::Electron => f.radiative(x, p),
                Channel::Neutrino => f.neutrino_radiative(x, p),
            },
            Correction::KinematicRecoil => f.kinematic_recoil(x, p),
            Correction::AtomicScreening => f.atomic_screening(x, p),
            Correction::AtomicExchange => match channel {
                Channel::Electron => f.atomic_exchange(x, p),
                Channel::Neutrino => 1.0,
            },
            Correction::AtomicMismatch => f.atomic_mismatch(x, p),
        }
    }

    /// Electron weight at `w` and antineutrino weight at the conjugate energy, both clamped
    /// to be non-negative.
    pub fn evaluate(&self, w: f64) -> ChannelWeights {
        let wv = self.conjugate(w);
        let mut electron = 1.0;
        let mut neutrino = 1.0;
        for &correction in &self.stages {
            electron *= self.factor(correction, w, Channel::Electron);
            neutrino *= self.factor(correction, wv, Channel::Neutrino);
        }

        let (electron, electron_clamped) = clamp_weight(electron);
        let (neutrino, neutrino_clamped) = clamp_weight(neutrino);
        let clamped = electron_clamped || neutrino_clamped;
        if clamped {
            trace!(w, "Clamped a negative or undefined spectral weight to zero.");
        }
        ChannelWeights {
            electron,
            neutrino,
            clamped,
        }
    }

    /// [`evaluate`](Self::evaluate), appending the result to `sink`.
    pub fn evaluate_traced(
        &self,
        w: f64,
        sink: &mut dyn TraceSink,
    ) -> Result<ChannelWeights, TraceError> {
        let weights = self.evaluate(w);
        sink.append(&trace_record(w, &weights))?;
        Ok(weights)
    }
}

pub(crate) fn trace_record(w: f64, weights: &ChannelWeights) -> TraceRecord {
    TraceRecord {
        w,
        kinetic_kev: w_to_kev(w),
        electron: weights.electron,
        neutrino: weights.neutrino,
        clamped: weights.clamped,
    }
}

fn clamp_weight(value: f64) -> (f64, bool) {
    if value.is_nan() || value < 0.0 {
        (0.0, true)
    } else {
        (value, false)
    }
}

fn ensure_finite(name: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::NonFiniteInput { name, value })
    }
}

fn validate_inputs(params: &TransitionParameters, config: &GeneratorConfig) -> Result<(), EngineError> {
    ensure_finite("W0", params.w0)?;
    ensure_finite("nuclear radius", params.r)?;
    ensure_finite("mixing ratio", params.mixing_ratio)?;
    ensure_finite("atomic energy deficit", params.atomic_energy_deficit)?;
    ensure_finite("daughter beta2", params.daughter_beta2)?;
    for &c in &params.exchange_coefficients {
        ensure_finite("exchange coefficient", c)?;
    }
    if !(params.w0 > 1.0) {
        return Err(TransitionError::InvalidTransition {
            reason: format!("endpoint W0 = {} must exceed 1", params.w0),
        }
        .into());
    }

    if let Some(couplings) = &config.couplings {
        ensure_finite("gA", couplings.g_a)?;
        ensure_finite("gP", couplings.g_p)?;
        ensure_finite("gM", couplings.g_m)?;
    }
    if let Some(elements) = &config.matrix_elements {
        ensure_finite("weak magnetism b/Ac", elements.weak_magnetism)?;
        ensure_finite("induced tensor d/Ac", elements.induced_tensor)?;
        ensure_finite("lambda", elements.lambda)?;
    }
    ensure_finite("modified Gaussian fit", config.advanced.mod_gauss_fit)?;
    if let Some(potential) = &config.advanced.potential {
        for &v in potential.old.iter().chain(potential.new.iter()) {
            ensure_finite("potential expansion coefficient", v)?;
        }
    }
    Ok(())
}

use crate::core::io::exchange::ExchangeTable;
use crate::core::transition::{TransitionOptions, TransitionParameters};
use crate::engine::config::{GeneratorConfig, SpectrumWindow};
use crate::engine::error::EngineError;
use crate::engine::generator::SpectrumGenerator;
use crate::engine::observables;
use crate::engine::pipeline::Correction;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spectrum::Spectrum;
use crate::engine::trace::TraceSink;
use tracing::{info, instrument, warn};

/// Observables integrated over a generated spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    /// log10(f·t½); log10(f) when no partial half-life was given.
    pub log_ft: f64,
    pub halflife_given: bool,
    /// Mean total electron energy in units of the electron rest energy.
    pub mean_energy: f64,
    pub mean_kinetic_energy_kev: f64,
    /// `None` when the antineutrino weights integrate to zero.
    pub mean_neutrino_energy: Option<f64>,
    /// Calculated over external ft, when both a half-life and an external log ft are known.
    pub ft_ratio: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub label: String,
    pub parameters: TransitionParameters,
    pub active_corrections: Vec<Correction>,
    pub spectrum: Spectrum,
    /// `None` when the spectrum has fewer than two points.
    pub observables: Option<Observables>,
}

#[instrument(skip_all, name = "generation_workflow")]
pub fn run(
    options: &TransitionOptions,
    config: &GeneratorConfig,
    window: &SpectrumWindow,
    exchange: Option<&ExchangeTable>,
    trace: &mut dyn TraceSink,
    reporter: &ProgressReporter,
) -> Result<GenerationResult, EngineError> {
    // === Phase 1: Transition parameters ===
    reporter.report(Progress::PhaseStart {
        name: "Initialization",
    });
    let label = options.label();
    info!(transition = %label, "Initializing transition parameters.");
    let parameters = TransitionParameters::initialize(options, exchange)?;
    if exchange.is_some() && parameters.exchange_coefficients.iter().all(|&c| c == 0.0) {
        warn!(
            z = options.mother.z,
            "No exchange coefficients tabulated for the mother nucleus; the exchange correction is unity."
        );
    }
    let mut generator = SpectrumGenerator::new(parameters, config)?;
    let active_corrections = generator.pipeline().active_corrections().to_vec();
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Spectrum ===
    generator.generate(window, trace, reporter)?;

    // === Phase 3: Observables ===
    reporter.report(Progress::PhaseStart { name: "Observables" });
    let observables = match generator.spectrum() {
        Some(spectrum) if spectrum.len() >= 2 => Some(derive_observables(spectrum, options)?),
        _ => {
            warn!("Spectrum has fewer than two points; observables are not available.");
            None
        }
    };
    if let Some(obs) = &observables {
        info!(
            log_ft = obs.log_ft,
            mean_kinetic_kev = obs.mean_kinetic_energy_kev,
            "Derived spectrum observables."
        );
    }
    reporter.report(Progress::PhaseFinish);

    let parameters = generator.parameters().clone();
    let spectrum = generator
        .into_spectrum()
        .ok_or(EngineError::EmptySpectrum)?;

    Ok(GenerationResult {
        label,
        parameters,
        active_corrections,
        spectrum,
        observables,
    })
}

fn derive_observables(
    spectrum: &Spectrum,
    options: &TransitionOptions,
) -> Result<Observables, EngineError> {
    let halflife = options.partial_halflife;
    let log_ft = observables::log_ft(spectrum, halflife.unwrap_or(1.0))?;
    let mean_energy = observables::mean_energy(spectrum)?;
    let mean_neutrino_energy = match observables::mean_neutrino_energy(spectrum) {
        Ok(mean) => Some(mean),
        Err(EngineError::EmptySpectrum) => {
            warn!("Antineutrino weights integrate to zero; no mean antineutrino energy.");
            None
        }
        Err(e) => return Err(e),
    };
    let ft_ratio = match (halflife, options.log_ft) {
        (Some(_), Some(external)) => Some(observables::ft_ratio(log_ft, external)),
        _ => None,
    };
    Ok(Observables {
        log_ft,
        halflife_given: halflife.is_some(),
        mean_energy,
        mean_kinetic_energy_kev: observables::mean_kinetic_energy_kev(spectrum)?,
        mean_neutrino_energy,
        ft_ratio,
    })
}

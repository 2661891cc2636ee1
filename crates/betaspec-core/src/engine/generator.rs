use super::config::{GeneratorConfig, SpectrumWindow};
use super::error::EngineError;
use super::grid::EnergyGrid;
use super::observables;
use super::pipeline::{ChannelWeights, CorrectionPipeline};
use super::progress::{Progress, ProgressReporter};
use super::spectrum::{Spectrum, SpectrumPoint};
use super::trace::TraceSink;
use crate::core::spectral::{SpectralFunctions, StandardCorrections};
use crate::core::transition::TransitionParameters;
use tracing::{debug, info};

/// Walks an energy grid through a [`CorrectionPipeline`] and keeps the resulting spectrum.
///
/// The generator owns its transition parameters and the last spectrum it produced; the
/// observables are integrals over that one table.
pub struct SpectrumGenerator<F: SpectralFunctions = StandardCorrections> {
    pipeline: CorrectionPipeline<F>,
    spectrum: Option<Spectrum>,
}

impl SpectrumGenerator<StandardCorrections> {
    pub fn new(params: TransitionParameters, config: &GeneratorConfig) -> Result<Self, EngineError> {
        Ok(Self::from_pipeline(CorrectionPipeline::new(params, config)?))
    }
}

impl<F: SpectralFunctions> SpectrumGenerator<F> {
    pub fn from_pipeline(pipeline: CorrectionPipeline<F>) -> Self {
        Self {
            pipeline,
            spectrum: None,
        }
    }

    pub fn pipeline(&self) -> &CorrectionPipeline<F> {
        &self.pipeline
    }

    pub fn parameters(&self) -> &TransitionParameters {
        self.pipeline.parameters()
    }

    /// Generates the spectrum over `window`, replacing any previous one.
    ///
    /// One trace record is appended per grid point, in increasing `W`. A window outside the
    /// physical range yields an empty spectrum.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStep`] before any evaluation for an unusable step and
    /// [`EngineError::Trace`] when the trace sink fails.
    pub fn generate(
        &mut self,
        window: &SpectrumWindow,
        trace: &mut dyn TraceSink,
        reporter: &ProgressReporter,
    ) -> Result<&Spectrum, EngineError> {
        let grid = self.prepare(window, reporter)?;

        let mut points = Vec::with_capacity(grid.len());
        for w in grid.iter() {
            let weights = self.pipeline.evaluate_traced(w, trace)?;
            points.push(to_point(w, &weights));
            reporter.report(Progress::TaskIncrement);
        }
        trace.flush()?;

        Ok(self.finish(points, reporter))
    }

    /// Parallel variant of [`generate`](Self::generate) producing an identical spectrum and
    /// trace. Grid points are evaluated concurrently; trace records are still appended in
    /// grid order.
    #[cfg(feature = "parallel")]
    pub fn generate_parallel(
        &mut self,
        window: &SpectrumWindow,
        trace: &mut dyn TraceSink,
        reporter: &ProgressReporter,
    ) -> Result<&Spectrum, EngineError> {
        use super::pipeline::trace_record;
        use rayon::prelude::*;

        let grid = self.prepare(window, reporter)?;
        let pipeline = &self.pipeline;
        let evaluated: Vec<(f64, ChannelWeights)> = (0..grid.len())
            .into_par_iter()
            .map(|i| {
                let w = grid.point(i);
                let weights = pipeline.evaluate(w);
                reporter.report(Progress::TaskIncrement);
                (w, weights)
            })
            .collect();

        let mut points = Vec::with_capacity(evaluated.len());
        for (w, weights) in &evaluated {
            trace.append(&trace_record(*w, weights))?;
            points.push(to_point(*w, weights));
        }
        trace.flush()?;

        Ok(self.finish(points, reporter))
    }

    fn prepare(
        &mut self,
        window: &SpectrumWindow,
        reporter: &ProgressReporter,
    ) -> Result<EnergyGrid, EngineError> {
        let grid = EnergyGrid::resolve(window, self.pipeline.parameters().w0)?;
        self.spectrum = None;

        reporter.report(Progress::PhaseStart {
            name: "Spectrum generation",
        });
        reporter.report(Progress::TaskStart {
            total_steps: grid.len() as u64,
        });
        info!(
            points = grid.len(),
            corrections = self.pipeline.active_corrections().len(),
            "Generating spectrum."
        );
        Ok(grid)
    }

    fn finish(&mut self, points: Vec<SpectrumPoint>, reporter: &ProgressReporter) -> &Spectrum {
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        let clamped = points
            .iter()
            .filter(|p| p.electron == 0.0 || p.neutrino == 0.0)
            .count();
        debug!(
            points = points.len(),
            zero_weights = clamped,
            "Spectrum generation finished."
        );
        self.spectrum
            .insert(Spectrum::new(points, self.pipeline.parameters().w0))
    }

    /// The most recently generated spectrum.
    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }

    /// Consumes the generator, returning the last generated spectrum.
    pub fn into_spectrum(self) -> Option<Spectrum> {
        self.spectrum
    }

    fn generated(&self) -> Result<&Spectrum, EngineError> {
        self.spectrum.as_ref().ok_or(EngineError::EmptySpectrum)
    }

    /// `log10(f · t½)` over the last generated spectrum.
    pub fn log_ft(&self, halflife: f64) -> Result<f64, EngineError> {
        observables::log_ft(self.generated()?, halflife)
    }

    /// Mean total electron energy over the last generated spectrum.
    pub fn mean_energy(&self) -> Result<f64, EngineError> {
        observables::mean_energy(self.generated()?)
    }

    pub fn mean_neutrino_energy(&self) -> Result<f64, EngineError> {
        observables::mean_neutrino_energy(self.generated()?)
    }
}

fn to_point(w: f64, weights: &ChannelWeights) -> SpectrumPoint {
    SpectrumPoint {
        w,
        electron: weights.electron,
        neutrino: weights.neutrino,
    }
}

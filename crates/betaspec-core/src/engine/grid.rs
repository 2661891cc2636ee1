use super::config::{SpectrumWindow, StepSpec};
use super::error::EngineError;
use crate::core::constants::{ELECTRON_MASS_KEV, kev_to_w};
use tracing::{debug, warn};

/// Relative tolerance admitting a window end that lies on the grid.
const END_TOLERANCE: f64 = 1e-9;

/// Energy grid resolved from a kinetic energy window, addressed by index.
///
/// Points are computed as `begin + i * step` so no rounding error accumulates along the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyGrid {
    begin: f64,
    end: f64,
    step: f64,
    len: usize,
    pinned_end: bool,
}

fn point_count(intervals: usize) -> Result<usize, EngineError> {
    intervals
        .checked_add(1)
        .ok_or_else(|| EngineError::InvalidStep {
            reason: format!("{} intervals cannot be addressed", intervals),
        })
}

impl EnergyGrid {
    /// Resolves `window` against the endpoint `w0`.
    ///
    /// Bounds are clipped to `[1, w0]`. A window entirely outside that range, or one whose
    /// begin exceeds its end, resolves to an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStep`] for a non-positive or non-finite step size, a
    /// zero step count or a grid too large to index, and [`EngineError::NonFiniteInput`] for non-finite bounds.
    pub fn resolve(window: &SpectrumWindow, w0: f64) -> Result<Self, EngineError> {
        match window.step {
            StepSpec::Size(size) if !(size > 0.0) || !size.is_finite() => {
                return Err(EngineError::InvalidStep {
                    reason: format!("step size must be positive and finite, got {} keV", size),
                });
            }
            StepSpec::Count(0) => {
                return Err(EngineError::InvalidStep {
                    reason: "step count must be at least 1".to_string(),
                });
            }
            _ => {}
        }
        for (name, value) in [("begin", window.begin_kev), ("end", window.end_kev)] {
            if !value.is_finite() {
                return Err(EngineError::NonFiniteInput { name, value });
            }
        }

        let requested_begin = kev_to_w(window.begin_kev);
        let requested_end = if window.end_kev == 0.0 {
            w0
        } else {
            kev_to_w(window.end_kev)
        };

        if requested_begin > requested_end || requested_end < 1.0 || requested_begin > w0 {
            warn!(
                begin_kev = window.begin_kev,
                end_kev = window.end_kev,
                "Spectrum window does not overlap [0, endpoint]; the spectrum will be empty."
            );
            return Ok(Self::empty());
        }

        let begin = requested_begin.max(1.0);
        let end = requested_end.min(w0);
        if begin != requested_begin || end != requested_end {
            debug!(begin, end, "Clipped spectrum window to the physical range.");
        }

        let span = end - begin;
        let grid = match window.step {
            StepSpec::Count(n) => Self {
                begin,
                end,
                step: span / n as f64,
                len: if span > 0.0 { point_count(n)? } else { 1 },
                pinned_end: true,
            },
            StepSpec::Size(size) => {
                let step = size / ELECTRON_MASS_KEV;
                let intervals = ((span + end * END_TOLERANCE) / step).floor();
                if !intervals.is_finite() || intervals >= usize::MAX as f64 {
                    return Err(EngineError::InvalidStep {
                        reason: format!("step size {} keV gives too many grid points", size),
                    });
                }
                Self {
                    begin,
                    end,
                    step,
                    len: point_count(intervals as usize)?,
                    pinned_end: false,
                }
            }
        };
        debug!(points = grid.len, step = grid.step, "Resolved energy grid.");
        Ok(grid)
    }

    fn empty() -> Self {
        Self {
            begin: 1.0,
            end: 1.0,
            step: 0.0,
            len: 0,
            pinned_end: false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step between consecutive points, in units of the electron rest energy.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// The `index`-th grid point. Never exceeds the clipped window end.
    pub fn point(&self, index: usize) -> f64 {
        if self.pinned_end && index + 1 == self.len {
            return self.end;
        }
        (self.begin + index as f64 * self.step).min(self.end)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.point(i))
    }
}

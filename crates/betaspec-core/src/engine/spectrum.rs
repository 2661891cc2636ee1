use crate::core::constants::w_to_kev;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    pub w: f64,
    pub electron: f64,
    pub neutrino: f64,
}

impl SpectrumPoint {
    pub fn kinetic_kev(&self) -> f64 {
        w_to_kev(self.w)
    }
}

/// Electron and antineutrino weights on an increasing energy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    points: Vec<SpectrumPoint>,
    w0: f64,
}

impl Spectrum {
    pub(crate) fn new(points: Vec<SpectrumPoint>, w0: f64) -> Self {
        Self { points, w0 }
    }

    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Endpoint energy of the transition the spectrum was generated for.
    pub fn w0(&self) -> f64 {
        self.w0
    }

    pub fn first(&self) -> Option<&SpectrumPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SpectrumPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpectrumPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Spectrum {
    type Item = &'a SpectrumPoint;
    type IntoIter = std::slice::Iter<'a, SpectrumPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

use betaspec::core::spectral::NuclearShape;

pub struct DefaultsConfig {
    pub begin_kev: f64,
    pub end_kev: f64,
    pub step_size_kev: f64,
    pub neutrino: bool,
    pub ns_shape: NuclearShape,
    pub es_shape: NuclearShape,
    pub mod_gauss_fit: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            begin_kev: 0.0,
            end_kev: 0.0,
            step_size_kev: 1.0,
            neutrino: true,
            ns_shape: NuclearShape::Fermi,
            es_shape: NuclearShape::Fermi,
            mod_gauss_fit: 0.0,
        }
    }
}

use betaspec::engine::config::{GeneratorConfig, SpectrumWindow};
use std::path::PathBuf;

pub struct AppConfig {
    pub transition_path: PathBuf,
    pub output_stem: PathBuf,
    pub exchange_table: Option<PathBuf>,
    pub window: SpectrumWindow,
    /// Whether the summary report lists the antineutrino spectrum.
    pub neutrino: bool,
    pub generator: GeneratorConfig,
}

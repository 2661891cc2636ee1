use thiserror::Error;

use super::config::ConfigError;
use super::trace::TraceError;
use crate::core::transition::TransitionError;
use crate::core::utils::integration::IntegrationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("Missing precomputed input required by the {correction} correction: {input}")]
    MissingInput {
        correction: &'static str,
        input: &'static str,
    },

    #[error("Input '{name}' is not finite: {value}")]
    NonFiniteInput { name: &'static str, value: f64 },

    #[error("Invalid grid step: {reason}")]
    InvalidStep { reason: String },

    #[error("No spectrum has been generated yet, or the generated spectrum is empty")]
    EmptySpectrum,

    #[error("Partial half-life must be positive and finite, got {0} s")]
    InvalidHalflife(f64),

    #[error("Integration failed: {source}")]
    Integration {
        #[from]
        source: IntegrationError,
    },

    #[error("Trace output failed: {source}")]
    Trace {
        #[from]
        source: TraceError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

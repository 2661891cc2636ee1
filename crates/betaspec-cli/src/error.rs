use betaspec::core::io::exchange::ExchangeTableError;
use betaspec::core::transition::TransitionError;
use betaspec::engine::error::EngineError;
use betaspec::engine::trace::TraceError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    ExchangeTable(#[from] ExchangeTableError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write trace: {0}")]
    Trace(#[from] TraceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure while bringing up the evaluator session. Fatal: no query can be
/// answered without a loaded knowledge base.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to start the Prolog machine: {0}")]
    Startup(#[source] io::Error),
    #[error("knowledge base file {} not found", .0.display())]
    MissingKnowledgeBase(PathBuf),
    #[error("failed to load knowledge base {}: {source}", .path.display())]
    KnowledgeBase {
        path: PathBuf,
        #[source]
        source: EvaluatorError,
    },
}

/// Failure raised by the evaluator while answering a single request.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("cannot read program source: {0}")]
    Io(#[from] io::Error),
    #[error("the Prolog machine is no longer running")]
    Disconnected,
    /// An exception term thrown by the Prolog side, in textual form.
    #[error("{0}")]
    Prolog(String),
}

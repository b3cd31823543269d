//! The process-wide evaluator session.
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{EvaluatorError, InitializationError};
use crate::evaluator::{Evaluator, ScryerEvaluator, Solution};

static SESSION: Session = Session::new();

/// Get the shared evaluator, starting the Prolog machine and consulting the
/// configured knowledge base on the first call.
///
/// A failed initialization is not cached, but callers are expected to stop
/// rather than retry.
pub fn acquire() -> Result<&'static EvaluatorHandle, InitializationError> {
    SESSION.acquire_with(|| {
        let conf = Config::get()?;
        let evaluator = ScryerEvaluator::start()?;
        EvaluatorHandle::new(evaluator, &conf.kb_file)
    })
}

/// Holder for an evaluator that is initialized at most once.
pub struct Session {
    handle: OnceCell<EvaluatorHandle>,
}

impl Session {
    pub const fn new() -> Session {
        Session {
            handle: OnceCell::new(),
        }
    }

    /// Return the handle, running `init` only if no handle exists yet.
    /// Concurrent first calls block until one of them finishes.
    pub fn acquire_with<F>(&self, init: F) -> Result<&EvaluatorHandle, InitializationError>
    where
        F: FnOnce() -> Result<EvaluatorHandle, InitializationError>,
    {
        self.handle.get_or_try_init(init)
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

/// An evaluator with the knowledge base loaded into it.
pub struct EvaluatorHandle {
    evaluator: Mutex<Box<dyn Evaluator>>,
    kb_file: PathBuf,
}

impl EvaluatorHandle {
    /// Consult `kb_file` into `evaluator`. The file must exist.
    pub fn new<E>(mut evaluator: E, kb_file: &Path) -> Result<EvaluatorHandle, InitializationError>
    where
        E: Evaluator + 'static,
    {
        if !kb_file.is_file() {
            return Err(InitializationError::MissingKnowledgeBase(
                kb_file.to_owned(),
            ));
        }
        log::info!("consulting knowledge base {}", kb_file.display());
        evaluator
            .consult(kb_file)
            .map_err(|source| InitializationError::KnowledgeBase {
                path: kb_file.to_owned(),
                source,
            })?;

        Ok(EvaluatorHandle {
            evaluator: Mutex::new(Box::new(evaluator)),
            kb_file: kb_file.to_owned(),
        })
    }

    pub fn kb_file(&self) -> &Path {
        &self.kb_file
    }

    pub(crate) fn query(&self, goal: &str) -> Result<Vec<Solution>, EvaluatorError> {
        self.evaluator.lock().query(goal)
    }
}

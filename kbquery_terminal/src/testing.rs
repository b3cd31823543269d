//! Scripted evaluator shared by the unit tests.
use kbquery_core::{Evaluator, EvaluatorError, EvaluatorHandle, Solution, Term};
use std::path::{Path, PathBuf};

pub(crate) struct PlaylistEvaluator;

fn songs(names: &[&str]) -> Vec<Solution> {
    names
        .iter()
        .map(|name| Solution::new().bind("X", Term::atom(*name)))
        .collect()
}

impl Evaluator for PlaylistEvaluator {
    fn consult(&mut self, _path: &Path) -> Result<(), EvaluatorError> {
        Ok(())
    }

    fn query(&mut self, goal: &str) -> Result<Vec<Solution>, EvaluatorError> {
        match goal {
            "lagu_ekstrem(X)" => Ok(songs(&["gemuruh", "intro_ambient"])),
            "wajib_kurasi_manual(X)" => Ok(songs(&[
                "gemuruh",
                "dansa_lantai",
                "intro_ambient",
                "hujan_pelan",
            ])),
            "lagu_ekstrem(gemuruh)" => Ok(vec![Solution::new()]),
            "foo(" => Err(EvaluatorError::Prolog(
                "syntax_error(cannot_start_term)".to_owned(),
            )),
            _ => Ok(vec![]),
        }
    }
}

/// A session handle backed by [`PlaylistEvaluator`], alive for the whole test run.
pub(crate) fn playlist_handle() -> &'static EvaluatorHandle {
    let kb = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../prolog_kb.pl");
    let handle = EvaluatorHandle::new(PlaylistEvaluator, &kb).unwrap();
    Box::leak(Box::new(handle))
}

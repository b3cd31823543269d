//! End-to-end checks against the embedded Prolog machine.
use std::path::PathBuf;

use kbquery_core::evaluator::ScryerEvaluator;
use kbquery_core::{run, EvaluatorHandle, QueryOutcome};

fn handle_for(name: &str, source: &str) -> EvaluatorHandle {
    let path = std::env::temp_dir().join(format!(
        "kbquery_{}_{}.pl",
        name,
        std::process::id()
    ));
    std::fs::write(&path, source).unwrap();
    let evaluator = ScryerEvaluator::start().unwrap();
    EvaluatorHandle::new(evaluator, &path).unwrap()
}

fn shipped_handle() -> EvaluatorHandle {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../prolog_kb.pl");
    let evaluator = ScryerEvaluator::start().unwrap();
    EvaluatorHandle::new(evaluator, &path).unwrap()
}

#[test]
fn facts_yield_bound_rows() {
    let handle = handle_for("facts", "lagu_ekstrem(a).\nlagu_ekstrem(b).\n");
    match run("lagu_ekstrem(X)", &handle) {
        QueryOutcome::BoundRows(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].get("X"), Some("a"));
            assert_eq!(rows[1].get("X"), Some("b"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(run("lagu_ekstrem(a)", &handle), QueryOutcome::ValidNoBindings);
    assert_eq!(run("lagu_ekstrem(z).", &handle), QueryOutcome::NoSolution);
}

#[test]
fn big_integer_bindings_are_exact() {
    let handle = handle_for("bigint", "lagu_ekstrem(a).\n");
    match run("X is 2^100", &handle) {
        QueryOutcome::BoundRows(rows) => {
            assert_eq!(rows[0].get("X"), Some("1267650600228229401496703205376"))
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn unknown_predicate_is_an_error_and_session_survives() {
    let handle = handle_for(
        "errors",
        ":- dynamic(rekomendasi_urutan/2).\nlagu_ekstrem(a).\n",
    );
    assert_eq!(
        run("rekomendasi_urutan(a, z)", &handle),
        QueryOutcome::NoSolution
    );
    match run("no_such_predicate(X)", &handle) {
        QueryOutcome::EvaluationError(msg) => assert!(msg.contains("existence_error")),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        run("lagu_ekstrem(X)", &handle),
        QueryOutcome::BoundRows(_)
    ));
}

#[test]
fn shipped_playlist_catalog_runs() {
    let handle = shipped_handle();
    for entry in kbquery_core::catalog::CATALOG.iter() {
        assert!(!run(entry.query, &handle).is_error(), "{}", entry.query);
    }
    match run("lagu_ekstrem(X)", &handle) {
        QueryOutcome::BoundRows(rows) => {
            let songs: Vec<_> = rows.iter().filter_map(|row| row.get("X")).collect();
            assert_eq!(songs, vec!["gemuruh", "dansa_lantai", "intro_ambient", "hujan_pelan"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

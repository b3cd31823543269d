//! Core functionality for the kbquery tool.
//!
//! Reasoning is delegated to an embedded Prolog evaluator; this crate owns the
//! process-wide evaluator session, runs queries against it and classifies the
//! shape of each result for display.

// clippy lints config:
#![allow(unknown_lints)]

pub mod catalog;
mod config;
mod error;
pub mod evaluator;
pub mod kb;
mod render;
mod runner;
mod session;

pub use self::config::{init_logger, Config};
pub use self::error::{EvaluatorError, InitializationError};
pub use self::evaluator::{Evaluator, Solution, Term};
pub use self::render::{Level, Rendering, ResultTable};
pub use self::runner::{normalize_query, run, QueryOutcome, Row};
pub use self::session::{acquire, EvaluatorHandle, Session};

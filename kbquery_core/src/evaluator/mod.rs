//! Access to the Prolog evaluator.
//!
//! The session only talks to the engine through the [`Evaluator`] trait; the
//! shipped backend is [`ScryerEvaluator`], Scryer Prolog embedded as a
//! library.
mod scryer;
mod term;

use std::iter::FromIterator;
use std::path::Path;

pub use self::scryer::ScryerEvaluator;
pub use self::term::Term;

use crate::error::EvaluatorError;

/// A logic-programming engine holding a fact/rule store.
pub trait Evaluator: Send {
    /// Load every clause of a source file into the store.
    fn consult(&mut self, path: &Path) -> Result<(), EvaluatorError>;

    /// Run a goal and collect every solution it yields, in order.
    fn query(&mut self, goal: &str) -> Result<Vec<Solution>, EvaluatorError>;
}

/// Variable bindings of one successful derivation, in the order the
/// evaluator reported them. Variable names are unique within a solution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    bindings: Vec<(String, Term)>,
}

impl Solution {
    pub fn new() -> Solution {
        Solution::default()
    }

    /// Add a binding, replacing a previous one for the same variable.
    pub fn bind<S: Into<String>>(mut self, var: S, term: Term) -> Solution {
        self.insert(var.into(), term);
        self
    }

    fn insert(&mut self, var: String, term: Term) {
        if let Some(slot) = self.bindings.iter_mut().find(|(name, _)| *name == var) {
            slot.1 = term;
        } else {
            self.bindings.push((var, term));
        }
    }

    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, term)| term)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(name, term)| (name.as_str(), term))
    }
}

impl FromIterator<(String, Term)> for Solution {
    fn from_iter<T: IntoIterator<Item = (String, Term)>>(iter: T) -> Self {
        let mut solution = Solution::new();
        for (var, term) in iter {
            solution.insert(var, term);
        }
        solution
    }
}

//! Query execution and classification of the solution set.
use crate::error::EvaluatorError;
use crate::evaluator::Solution;
use crate::session::EvaluatorHandle;

/// The shape of one query's result.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query has no derivation under the loaded knowledge base.
    NoSolution,
    /// The query holds but binds no variables.
    ValidNoBindings,
    /// One row per solution, in the order the evaluator produced them.
    BoundRows(Vec<Row>),
    /// The evaluator rejected the query or failed while answering it.
    EvaluationError(String),
}

/// The bindings of one solution with every term rendered as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, var: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, value)| value.as_str())
    }

    /// Variable names in the order they were bound.
    pub fn vars(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

impl From<&Solution> for Row {
    fn from(solution: &Solution) -> Row {
        Row {
            cells: solution
                .iter()
                .map(|(var, term)| (var.to_owned(), term.to_string()))
                .collect(),
        }
    }
}

/// Trim a query and drop the clause-terminating full stop, if any.
pub fn normalize_query(query: &str) -> &str {
    let query = query.trim();
    query
        .strip_suffix('.')
        .map(str::trim_end)
        .unwrap_or(query)
}

/// Run `query` against the session evaluator and classify the result.
///
/// Evaluator failures never escape; they come back as
/// [`QueryOutcome::EvaluationError`]. Rejecting blank queries is up to the
/// caller.
pub fn run(query: &str, handle: &EvaluatorHandle) -> QueryOutcome {
    let goal = normalize_query(query);
    let outcome = QueryOutcome::classify(handle.query(goal));
    match &outcome {
        QueryOutcome::EvaluationError(msg) => log::warn!("query `{}` failed: {}", goal, msg),
        QueryOutcome::BoundRows(rows) => log::info!("query `{}`: {} solutions", goal, rows.len()),
        other => log::info!("query `{}`: {:?}", goal, other),
    }
    outcome
}

impl QueryOutcome {
    /// First match wins: no solutions, a single empty solution, anything else.
    /// An empty solution among several is kept as an (empty) row.
    pub fn classify(result: Result<Vec<Solution>, EvaluatorError>) -> QueryOutcome {
        let solutions = match result {
            Ok(solutions) => solutions,
            Err(err) => {
                let mut msg = err.to_string();
                if msg.trim().is_empty() {
                    msg = "unknown evaluator error".to_owned();
                }
                return QueryOutcome::EvaluationError(msg);
            }
        };
        match solutions.as_slice() {
            [] => QueryOutcome::NoSolution,
            [only] if only.is_empty() => QueryOutcome::ValidNoBindings,
            _ => QueryOutcome::BoundRows(solutions.iter().map(Row::from).collect()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryOutcome::EvaluationError(_))
    }
}

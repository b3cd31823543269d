use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Receiver, Sender};
use scryer_prolog::{LeafAnswer, Machine, MachineBuilder};

use super::{Evaluator, Solution, Term};
use crate::error::{EvaluatorError, InitializationError};

enum Request {
    Consult {
        module: String,
        source: String,
        reply: Sender<()>,
    },
    Query {
        goal: String,
        reply: Sender<Result<Vec<Solution>, EvaluatorError>>,
    },
}

/// Scryer Prolog embedded in the process.
///
/// The machine is built on, and only ever touched from, a dedicated worker
/// thread; requests reach it over a channel.
pub struct ScryerEvaluator {
    requests: Option<Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl ScryerEvaluator {
    pub fn start() -> Result<ScryerEvaluator, InitializationError> {
        let (requests, inbox) = channel::unbounded();
        let worker = std::thread::Builder::new()
            .name("prolog-machine".to_owned())
            .spawn(move || serve(inbox))
            .map_err(InitializationError::Startup)?;
        log::info!("embedded Prolog machine started");
        Ok(ScryerEvaluator {
            requests: Some(requests),
            worker: Some(worker),
        })
    }

    fn send(&self, request: Request) -> Result<(), EvaluatorError> {
        self.requests
            .as_ref()
            .ok_or(EvaluatorError::Disconnected)?
            .send(request)
            .map_err(|_| EvaluatorError::Disconnected)
    }
}

impl Evaluator for ScryerEvaluator {
    fn consult(&mut self, path: &Path) -> Result<(), EvaluatorError> {
        let source = std::fs::read_to_string(path)?;
        let module = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "kb".to_owned());
        let (reply, answer) = channel::bounded(1);
        self.send(Request::Consult {
            module,
            source,
            reply,
        })?;
        answer.recv().map_err(|_| EvaluatorError::Disconnected)
    }

    fn query(&mut self, goal: &str) -> Result<Vec<Solution>, EvaluatorError> {
        log::debug!("run: {}", goal);
        let (reply, answer) = channel::bounded(1);
        self.send(Request::Query {
            goal: goal.to_owned(),
            reply,
        })?;
        answer.recv().map_err(|_| EvaluatorError::Disconnected)?
    }
}

impl Drop for ScryerEvaluator {
    fn drop(&mut self) {
        // closing the channel stops the worker
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Prolog machine worker panicked");
            }
        }
    }
}

fn serve(inbox: Receiver<Request>) {
    let mut machine = MachineBuilder::default().build();
    for request in inbox.iter() {
        match request {
            Request::Consult {
                module,
                source,
                reply,
            } => {
                log::debug!("consulting {}", module);
                machine.consult_module_string(&module, source);
                let _ = reply.send(());
            }
            Request::Query { goal, reply } => {
                let answers = panic::catch_unwind(AssertUnwindSafe(|| solve(&mut machine, &goal)))
                    .unwrap_or_else(|_| {
                        Err(EvaluatorError::Prolog(format!(
                            "the evaluator aborted while running {}",
                            goal
                        )))
                    });
                let _ = reply.send(answers);
            }
        }
    }
    log::debug!("Prolog machine stopped");
}

/// Collect every answer to `goal`, in the order the machine yields them.
fn solve(machine: &mut Machine, goal: &str) -> Result<Vec<Solution>, EvaluatorError> {
    let mut solutions = Vec::new();
    for answer in machine.run_query(format!("{}.", goal)) {
        match answer {
            Ok(LeafAnswer::True) => solutions.push(Solution::new()),
            Ok(LeafAnswer::False) => break,
            Ok(LeafAnswer::LeafAnswer { bindings, .. }) => solutions.push(
                bindings
                    .into_iter()
                    .map(|(var, term)| (var, Term::from(term)))
                    .collect(),
            ),
            Ok(other) => return Err(EvaluatorError::Prolog(format!("{:?}", other))),
            Err(error) => return Err(EvaluatorError::Prolog(Term::from(error).to_string())),
        }
    }
    Ok(solutions)
}

//! A type that implements the behaviour of the input line interpreter.
//!
//! Every line typed by the user is either a command (`help`, `list`, `run 3`...)
//! or a freeform Prolog query preceded by `?`. Pressing enter on an empty line
//! runs the inference currently selected in the catalog.
use crate::Action;
use kbquery_core::{
    catalog::{self, NamedInference, CATALOG},
    normalize_query, run, EvaluatorHandle, Level, Rendering,
};
use tui::{
    style::{Modifier, Style},
    text::{Span, Spans, Text},
};

const HELP_COMMAND: &str = "\
Welcome to the interactive kbquery 0.0.1 interpreter!

Select one of the inferences with TAB and press ENTER on an empty line to run it.
To run your own query preceed it with ?, for example: ?beda_genre(X, Y).

To quit this utility just write \"quit\" or \"exit\". For a complete list of commands write
\"help commands\".
";

const HELP_COMMANDS: &str = "\
List of valid commands:
* help > the help command
* help commands > this command, prints info about commands
* help queries > how to query the knowledge base
* list > list the available inferences
* run <n> > run inference number n
* quit | exit > close down the program
* shortcuts > show available keyboard shortcuts
";

const HELP_QUERYING: &str = "\
Any Prolog goal preceeded by ? is sent to the evaluator, the final full stop is optional:

> ?lagu_ekstrem(X) > all the bindings for X, one row per solution
> ?lagu_ekstrem(gemuruh) > VALID (true) when the goal holds
> ?rekomendasi_urutan(gemuruh, X) > NOT VALID (false) when there is no solution
";

pub trait ReplInterpreter {
    /// Feed new input characters to the interpreter and return
    /// a new action after digestion.
    fn digest<'b, 'a: 'b>(&'b mut self, input: char) -> Action<'a>;

    /// Execute a command and return the continuation action if there
    /// is one.
    fn cmd_executor<'b, 'a: 'b>(&'b mut self, command: &str) -> Option<Action<'a>>;

    /// Drop last change of the input stream and return an optional action
    /// to be performed after rollingback last change.
    fn delete_last<'b, 'a: 'b>(&'b mut self) -> Option<Action<'a>>;

    /// Drops any undergoing write on the interpreter command buffer.
    fn drop_command(&mut self);

    /// Return any queued command if there is one.
    fn queued_command(&mut self) -> Option<String>;

    /// Evaluate the special newline eval character.
    ///
    /// The default implementation issues the queued command, or runs the
    /// selected catalog entry when the line is empty.
    fn newline_eval<'b, 'a: 'b>(&'b mut self) -> Action<'a> {
        if let Some(command) = self.queued_command() {
            Action::Command(command)
        } else {
            Action::RunSelected
        }
    }
}

/// Interpreter answering queries with the shared evaluator session.
pub struct QueryInterpreter {
    handle: &'static EvaluatorHandle,
    command: String,
}

impl QueryInterpreter {
    pub fn new(handle: &'static EvaluatorHandle) -> QueryInterpreter {
        QueryInterpreter {
            handle,
            command: String::new(),
        }
    }

    fn run_query<'a>(&self, query: &str) -> Action<'a> {
        if query.trim().is_empty() {
            return Action::Show(Rendering::status(
                Level::Warning,
                "Query must not be empty.",
            ));
        }
        let outcome = run(query, self.handle);
        Action::Chain(vec![
            Action::WriteInfoText(Text::from(format!("?- {}.", normalize_query(query)))),
            Action::Show(outcome.render(query)),
        ])
    }

    fn run_entry<'a>(&self, entry: &NamedInference) -> Action<'a> {
        let header = Text::from(vec![
            Spans::from(Span::styled(
                entry.label,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(format!("Goal: {}", entry.description)),
        ]);
        Action::WriteInfoText(header).compose(self.run_query(entry.query))
    }
}

impl ReplInterpreter for QueryInterpreter {
    fn digest<'b, 'a: 'b>(&'b mut self, input: char) -> Action<'a> {
        match input {
            '\n' => self.newline_eval(),
            c => {
                self.command.push(c);
                Action::Continue
            }
        }
    }

    fn cmd_executor<'b, 'a: 'b>(&'b mut self, command: &str) -> Option<Action<'a>> {
        match Command::from(command) {
            Command::Err => Some(Action::WriteInfoText(Text::from("Unknown command"))),
            Command::Help => Some(Action::WriteInfoText(Text::from(HELP_COMMAND))),
            Command::HelpCommands => Some(Action::WriteInfoText(Text::from(HELP_COMMANDS))),
            Command::HelpQuerying => Some(Action::WriteInfoText(Text::from(HELP_QUERYING))),
            Command::List => Some(Action::WriteInfoText(catalog_text())),
            Command::Run(n) => match catalog::by_number(n) {
                Some(entry) => Some(self.run_entry(entry)),
                None => Some(Action::Show(Rendering::status(
                    Level::Warning,
                    format!("There is no inference number {}.", n),
                ))),
            },
            Command::Query(query) => Some(self.run_query(&query)),
            Command::Exit => Some(Action::Exit),
        }
    }

    fn delete_last<'b, 'a: 'b>(&'b mut self) -> Option<Action<'a>> {
        self.command.pop();
        if self.command.is_empty() {
            Some(Action::Discard)
        } else {
            None
        }
    }

    fn drop_command(&mut self) {
        self.command.truncate(0);
    }

    fn queued_command(&mut self) -> Option<String> {
        let command = std::mem::take(&mut self.command);
        let command = command.trim();
        if !command.is_empty() {
            Some(command.to_owned())
        } else {
            None
        }
    }
}

fn catalog_text() -> Text<'static> {
    let lines: Vec<Spans> = CATALOG
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Spans::from(vec![
                Span::styled(
                    format!("{}. ", i + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(entry.label),
                Span::raw(" > "),
                Span::raw(entry.query),
            ])
        })
        .collect();
    Text::from(lines)
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    HelpCommands,
    HelpQuerying,
    List,
    Run(usize),
    Query(String),
    Exit,
    Err,
}

impl<'a> From<&'a str> for Command {
    fn from(command: &'a str) -> Command {
        let command = command.trim();
        if let Some(query) = command.strip_prefix('?') {
            return Command::Query(query.to_owned());
        }
        match command {
            "help" => Command::Help,
            "help commands" => Command::HelpCommands,
            "help queries" => Command::HelpQuerying,
            "list" => Command::List,
            "quit" | "exit" => Command::Exit,
            other => match other.strip_prefix("run") {
                Some(n) if n.starts_with(' ') => n
                    .trim()
                    .parse()
                    .map(Command::Run)
                    .unwrap_or(Command::Err),
                _ => Command::Err,
            },
        }
    }
}

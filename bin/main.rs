//! kbquery
//!
//! Explore the playlist knowledge base with a set of named Prolog inferences
//! or freeform queries.

use kbquery_core::{acquire, init_logger, Config, EvaluatorHandle};

fn main() {
    let conf = match Config::get() {
        Ok(conf) => conf,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    init_logger(conf);

    let handle = match acquire() {
        Ok(handle) => handle,
        Err(err) => {
            log::error!("initialization failed: {}", err);
            eprintln!("Failed to load the Prolog evaluator or the knowledge base.");
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = start(handle) {
        log::error!("terminal failure: {}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(feature = "repl")]
fn start(handle: &'static EvaluatorHandle) -> std::io::Result<()> {
    use kbquery_core::{kb, Level};
    use kbquery_term_utils::{Application, QueryInterpreter};

    let view = kb::read_source(handle.kb_file());
    let mut app = Application::new(QueryInterpreter::new(handle), view);
    app.print_status(
        Level::Success,
        format!("Knowledge base {} loaded.", handle.kb_file().display()),
    );
    app.print_text("Type \"help\" for the list of commands.");
    app.start_event_loop()
}

/// Without the terminal, run every inference of the catalog once.
#[cfg(not(feature = "repl"))]
fn start(handle: &'static EvaluatorHandle) -> std::io::Result<()> {
    use kbquery_core::{catalog::CATALOG, run, Rendering};
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Knowledge base {} loaded.", handle.kb_file().display())?;
    for entry in CATALOG.iter() {
        writeln!(out)?;
        writeln!(out, "{}", entry.label)?;
        writeln!(out, "Goal: {}", entry.description)?;
        writeln!(out, "?- {}.", entry.query)?;
        match run(entry.query, handle).render(entry.query) {
            Rendering::Status { message, .. } => writeln!(out, "{}", message)?,
            Rendering::Table(table) => write!(out, "{}", table.to_plain_text())?,
        }
    }
    Ok(())
}

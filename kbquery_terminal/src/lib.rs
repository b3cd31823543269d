mod action;
mod application;
mod interpreter;
mod state;
#[cfg(test)]
mod testing;

pub use action::Action;
pub use application::Application;
pub use interpreter::{QueryInterpreter, ReplInterpreter};

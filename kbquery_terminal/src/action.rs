use kbquery_core::Rendering;
use tui::text::Text;

#[derive(Debug, PartialEq)]
pub enum Action<'a> {
    /// Writes some text to the output box in the terminal
    WriteInfoText(Text<'a>),
    /// Feed text to the input line as if it was typed
    WriteInputText(String),
    /// Show the rendering of a query outcome in the output box
    Show(Rendering),
    /// Signal an interpretable command to the terminal main event loop
    /// for the interpreter.
    Command(String),
    /// Run the inference currently selected in the catalog
    RunSelected,
    /// Continue digesting input
    Continue,
    /// Exit the program
    Exit,
    /// Drop the line being typed
    Discard,
    /// Move to newline
    Newline,
    /// Chain several actions together after processing an event
    Chain(Vec<Action<'a>>),
    None,
}

impl<'a> Action<'a> {
    pub fn exit(&self) -> bool {
        self == &Action::Exit
    }

    /// Run `other` after this action.
    pub fn compose(self, other: Action<'a>) -> Action<'a> {
        match self {
            Action::Chain(mut chain) => {
                chain.push(other);
                Action::Chain(chain)
            }
            Action::None => other,
            this => Action::Chain(vec![this, other]),
        }
    }
}

#[test]
fn compose_flattens_into_one_chain() {
    let action = Action::Continue
        .compose(Action::Newline)
        .compose(Action::Exit);
    assert_eq!(
        action,
        Action::Chain(vec![Action::Continue, Action::Newline, Action::Exit])
    );
    assert_eq!(Action::None.compose(Action::Exit), Action::Exit);
    assert!(Action::Exit.exit());
}

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use kbquery_core::{catalog::CATALOG, kb::KbView, Level, Rendering, ResultTable};
use tui::{
    style::{Color, Style},
    text::{Span, Spans, Text},
    widgets::ListState,
};

const CURSOR_ON: char = '\u{2588}';
const PROMPT: &str = ">>> ";
const HISTORY_LEN: usize = 100;

pub(crate) struct AppState<'a> {
    /// terminate the application flag
    pub terminate: bool,
    pub cmd_history: CmdHistory,
    pub cursor: Cursor,
    /// each string belongs to a single line in the box
    input_box: Vec<String>,
    /// each group of spans belongs to a single line in the box
    info_box: Vec<Spans<'a>>,
    table: Option<ResultTable>,
    kb: KbView,
    pub kb_scroll: u16,
    pub catalog: ListState,
    #[cfg(feature = "clipboard")]
    pub clipboard: Option<copypasta::ClipboardContext>,
}

impl<'a> AppState<'a> {
    pub fn new(kb: KbView) -> Self {
        let mut catalog = ListState::default();
        catalog.select(Some(0));
        AppState {
            terminate: false,
            cmd_history: CmdHistory::new(),
            cursor: Cursor::new(),
            input_box: Vec::new(),
            info_box: Vec::new(),
            table: None,
            kb,
            kb_scroll: 0,
            catalog,
            #[cfg(feature = "clipboard")]
            clipboard: copypasta::ClipboardContext::new().ok(),
        }
    }

    /// Index of the selected catalog entry.
    pub fn selected(&self) -> usize {
        self.catalog.selected().unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let next = (self.selected() + 1) % CATALOG.len();
        self.catalog.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let previous = (self.selected() + CATALOG.len() - 1) % CATALOG.len();
        self.catalog.select(Some(previous));
    }

    pub fn scroll_kb(&mut self, lines: i32) {
        let max = match &self.kb {
            KbView::Source(text) => text.lines().count() as i32,
            KbView::Missing(_) => 0,
        };
        self.kb_scroll = (self.kb_scroll as i32 + lines).max(0).min(max) as u16;
    }

    pub fn kb_frame_content(&self) -> Text {
        match &self.kb {
            KbView::Source(text) => Text::raw(text.as_str()),
            KbView::Missing(warning) => {
                Text::styled(warning.as_str(), Style::default().fg(Color::Yellow))
            }
        }
    }

    /// Last `height` lines of the input box, with the cursor.
    pub fn input_box_frame_content(&self, height: u16) -> Text {
        let skip = self.input_box.len().saturating_sub(height as usize);
        let last = self.input_box.len().saturating_sub(1);
        let lines: Vec<Spans> = self
            .input_box
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, line)| {
                if i == last && self.cursor.visible() {
                    Spans::from(format!("{}{}", line, CURSOR_ON))
                } else {
                    Spans::from(line.as_str())
                }
            })
            .collect();
        Text::from(lines)
    }

    /// Last `height` lines of the output box.
    pub fn info_box_frame_content(&self, height: u16) -> Text<'a> {
        let skip = self.info_box.len().saturating_sub(height as usize);
        Text::from(self.info_box[skip..].to_vec())
    }

    pub fn info_box_len(&self) -> usize {
        self.info_box.len()
    }

    pub fn table(&self) -> Option<&ResultTable> {
        self.table.as_ref()
    }

    /// Text typed on the current line, without the prompt.
    pub fn current_input(&self) -> &str {
        self.input_box
            .last()
            .map(|line| line.strip_prefix(PROMPT).unwrap_or(line.as_str()))
            .unwrap_or("")
    }

    /// Append a character to the current input box line.
    pub fn input_char(&mut self, input: char) {
        if let Some(line) = self.input_box.last_mut() {
            line.push(input);
        } else {
            self.input_box.push(format!("{}{}", PROMPT, input));
        };
    }

    pub fn print_text(&mut self, text: Text<'a>) {
        self.info_box.extend(text.lines)
    }

    pub fn print_status(&mut self, level: Level, message: String) {
        let style = match level {
            Level::Success => Style::default().fg(Color::Green),
            Level::Info => Style::default().fg(Color::Cyan),
            Level::Warning => Style::default().fg(Color::Yellow),
            Level::Error => Style::default().fg(Color::Red),
        };
        self.print_text(Text::styled(message, style));
    }

    /// Display a query outcome; a table replaces the previous one.
    pub fn show(&mut self, rendering: Rendering) {
        match rendering {
            Rendering::Status { level, message } => self.print_status(level, message),
            Rendering::Table(table) => {
                self.print_status(Level::Success, table.title.clone());
                self.table = Some(table);
            }
        }
    }

    pub fn print_error(&mut self, err: &dyn std::error::Error) {
        self.print_status(Level::Error, format!("Failed with: {}", err));
    }

    // Report an error in the output box.
    pub fn report_error(&mut self, msg: &'a str) {
        self.info_box.push(Spans::from(Span::styled(
            msg,
            Style::default().fg(Color::Red),
        )))
    }

    pub fn clear_input_box(&mut self) {
        self.input_box.clear();
    }

    pub fn clear_info_box(&mut self) {
        self.info_box.clear();
        self.table = None;
    }

    pub fn clear_input_line(&mut self) {
        self.input_box.pop();
        self.newline_input()
    }

    /// Start with a single, empty, prompt line.
    pub fn initial_line(&mut self) {
        self.clear_input_box();
        self.newline_input();
    }

    /// Make a new line in the input box.
    pub fn newline_input(&mut self) {
        if self.input_box.len() == HISTORY_LEN {
            self.input_box.remove(0);
        }
        self.input_box.push(String::from(PROMPT));
        self.cursor.effect_on = true;
    }

    // Delete previous character from the input box.
    pub fn delete(&mut self) {
        if let Some(line) = self.input_box.last_mut() {
            if line.len() > PROMPT.len() {
                line.pop();
            }
        }
    }

    pub fn side_effects(&mut self) {
        self.cursor.side_effects();
    }
}

/// The last submitted lines, browsable backwards and forwards.
pub(crate) struct CmdHistory {
    call_stack: VecDeque<String>,
    shifted_backward: usize,
    shifted_forward: usize,
}

impl CmdHistory {
    pub fn new() -> Self {
        CmdHistory {
            call_stack: VecDeque::with_capacity(HISTORY_LEN),
            shifted_backward: 0,
            shifted_forward: 0,
        }
    }

    pub fn push_in_call(&mut self, call: String) {
        if self.call_stack.len() == HISTORY_LEN {
            self.call_stack.pop_front();
        }
        self.call_stack.push_back(call);
    }

    pub fn get_previous_call(&mut self) -> Option<String> {
        if self.call_stack.is_empty() || self.shifted_backward == self.call_stack.len() {
            return None;
        }
        self.call_stack.rotate_right(1);
        self.shifted_backward += 1;
        if self.shifted_forward > 0 {
            self.shifted_forward -= 1;
        }
        self.call_stack.front().cloned()
    }

    pub fn get_following_call(&mut self) -> Option<String> {
        if self.call_stack.is_empty()
            || self.shifted_forward == self.call_stack.len() - 1
            || self.shifted_backward == 0
        {
            return None;
        }
        self.call_stack.rotate_left(1);
        self.shifted_forward += 1;
        self.shifted_backward -= 1;
        self.call_stack.front().cloned()
    }

    pub fn reset_call_stack(&mut self) {
        if self.shifted_backward > 0 {
            self.call_stack.rotate_left(self.shifted_backward);
            if (self.shifted_forward + 1) > 2 {
                self.shifted_forward -= self.shifted_backward;
            }
        }
        if (self.shifted_forward + 1) > 2 {
            self.call_stack.rotate_right(self.shifted_forward + 2);
        }
        self.shifted_backward = 0;
        self.shifted_forward = 0;
    }
}

/// Blinking block cursor drawn at the end of the input line.
pub(crate) struct Cursor {
    time: Instant,
    show: bool,
    /// blink while idle; a steady cursor is drawn otherwise
    pub effect_on: bool,
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor {
            time: Instant::now(),
            show: true,
            effect_on: true,
        }
    }

    pub fn visible(&self) -> bool {
        !self.effect_on || self.show
    }

    pub fn side_effects(&mut self) {
        if !self.effect_on {
            return;
        }
        let nt = Instant::now();
        if nt.duration_since(self.time) >= Duration::new(0, 500_000_000) {
            self.show = !self.show;
            self.time = nt;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use kbquery_core::Term;

    #[test]
    fn call_stack_rotation() {
        use std::iter::FromIterator;

        let front_sample = "?lagu_ekstrem(X)".to_owned();
        let back_sample = "run 2".to_owned();
        let mut history = CmdHistory::new();
        history.call_stack = VecDeque::from_iter(vec!["list".to_owned(); 2]);
        history.call_stack.push_front(front_sample);
        history.push_in_call(back_sample);

        for i in 0..5 {
            let r = history.get_previous_call();
            if i == 4 {
                assert!(r.is_none());
            } else {
                assert!(r.is_some());
                if i == 3 {
                    assert_eq!("?lagu_ekstrem(X)", r.unwrap());
                }
            }
        }

        for i in 0..4 {
            let r = history.get_following_call();
            if i == 3 {
                assert!(r.is_none());
            } else {
                assert!(r.is_some());
                if i == 2 {
                    assert_eq!("run 2", r.unwrap());
                }
            }
        }

        history.reset_call_stack();
        assert_eq!(
            Vec::from(history.call_stack.clone()),
            vec!["?lagu_ekstrem(X)", "list", "list", "run 2"]
        );

        history.push_in_call("help".to_owned());
        assert_eq!(5, history.call_stack.len());
        assert_eq!("help", history.get_previous_call().unwrap().as_str());
    }

    #[test]
    fn history_is_bounded() {
        let mut history = CmdHistory::new();
        for i in 0..(HISTORY_LEN + 5) {
            history.push_in_call(format!("run {}", i));
        }
        assert_eq!(history.call_stack.len(), HISTORY_LEN);
        assert_eq!(history.call_stack.front().unwrap(), "run 5");
    }

    #[test]
    fn catalog_selection_wraps() {
        let mut state = AppState::new(KbView::Missing("none".to_owned()));
        assert_eq!(state.selected(), 0);
        state.select_previous();
        assert_eq!(state.selected(), CATALOG.len() - 1);
        state.select_next();
        assert_eq!(state.selected(), 0);
        state.select_next();
        assert_eq!(state.selected(), 1);
    }

    #[test]
    fn input_line_editing() {
        let mut state = AppState::new(KbView::Source(String::new()));
        state.initial_line();
        assert_eq!(state.current_input(), "");
        "?x".chars().for_each(|c| state.input_char(c));
        assert_eq!(state.current_input(), "?x");
        state.delete();
        state.delete();
        state.delete();
        assert_eq!(state.current_input(), "");
        state.input_char('a');
        state.clear_input_line();
        assert_eq!(state.current_input(), "");
    }

    #[test]
    fn table_replaced_and_cleared() {
        let mut state = AppState::new(KbView::Source(String::new()));
        let rows: Vec<_> = vec![kbquery_core::Solution::new().bind("X", Term::atom("a"))]
            .iter()
            .map(kbquery_core::Row::from)
            .collect();
        state.show(Rendering::Table(ResultTable::from_rows(&rows)));
        assert_eq!(state.table().map(|t| t.rows.len()), Some(1));
        assert_eq!(state.info_box_len(), 1);

        state.show(Rendering::status(Level::Info, "VALID (true)"));
        assert_eq!(state.info_box_len(), 2);

        state.clear_info_box();
        assert!(state.table().is_none());
        assert_eq!(state.info_box_len(), 0);
    }

    #[test]
    fn kb_scroll_is_clamped() {
        let mut state = AppState::new(KbView::Source("a.\nb.\nc.\n".to_owned()));
        state.scroll_kb(-4);
        assert_eq!(state.kb_scroll, 0);
        state.scroll_kb(10);
        assert_eq!(state.kb_scroll, 3);
    }
}

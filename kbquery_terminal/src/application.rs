//! Terminal that controls the main application flow, includes the main event loop.
use crate::{interpreter::ReplInterpreter, state::AppState, Action};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use kbquery_core::{catalog::CATALOG, kb::KbView, ResultTable};
use std::time::Duration;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame, Terminal as TuiTerminal,
};

const SHORTCUTS_HELP: &str = "\
Shortcut help:
* TAB / SHIFT-TAB > select the next / previous inference
* ENTER on an empty line > run the selected inference
* CTRL-C > cancel the current line
* CTRL-D | ESC > close down the program
* UP > Scroll commands backwards
* DOWN > Scroll commands forwards
* PAGE-UP / PAGE-DOWN > scroll the knowledge base

Built-in commands:
* clear > clears the terminal screen
";

/// A TUI application.
pub struct Application<'a, I>
where
    I: ReplInterpreter,
{
    interpreter: I,
    state: AppState<'a>,
}

/// Puts the terminal in raw mode for as long as it lives.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<RawMode> {
        crossterm::terminal::enable_raw_mode().map_err(into_io_error)?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

fn into_io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

impl<'a, I> Application<'a, I>
where
    I: ReplInterpreter,
{
    pub fn new(interpreter: I, kb: KbView) -> Self {
        let state = AppState::new(kb);
        Application { interpreter, state }
    }

    /// Start the blocking TUI event/render loop.
    pub fn start_event_loop(&mut self) -> std::io::Result<()> {
        let _raw_mode = RawMode::enable()?;
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = TuiTerminal::new(backend)?;

        terminal.clear()?;
        self.state.initial_line();
        loop {
            let state = &mut self.state;
            terminal.draw(|f| {
                state.side_effects();
                Self::draw_frame(f, state);
            })?;

            match crossterm::event::poll(Duration::from_millis(10)) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => {
                        let action = self.process_event(event).unwrap_or(Action::None);
                        self.main_ev_loop_action(action);
                    }
                    Err(err) => {
                        self.state.print_error(&err);
                        self.state.terminate = true;
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    self.state.print_error(&err);
                    self.state.terminate = true;
                }
            }
            if self.state.terminate {
                break;
            }
        }
        terminal.clear()?;
        terminal.set_cursor(0, 0)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn layout_for_frame(area: Rect) -> (Rect, Vec<Rect>) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)].as_ref())
            .split(area);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(CATALOG.len() as u16 + 2),
                    Constraint::Length(4),
                    Constraint::Length(5),
                    Constraint::Min(3),
                ]
                .as_ref(),
            )
            .split(columns[1]);
        (columns[0], right)
    }

    fn draw_frame<B: Backend>(f: &mut Frame<B>, state: &mut AppState<'a>) {
        let (kb_area, chunks) = Self::layout_for_frame(f.size());

        let kb = Paragraph::new(state.kb_frame_content())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Knowledge Base "),
            )
            .wrap(Wrap { trim: false })
            .scroll((state.kb_scroll, 0));
        f.render_widget(kb, kb_area);

        let items: Vec<ListItem> = CATALOG
            .iter()
            .map(|entry| ListItem::new(entry.label))
            .collect();
        let catalog = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Inferences "))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        f.render_stateful_widget(catalog, chunks[0], &mut state.catalog);

        let entry = &CATALOG[state.selected()];
        let details = Paragraph::new(Text::from(vec![
            Spans::from(vec![
                Span::styled("Goal: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(entry.description),
            ]),
            Spans::from(vec![
                Span::styled("Query: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(entry.query),
            ]),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(details, chunks[1]);

        let input = Paragraph::new(state.input_box_frame_content(inner_height(chunks[2])))
            .style(Style::default())
            .block(Block::default().borders(Borders::ALL).title(" Input "));
        f.render_widget(input, chunks[2]);

        match state.table() {
            Some(table) => {
                let info_height = (state.info_box_len() as u16 + 2).min(chunks[3].height / 2);
                let output = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(info_height), Constraint::Min(3)].as_ref())
                    .split(chunks[3]);
                let info = Self::draw_output_box(
                    state.info_box_frame_content(inner_height(output[0])),
                );
                f.render_widget(info, output[0]);

                let widths = table_widths(table);
                let results = Self::draw_table(table, &widths);
                f.render_widget(results, output[1]);
            }
            None => {
                let info = Self::draw_output_box(
                    state.info_box_frame_content(inner_height(chunks[3])),
                );
                f.render_widget(info, chunks[3]);
            }
        }
    }

    fn draw_output_box(text: Text) -> Paragraph {
        Paragraph::new(text)
            .style(Style::default())
            .block(Block::default().borders(Borders::ALL).title(" Output "))
            .wrap(Wrap { trim: false })
    }

    fn draw_table<'t>(table: &'t ResultTable, widths: &'t [Constraint]) -> Table<'t> {
        let header = Row::new(table.columns.iter().map(|c| Cell::from(c.as_str())))
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        let rows = table.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .map(|cell| Cell::from(cell.as_deref().unwrap_or(""))),
            )
        });
        Table::new(rows)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", table.title)),
            )
            .widths(widths)
            .column_spacing(2)
    }

    fn main_ev_loop_action(&mut self, action: Action<'a>) {
        match self.exec_action(action) {
            Some(Action::Exit) => {
                self.state.terminate = true;
            }
            Some(Action::Chain(chain)) => {
                if self.exec_or_break(chain).is_some() {
                    self.state.terminate = true;
                }
            }
            Some(Action::None) | None => {}
            _ => self
                .state
                .report_error("Cannot perform that action in this context."),
        }
    }

    /// Run a chain in order, nested chains included; stops at the first exit.
    fn exec_or_break(&mut self, chain: Vec<Action<'a>>) -> Option<Action<'a>> {
        let mut pending: Vec<Action<'a>> = chain.into_iter().rev().collect();
        while let Some(action) = pending.pop() {
            match self.exec_action(action) {
                Some(Action::Chain(nested)) => pending.extend(nested.into_iter().rev()),
                Some(action) if action.exit() => return Some(Action::Exit),
                _ => {}
            }
        }
        None
    }

    fn exec_action(&mut self, action: Action<'a>) -> Option<Action<'a>> {
        match action {
            Action::Chain(chain) => return Some(Action::Chain(chain)),
            Action::Continue => {
                self.state.cursor.effect_on = false;
            }
            Action::Command(cmd) => {
                self.state.cmd_history.reset_call_stack();
                self.state.cmd_history.push_in_call(cmd.clone());
                self.state.clear_info_box();
                if self.is_custom_cmd(&cmd) {
                    if let Some(action) = self.interpreter.cmd_executor(&cmd) {
                        return Some(action.compose(Action::Newline));
                    }
                }
                if cmd == "clear" {
                    self.state.initial_line();
                } else {
                    self.state.newline_input();
                }
            }
            Action::RunSelected => {
                let cmd = format!("run {}", self.state.selected() + 1);
                return self.exec_action(Action::Command(cmd));
            }
            Action::Discard => {
                self.interpreter.drop_command();
                self.state.clear_input_line();
            }
            Action::Newline => self.state.newline_input(),
            Action::WriteInfoText(text) => self.state.print_text(text),
            Action::Show(rendering) => self.state.show(rendering),
            Action::WriteInputText(text) => {
                text.chars().filter(|c| *c != '\n').for_each(|c| {
                    self.state.input_char(c);
                    self.interpreter.digest(c);
                });
            }
            Action::Exit => return Some(Action::Exit),
            Action::None => {}
        }
        None
    }

    /// Returns true if the input command it's not a builtin command, produces a side-effect otherwise.
    fn is_custom_cmd(&mut self, cmd: &str) -> bool {
        match cmd {
            "clear" => {
                self.state.clear_info_box();
                self.state.clear_input_box();
                false
            }
            "shortcuts" => {
                self.state.clear_info_box();
                self.print_text(SHORTCUTS_HELP);
                false
            }
            _non_executable_cmd => true,
        }
    }

    fn process_event(&mut self, event: Event) -> Option<Action<'a>> {
        match event {
            Event::Key(key) => {
                let action = match key.code {
                    KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.ctrl_action(c)
                    }
                    KeyCode::Char(c) => {
                        self.state.input_char(c);
                        self.interpreter.digest(c)
                    }
                    KeyCode::Enter => self.interpreter.digest('\n'),
                    KeyCode::Backspace => {
                        if !self.state.current_input().is_empty() {
                            self.state.delete();
                            match self.interpreter.delete_last() {
                                Some(Action::Discard) => {
                                    self.state.cursor.effect_on = true;
                                    return Some(Action::None);
                                }
                                Some(other) => return Some(other),
                                None => {}
                            }
                        }
                        Action::Continue
                    }
                    KeyCode::Esc => Action::Exit,
                    KeyCode::Tab => {
                        self.state.select_next();
                        Action::None
                    }
                    KeyCode::BackTab => {
                        self.state.select_previous();
                        Action::None
                    }
                    KeyCode::PageUp => {
                        self.state.scroll_kb(-10);
                        Action::None
                    }
                    KeyCode::PageDown => {
                        self.state.scroll_kb(10);
                        Action::None
                    }
                    KeyCode::Up => {
                        return self.show_previous_command();
                    }
                    KeyCode::Down => {
                        return self.show_following_command();
                    }
                    _ => Action::Continue,
                };
                self.exec_action(action)
            }
            _ => None,
        }
    }

    fn ctrl_action(&mut self, key: char) -> Action<'a> {
        match key {
            'd' => Action::Exit,
            'c' => Action::Discard,
            'v' => self.paste(),
            _ => Action::None,
        }
    }

    #[cfg(feature = "clipboard")]
    fn paste(&mut self) -> Action<'a> {
        use copypasta::ClipboardProvider;

        self.state
            .clipboard
            .as_mut()
            .and_then(|clipboard| clipboard.get_contents().ok())
            .map(Action::WriteInputText)
            .unwrap_or(Action::None)
    }

    #[cfg(not(feature = "clipboard"))]
    fn paste(&mut self) -> Action<'a> {
        log::debug!("clipboard support not enabled");
        Action::None
    }

    /// Prints a text to the output box.
    pub fn print_text<T: Into<Text<'a>>>(&mut self, text: T) {
        self.state.print_text(text.into());
    }

    /// Prints a status message to the output box.
    pub fn print_status(&mut self, level: kbquery_core::Level, message: String) {
        self.state.print_status(level, message);
    }

    /// Show previous command in the input box.
    fn show_previous_command(&mut self) -> Option<Action<'a>> {
        if let Some(prev_cmd) = self.state.cmd_history.get_previous_call() {
            self.show_input_command(prev_cmd);
            Some(Action::Continue)
        } else {
            None
        }
    }

    /// Show next command in the input box.
    fn show_following_command(&mut self) -> Option<Action<'a>> {
        if let Some(following_cmd) = self.state.cmd_history.get_following_call() {
            self.show_input_command(following_cmd);
            Some(Action::Continue)
        } else {
            self.state.clear_input_line();
            self.interpreter.drop_command();
            self.state.cmd_history.reset_call_stack();
            None
        }
    }

    fn show_input_command(&mut self, cmd: String) {
        self.state.clear_input_line();
        self.interpreter.drop_command();
        cmd.chars().for_each(|c| self.state.input_char(c));
        cmd.chars().for_each(|c| {
            self.interpreter.digest(c);
        })
    }
}

fn inner_height(area: Rect) -> u16 {
    area.height.saturating_sub(2)
}

fn table_widths(table: &ResultTable) -> Vec<Constraint> {
    table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{testing::playlist_handle, QueryInterpreter};
    use crossterm::event::KeyEvent;
    use kbquery_core::catalog;

    type App = Application<'static, QueryInterpreter>;

    fn app() -> App {
        let mut app = Application::new(
            QueryInterpreter::new(playlist_handle()),
            KbView::Source("lagu(gemuruh, metal, 96).\n".to_owned()),
        );
        app.state.initial_line();
        app
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let event = Event::Key(KeyEvent::new(code, modifiers));
        let action = app.process_event(event).unwrap_or(Action::None);
        app.main_ev_loop_action(action);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let modifiers = if c.is_uppercase() {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::NONE
            };
            press(app, KeyCode::Char(c), modifiers);
        }
    }

    fn output_lines(app: &App) -> Vec<String> {
        app.state
            .info_box_frame_content(u16::MAX)
            .lines
            .iter()
            .map(|spans| spans.0.iter().map(|span| span.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn enter_runs_the_selected_inference() {
        let mut app = app();
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.state.selected(), 2);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        let entry = catalog::by_number(3).unwrap();
        assert_eq!(entry.query, "wajib_kurasi_manual(X)");
        // header, goal, echoed query and table title, in that order
        assert_eq!(
            output_lines(&app),
            vec![
                entry.label.to_owned(),
                format!("Goal: {}", entry.description),
                "?- wajib_kurasi_manual(X).".to_owned(),
                "Found 4 results:".to_owned(),
            ]
        );
        assert_eq!(app.state.table().map(|t| t.rows.len()), Some(4));
        assert_eq!(
            app.state.cmd_history.get_previous_call().as_deref(),
            Some("run 3")
        );
        assert!(!app.state.terminate);
    }

    #[test]
    fn back_tab_wraps_to_the_last_inference() {
        let mut app = app();
        press(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.state.selected(), catalog::CATALOG.len() - 1);
    }

    #[test]
    fn ctrl_c_discards_the_line() {
        let mut app = app();
        type_text(&mut app, "?foo(X");
        assert_eq!(app.state.current_input(), "?foo(X");
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.state.current_input(), "");
        assert_eq!(app.state.info_box_len(), 0);

        // the interpreter buffer is empty as well: enter runs the selection
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.state.table().map(|t| t.rows.len()), Some(2));
    }

    #[test]
    fn new_command_clears_previous_table() {
        let mut app = app();
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.state.table().is_some());

        type_text(&mut app, "?lagu_ekstrem(gemuruh).");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.state.table().is_none());
        assert_eq!(
            output_lines(&app),
            vec!["?- lagu_ekstrem(gemuruh).", "VALID (true)"]
        );
    }

    #[test]
    fn typed_query_shows_table() {
        let mut app = app();
        type_text(&mut app, "?lagu_ekstrem(X)");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        let table = app.state.table().unwrap();
        assert_eq!(table.columns, vec!["X"]);
        assert_eq!(table.rows[0], vec![Some("gemuruh".to_owned())]);
        assert_eq!(app.state.current_input(), "");
    }

    #[test]
    fn escape_and_ctrl_d_exit() {
        let mut app = app();
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.state.terminate);

        let mut app = self::app();
        press(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(app.state.terminate);

        let mut app = self::app();
        type_text(&mut app, "quit");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.state.terminate);
    }

    #[test]
    fn builtin_commands() {
        let mut app = app();
        type_text(&mut app, "shortcuts");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(output_lines(&app)[0], "Shortcut help:");

        type_text(&mut app, "clear");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.state.info_box_len(), 0);
        assert_eq!(app.state.current_input(), "");
    }
}

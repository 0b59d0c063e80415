//! Main TUI application state and logic

use crate::transpiler::{Options, Strategy, Transpiler};
use crate::ui::panes::{render_code_pane, render_status_bar, CodePane, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Lines moved by PgUp / PgDn
const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// C file shown on the left; reloaded with `r`
    pub input_path: PathBuf,

    /// Where `s` writes the C++ output
    pub output_path: PathBuf,

    pub source_code: String,

    /// Last successful output; kept when a later transpile fails
    pub output_code: String,

    pub options: Options,

    /// Path taken by the last successful transpile
    pub last_strategy: Option<Strategy>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,

    pub status_message: String,
    pub status_is_error: bool,
}

impl App {
    pub fn new(input_path: PathBuf, output_path: PathBuf, source_code: String, options: Options) -> Self {
        App {
            input_path,
            output_path,
            source_code,
            output_code: String::new(),
            options,
            last_strategy: None,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready! Press t to transpile"),
            status_is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI: C source | C++ output, status bar at the bottom
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        let source_title = format!("C Source: {}", self.input_path.display());
        render_code_pane(
            frame,
            columns[0],
            CodePane {
                title: &source_title,
                code: &self.source_code,
                placeholder: "(empty file)",
                is_focused: self.focused_pane == FocusedPane::Source,
            },
            &mut self.source_scroll,
        );

        let output_title = match self.last_strategy {
            Some(strategy) => format!("C++ Output ({})", strategy),
            None => "C++ Output".to_string(),
        };
        render_code_pane(
            frame,
            columns[1],
            CodePane {
                title: &output_title,
                code: &self.output_code,
                placeholder: "Press t to transpile",
                is_focused: self.focused_pane == FocusedPane::Output,
            },
            &mut self.output_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                is_error: self.status_is_error,
                strategy: self.options.strategy,
                last_path: self.last_strategy,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Char('t') | KeyCode::Enter => self.transpile(),
            KeyCode::Char('m') => self.cycle_strategy(),
            KeyCode::Char('s') => self.save_output(),
            KeyCode::Char('r') => self.reload_input(),
            KeyCode::Char('c') => self.clear_output(),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    // Clamped to the content height on the next render
    fn scroll_down(&mut self, lines: usize) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// Transpile the current source; on failure the previous output stays.
    pub fn transpile(&mut self) {
        let transpiler = Transpiler::new(self.options.clone());
        match transpiler.transpile_with_report(&self.source_code) {
            Ok(result) => {
                self.output_code = result.output;
                self.output_scroll = 0;
                self.last_strategy = Some(result.strategy);
                self.set_status(format!(
                    "Transpiled via {} path, {} rule(s) applied",
                    result.strategy,
                    result.report.changed_count()
                ));
            }
            Err(e) => self.set_error(format!("Transpile failed: {}", e)),
        }
    }

    pub fn cycle_strategy(&mut self) {
        self.options.strategy = self.options.strategy.next();
        self.set_status(format!("Strategy: {}", self.options.strategy));
    }

    pub fn save_output(&mut self) {
        if self.output_code.is_empty() {
            self.set_error("Nothing to save, press t to transpile first");
            return;
        }
        match fs::write(&self.output_path, &self.output_code) {
            Ok(()) => {
                tracing::info!(path = %self.output_path.display(), "saved output");
                self.set_status(format!("Saved to {}", self.output_path.display()));
            }
            Err(e) => self.set_error(format!(
                "Cannot write {}: {}",
                self.output_path.display(),
                e
            )),
        }
    }

    /// Re-read the input file; on failure the current source stays.
    pub fn reload_input(&mut self) {
        match fs::read_to_string(&self.input_path) {
            Ok(source) => {
                self.source_code = source;
                self.source_scroll = 0;
                self.set_status(format!("Reloaded {}", self.input_path.display()));
            }
            Err(e) => self.set_error(format!(
                "Cannot read {}: {}",
                self.input_path.display(),
                e
            )),
        }
    }

    pub fn clear_output(&mut self) {
        self.output_code.clear();
        self.output_scroll = 0;
        self.last_strategy = None;
        self.set_status("Output cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    const SOURCE: &str = "#include <stdio.h>\nint main() {\n    printf(\"hi\\n\");\n    return 0;\n}\n";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("c2cpp-{}-{}", std::process::id(), name))
    }

    fn app_with(source: &str) -> App {
        App::new(
            PathBuf::from("hello.c"),
            temp_path("unused.cpp"),
            source.to_string(),
            Options::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_transpile_key_fills_output() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Char('t'));

        assert!(!app.status_is_error);
        assert!(app.output_code.contains("cout << \"hi\" << endl;"));
        assert_eq!(app.last_strategy, Some(Strategy::Direct));
    }

    #[test]
    fn test_failed_transpile_keeps_previous_output() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Enter);
        let previous = app.output_code.clone();

        app.source_code = "   \n".to_string();
        press(&mut app, KeyCode::Char('t'));

        assert!(app.status_is_error);
        assert!(app.status_message.contains("invalid input"));
        assert_eq!(app.output_code, previous);
    }

    #[test]
    fn test_cycle_strategy() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.options.strategy, Strategy::Structural);

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.last_strategy, Some(Strategy::Structural));
        assert!(app.output_code.contains("using namespace std;"));
    }

    #[test]
    fn test_focus_and_scroll() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Output);

        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.output_scroll, PAGE);
        assert_eq!(app.source_scroll, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.output_scroll, PAGE - 1);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.source_scroll, 0);
    }

    #[test]
    fn test_render_clamps_scroll() {
        let mut app = app_with(SOURCE);
        app.source_scroll = 500;
        screen(&mut app, 80, 24);
        assert_eq!(app.source_scroll, 0);
    }

    #[test]
    fn test_render_shows_both_panes() {
        let mut app = app_with(SOURCE);
        let before = screen(&mut app, 120, 20);
        assert!(before.contains("C Source: hello.c"));
        assert!(before.contains("Press t to transpile"));

        press(&mut app, KeyCode::Char('t'));
        let after = screen(&mut app, 120, 20);
        assert!(after.contains("C++ Output (direct)"));
        assert!(after.contains("#include <iostream>"));
    }

    #[test]
    fn test_save_requires_output() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.status_is_error);
    }

    #[test]
    fn test_save_and_reload() {
        let input = temp_path("reload.c");
        let output = temp_path("saved.cpp");
        fs::write(&input, "int *p = NULL;\n").unwrap();

        let mut app = App::new(input.clone(), output.clone(), String::new(), Options::default());
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.source_code, "int *p = NULL;\n");

        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.status_is_error, "{}", app.status_message);
        assert_eq!(fs::read_to_string(&output).unwrap(), "int *p = nullptr;\n");

        let _ = fs::remove_file(input);
        let _ = fs::remove_file(output);
    }

    #[test]
    fn test_reload_missing_file_keeps_source() {
        let mut app = App::new(
            temp_path("does-not-exist.c"),
            temp_path("out.cpp"),
            "int x;".to_string(),
            Options::default(),
        );
        press(&mut app, KeyCode::Char('r'));
        assert!(app.status_is_error);
        assert_eq!(app.source_code, "int x;");
    }

    #[test]
    fn test_clear_and_quit() {
        let mut app = app_with(SOURCE);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('c'));
        assert!(app.output_code.is_empty());
        assert_eq!(app.last_strategy, None);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}

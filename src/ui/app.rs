//! Main TUI application state and logic

use crate::commands::{text, Reply, Session};
use crate::logging;
use crate::memory::errors::MemoryError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Blocks,
    Bytes,
    Pointers,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: bytes -> blocks -> pointers -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Bytes => FocusedPane::Blocks,
            FocusedPane::Blocks => FocusedPane::Pointers,
            FocusedPane::Pointers => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Bytes,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Bytes => FocusedPane::Output,
            FocusedPane::Blocks => FocusedPane::Bytes,
            FocusedPane::Pointers => FocusedPane::Blocks,
            FocusedPane::Output => FocusedPane::Pointers,
        }
    }
}

/// What the prompt is currently reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Command,
    /// `new_pointer` hit an existing name; the next line answers the question
    ConfirmOverwrite { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Command,
    Success,
    Error,
    Warning,
    Info,
    Log,
}

/// One line in the output pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

/// The main application state
pub struct App {
    /// The allocator and its command table
    pub session: Session,

    /// Text typed at the prompt
    pub input: String,

    pub input_mode: InputMode,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub blocks_scroll: usize,
    pub bytes_scroll: usize,
    pub pointers_scroll: usize,
    pub output_scroll: usize,

    /// Everything shown in the output pane, oldest first
    pub output: Vec<OutputLine>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            input: String::new(),
            input_mode: InputMode::Command,
            focused_pane: FocusedPane::Bytes,
            blocks_scroll: 0,
            bytes_scroll: 0,
            pointers_scroll: 0,
            output_scroll: 0,
            output: Vec::new(),
            should_quit: false,
            status_message: String::from("Ready!"),
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

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, then the prompt and the status bar
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Bytes (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        // Right column: Blocks (top) | Pointers (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let memory = &self.session.memory;

        super::panes::render_bytes_pane(
            frame,
            left_rows[0],
            &memory.list_bytes(),
            self.focused_pane == FocusedPane::Bytes,
            &mut self.bytes_scroll,
        );

        super::panes::render_output_pane(
            frame,
            left_rows[1],
            &self.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_blocks_pane(
            frame,
            right_rows[0],
            &memory.list_blocks(),
            memory.pointers(),
            self.focused_pane == FocusedPane::Blocks,
            &mut self.blocks_scroll,
        );

        super::panes::render_pointers_pane(
            frame,
            right_rows[1],
            memory,
            self.focused_pane == FocusedPane::Pointers,
            &mut self.pointers_scroll,
        );

        super::panes::render_prompt(frame, main_chunks[1], &self.input, &self.input_mode);

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            &memory.stats(),
            matches!(self.input_mode, InputMode::ConfirmOverwrite { .. }),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(10);
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.submit(&line);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Blocks => &mut self.blocks_scroll,
            FocusedPane::Bytes => &mut self.bytes_scroll,
            FocusedPane::Pointers => &mut self.pointers_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }

    /// Run one line from the prompt, either a command or the answer to a
    /// pending overwrite question
    pub fn submit(&mut self, line: &str) {
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Command);
        match mode {
            InputMode::Command => {
                if line.trim().is_empty() {
                    return;
                }
                self.push(OutputKind::Command, format!(">>> {}", line.trim()));
                let result = self.session.execute(line);
                self.show_result(result);
            }
            InputMode::ConfirmOverwrite { name } => {
                self.push(OutputKind::Command, format!("... {}", line.trim()));
                if line.trim().eq_ignore_ascii_case("c") {
                    let result = self.session.confirm_overwrite(&name);
                    self.show_result(result);
                } else {
                    self.push(OutputKind::Info, "Keeping previous pointer.".to_string());
                    self.status_message = format!("Kept pointer {}", name);
                }
            }
        }

        for record in logging::drain() {
            self.push(
                OutputKind::Log,
                format!("[{}] {}", record.level, record.message),
            );
        }

        // Auto-scroll output to bottom
        self.output_scroll = usize::MAX;
    }

    fn show_result(&mut self, result: Result<Reply, MemoryError>) {
        match result {
            Ok(Reply::Success(message)) => {
                self.status_message = message.clone();
                self.push(OutputKind::Success, format!("[SUCCESS] {}", message));
            }
            Ok(Reply::Notice(message)) => {
                self.push(OutputKind::Info, message);
            }
            Ok(Reply::ConfirmOverwrite { name }) => {
                let question = text::render_reply(&Reply::ConfirmOverwrite { name: name.clone() });
                for line in question {
                    self.push(OutputKind::Warning, line);
                }
                self.status_message = "Enter c to continue or anything else to cancel".to_string();
                self.input_mode = InputMode::ConfirmOverwrite { name };
            }
            Ok(Reply::Exit) => {
                self.should_quit = true;
            }
            Ok(Reply::Blocks(blocks)) => {
                self.focused_pane = FocusedPane::Blocks;
                self.status_message = format!("{} block(s)", blocks.len());
            }
            Ok(Reply::Bytes(bytes)) => {
                self.focused_pane = FocusedPane::Bytes;
                self.status_message = format!("{} byte(s)", bytes.len());
            }
            Ok(Reply::Pointers(pointers)) => {
                self.focused_pane = FocusedPane::Pointers;
                self.status_message = format!("{} pointer(s)", pointers.len());
            }
            Ok(reply @ (Reply::Help(_) | Reply::Stats(_))) => {
                for line in text::render_reply(&reply) {
                    self.push(OutputKind::Info, line);
                }
            }
            Err(err) => {
                self.status_message = format!("Error ({})", err.kind());
                self.push(OutputKind::Error, text::render_error(&err));
            }
        }
    }

    fn push(&mut self, kind: OutputKind, text: String) {
        self.output.push(OutputLine { kind, text });
    }
}

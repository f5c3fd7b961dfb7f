//! Command prompt

use crate::ui::app::InputMode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PROMPT: &str = ">>> ";

/// Render the input line and place the cursor after the typed text
pub fn render_prompt(frame: &mut Frame, area: Rect, input: &str, mode: &InputMode) {
    let (title, color) = match mode {
        InputMode::Command => (" Command ".to_string(), DEFAULT_THEME.border_focused),
        InputMode::ConfirmOverwrite { name } => (
            format!(
                " Overwrite pointer {}? Enter c to continue or anything else to cancel ",
                name
            ),
            DEFAULT_THEME.warning,
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(input, Style::default().fg(DEFAULT_THEME.fg)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    // Keep the cursor inside the box even for overlong input
    let max_x = area.right().saturating_sub(2);
    let typed = (PROMPT.len() + input.chars().count()).min(area.width as usize) as u16;
    let x = (area.x + 1).saturating_add(typed).min(max_x);
    frame.set_cursor_position(Position::new(x, area.y + 1));
}

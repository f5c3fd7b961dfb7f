//! Command output pane rendering

use super::{clamp_scroll, pane_block};
use crate::ui::app::{OutputKind, OutputLine};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[OutputLine],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output) type help and press Enter")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(lines.len(), area, scroll_offset);

    let items: Vec<ListItem> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.text.as_str()).style(line_style(line.kind)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn line_style(kind: OutputKind) -> Style {
    match kind {
        OutputKind::Command => Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
        OutputKind::Success => Style::default().fg(DEFAULT_THEME.success),
        OutputKind::Error => Style::default().fg(DEFAULT_THEME.error),
        OutputKind::Warning => Style::default().fg(DEFAULT_THEME.warning),
        OutputKind::Info => Style::default().fg(DEFAULT_THEME.fg),
        OutputKind::Log => Style::default().fg(DEFAULT_THEME.comment),
    }
}

//! Declared pointers pane

use super::{clamp_scroll, pane_block};
use crate::memory::Memory;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render every declared pointer with the block it currently resolves to
pub fn render_pointers_pane(
    frame: &mut Frame,
    area: Rect,
    memory: &Memory,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Pointers ({}) ", memory.pointers().len());
    let block = pane_block(&title, is_focused);

    let mut pointers: Vec<_> = memory.pointers().iter().collect();
    if pointers.is_empty() {
        let paragraph = Paragraph::new("(no pointers declared)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }
    pointers.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(pointers.len(), area, scroll_offset);

    let items: Vec<ListItem> = pointers
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(name, ptr)| {
            let target = if !ptr.is_bound() {
                Span::styled("unbound", Style::default().fg(DEFAULT_THEME.comment))
            } else {
                match memory.table().find_block(ptr.start_index) {
                    Some((index, found)) if !found.is_free() => Span::styled(
                        format!("{} (block #{}, {} B)", ptr.start_index, index + 1, found.size),
                        Style::default().fg(DEFAULT_THEME.used),
                    ),
                    _ => Span::styled(
                        format!("{} (dangling)", ptr.start_index),
                        Style::default().fg(DEFAULT_THEME.error),
                    ),
                }
            };

            ListItem::new(Line::from(vec![
                Span::styled(name.to_string(), Style::default().fg(DEFAULT_THEME.pointer)),
                Span::styled(" -> ", Style::default().fg(DEFAULT_THEME.comment)),
                target,
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

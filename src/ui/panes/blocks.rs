//! Block table pane

use super::{clamp_scroll, pane_block};
use crate::memory::pointer::PointerRegistry;
use crate::memory::BlockInfo;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Render the block table, one row per block in address order
pub fn render_blocks_pane(
    frame: &mut Frame,
    area: Rect,
    blocks: &[BlockInfo],
    pointers: &PointerRegistry,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Blocks ({}) ", blocks.len());
    let block = pane_block(&title, is_focused).padding(Padding::new(1, 0, 0, 0));
    let names = pointers.names_by_offset();

    let visible_height = clamp_scroll(blocks.len(), area, scroll_offset);

    let items: Vec<ListItem> = blocks
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|info| {
            let (state, color) = if info.free {
                ("free", DEFAULT_THEME.free)
            } else if info.initialized {
                ("used", DEFAULT_THEME.used)
            } else {
                ("uninit", DEFAULT_THEME.uninitialized)
            };

            let mut spans = vec![
                Span::styled(
                    format!("#{:<3}", info.index + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!(
                        "[{:>4}..{:<4}) ",
                        info.start_index,
                        info.start_index + info.size
                    ),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Span::styled(
                    format!("{:>5} B ", info.size),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Span::styled(
                    format!("{:<6}", state),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ];

            // Only allocated blocks can be reached through a pointer
            if !info.free {
                if let Some(labels) = names.get(&info.start_index) {
                    spans.push(Span::styled(
                        format!(" <- {}", labels.join(", ")),
                        Style::default().fg(DEFAULT_THEME.pointer),
                    ));
                }
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

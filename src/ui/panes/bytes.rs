//! Arena byte grid

use super::{clamp_scroll, pane_block};
use crate::commands::text::byte_symbol;
use crate::memory::ByteView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Offset column plus separator
const OFFSET_WIDTH: usize = 6;
/// Two hex digits plus a space
const CELL_WIDTH: usize = 3;

/// How many bytes fit on one row of a pane `area_width` columns wide.
/// Rounded down to a multiple of 8 once there is room for 8.
pub fn bytes_per_row(area_width: u16) -> usize {
    let inner = (area_width as usize).saturating_sub(2 + OFFSET_WIDTH);
    let cells = (inner / CELL_WIDTH).max(1);
    if cells >= 8 {
        cells - cells % 8
    } else {
        cells
    }
}

/// Render the arena as rows of colored byte cells
pub fn render_bytes_pane(
    frame: &mut Frame,
    area: Rect,
    bytes: &[ByteView],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Bytes ({}) ", bytes.len());
    let legend = Line::from(vec![
        Span::styled(" __ free ", Style::default().fg(DEFAULT_THEME.free)),
        Span::styled(" ** uninitialized ", Style::default().fg(DEFAULT_THEME.uninitialized)),
        Span::styled(" XX value ", Style::default().fg(DEFAULT_THEME.used)),
    ]);
    let block = pane_block(&title, is_focused).title_bottom(legend);

    let per_row = bytes_per_row(area.width);
    let rows: Vec<&[ByteView]> = bytes.chunks(per_row).collect();
    let visible_height = clamp_scroll(rows.len(), area, scroll_offset);

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(row, chunk)| {
            let mut spans = vec![Span::styled(
                format!("{:04X}  ", row * per_row),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            for &view in chunk.iter() {
                let color = match view {
                    ByteView::Free => DEFAULT_THEME.free,
                    ByteView::Uninitialized => DEFAULT_THEME.uninitialized,
                    ByteView::Value(_) => DEFAULT_THEME.used,
                };
                spans.push(Span::styled(
                    format!("{} ", byte_symbol(view)),
                    Style::default().fg(color),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_row() {
        assert_eq!(bytes_per_row(0), 1);
        assert_eq!(bytes_per_row(20), 4);
        assert_eq!(bytes_per_row(60), 16);
        assert_eq!(bytes_per_row(100), 24);
    }
}

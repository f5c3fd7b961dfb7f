//! TUI pane rendering modules
//!
//! Each pane is a stateless `render_*` function that draws one view of the
//! session. Scrollable panes take a `&mut usize` offset owned by the app and
//! clamp it to the content.
//!
//! # Pane Modules
//!
//! - [`blocks`]: block table, one row per block, labelled with pointer names
//! - [`bytes`]: hex grid of the arena with `__` free and `**` uninitialized
//! - [`pointers`]: declared pointers and the block each one resolves to
//! - [`output`]: command echo, replies, errors and captured log records
//! - [`prompt`]: command line input, or the overwrite confirmation
//! - [`status`]: arena statistics and keybindings

pub mod blocks;
pub mod bytes;
pub mod output;
pub mod pointers;
pub mod prompt;
pub mod status;

pub use blocks::render_blocks_pane;
pub use bytes::render_bytes_pane;
pub use output::render_output_pane;
pub use pointers::render_pointers_pane;
pub use prompt::render_prompt;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered pane frame, highlighted when focused
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` so the last row stays on screen and return the
/// number of visible rows
pub(crate) fn clamp_scroll(total_rows: usize, area: Rect, scroll_offset: &mut usize) -> usize {
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_rows > visible_height {
        *scroll_offset = (*scroll_offset).min(total_rows - visible_height);
    } else {
        *scroll_offset = 0;
    }

    visible_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let area = Rect::new(0, 0, 20, 7); // 5 visible rows
        let mut offset = usize::MAX;
        assert_eq!(clamp_scroll(12, area, &mut offset), 5);
        assert_eq!(offset, 7);

        let mut offset = 3;
        clamp_scroll(4, area, &mut offset);
        assert_eq!(offset, 0);
    }
}

//! Status bar rendering with arena statistics and keybindings

use crate::memory::MemoryStats;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `confirming` switches the badge while an overwrite question is pending.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    stats: &MemoryStats,
    confirming: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.status_bg);
    let badge = if confirming {
        Span::styled(
            " CONFIRM ",
            Style::default()
                .bg(DEFAULT_THEME.warning)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!(" {} B ", stats.size),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let left_spans = vec![
        badge,
        Span::styled(
            format!(
                " blocks {}/{}  used {}  free {}  largest {} ",
                stats.blocks, stats.capacity, stats.used_bytes, stats.free_bytes, stats.largest_free
            ),
            bar.fg(DEFAULT_THEME.fg),
        ),
        Span::styled("│", bar.fg(DEFAULT_THEME.comment)),
        Span::styled(format!(" {} ", message), bar.fg(DEFAULT_THEME.secondary)),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    // Right side: keybinds
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let right_spans = vec![
        Span::styled(" ⇥ ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ ", key_style),
        Span::styled(" run ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" esc ", key_style),
        Span::styled(" quit ", desc_style),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}

//! Status bar rendering with keybindings and transpiler state

use crate::transpiler::Strategy;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub is_error: bool,
    /// Strategy that will be requested on the next transpile
    pub strategy: Strategy,
    /// Path the last successful transpile took; an auto run that fell back
    /// to direct rewrite gets an orange badge
    pub last_path: Option<Strategy>,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let fell_back = data
        .last_path
        .is_some_and(|path| data.strategy == Strategy::Auto && path == Strategy::Direct);
    let badge = match data.last_path {
        Some(path) if path != data.strategy => format!(" {} → {} ", data.strategy, path),
        _ => format!(" {} ", data.strategy),
    };

    let left_spans = vec![
        Span::styled(
            badge.to_uppercase(),
            Style::default()
                .bg(if data.is_error {
                    DEFAULT_THEME.error
                } else if fell_back {
                    DEFAULT_THEME.secondary
                } else if data.last_path.is_some() {
                    DEFAULT_THEME.success
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", bar.fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!(" {} ", data.message),
            bar.fg(if data.is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let bindings = [
        ("t", "transpile"),
        ("m", "mode"),
        ("s", "save"),
        ("r", "reload"),
        ("c", "clear"),
        ("⇥", "focus"),
        ("q", "quit"),
    ];
    let mut right_spans = Vec::new();
    for (idx, (key, desc)) in bindings.iter().enumerate() {
        if idx > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn badge_bg(data: &StatusRenderData<'_>) -> Option<Color> {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|f| render_status_bar(f, f.area(), data))
            .unwrap();
        terminal.backend().buffer().content[1].style().bg
    }

    #[test]
    fn test_badge_colors() {
        let mut data = StatusRenderData {
            message: "Ready",
            is_error: false,
            strategy: Strategy::Auto,
            last_path: None,
        };
        assert_eq!(badge_bg(&data), Some(DEFAULT_THEME.primary));

        data.last_path = Some(Strategy::Structural);
        assert_eq!(badge_bg(&data), Some(DEFAULT_THEME.success));

        data.last_path = Some(Strategy::Direct);
        assert_eq!(badge_bg(&data), Some(DEFAULT_THEME.secondary));

        data.is_error = true;
        assert_eq!(badge_bg(&data), Some(DEFAULT_THEME.error));
    }
}

//! Top-level UI layout: one view at a time plus a status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod overlays;
pub mod rules_panel;
pub mod status_bar;
pub mod ticker_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, View};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_view(f, main_area, app);
    status_bar::render(f, status_area, app);

    if app.overlay == Overlay::Range {
        overlays::render_range(f, main_area, &app.range_input);
    }
}

fn draw_view(f: &mut Frame, area: Rect, app: &AppState) {
    let view = app.view;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}/{}] ", view.label(), view.index() + 1, View::ALL.len()))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match view {
        View::Charts => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(ticker_panel::WIDTH), Constraint::Min(20)])
                .split(inner);
            ticker_panel::render(f, cols[0], app);
            chart_panel::render(f, cols[1], app);
        }
        View::Rules => rules_panel::render(f, inner, app),
        View::Help => help_panel::render(f, inner),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    use crate::app::tests::test_app;

    /// Flatten a buffer into one string, rows separated by newlines.
    pub(crate) fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                if let Some(cell) = buf.cell((buf.area.x + x, buf.area.y + y)) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn render_app(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn every_view_draws() {
        let (mut app, _rx, _tx) = test_app();
        for view in View::ALL {
            app.view = view;
            let text = render_app(&app, 100, 30);
            assert!(text.contains(view.label()), "{} missing", view.label());
        }
    }

    #[test]
    fn range_overlay_draws_on_top() {
        let (mut app, _rx, _tx) = test_app();
        app.overlay = Overlay::Range;
        app.range_input = "2024-01-01".into();
        let text = render_app(&app, 100, 30);
        assert!(text.contains("Custom Range"));
        assert!(text.contains("2024-01-01"));
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 20, area);
        assert_eq!(r.width, 50);
        assert!(r.x > 0 && r.y > 0);
    }
}

//! Bottom status bar: current selection, pending work, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let sel = &app.selection;
    let overlays = if sel.overlays.is_empty() {
        "none".to_string()
    } else {
        sel.overlays
            .iter()
            .map(|o| o.short_label())
            .collect::<Vec<_>>()
            .join("+")
    };

    let mut spans: Vec<Span> = vec![
        Span::styled(" Tab:view ?:help q:quit", theme::muted()),
        Span::raw(" | "),
        Span::styled(sel.window.to_string(), theme::accent()),
        Span::raw(" | "),
        Span::styled(sel.kind.label(), theme::accent()),
        Span::raw(" | "),
        Span::styled(overlays, theme::neutral()),
    ];

    if app.pending > 0 {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("loading…", theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use crate::app::tests::test_app;
    use crate::ui::tests::render_app;
    use stockdash_core::chart::OverlayKind;

    #[test]
    fn shows_selection_and_message() {
        let (mut app, _rx, _tx) = test_app();
        app.selection.overlays.toggle(OverlayKind::BollingerBands);
        app.selection.overlays.toggle(OverlayKind::MovingAverage);
        app.set_warning("1 of 2 tickers unavailable");
        let text = render_app(&app, 160, 10);
        assert!(text.contains("Year view"));
        assert!(text.contains("MA+BB"));
        assert!(text.contains("1 of 2 tickers unavailable"));
    }

    #[test]
    fn pending_shows_loading() {
        let (mut app, _rx, _tx) = test_app();
        app.pending = 2;
        assert!(render_app(&app, 160, 10).contains("loading"));
    }
}

//! Ticker picker: the universe as a list, selected symbols marked.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub const WIDTH: u16 = 22;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let list = &app.tickers;
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::muted())
        .title(format!(" Tickers {}/{} ", list.selected.len(), list.universe.len()))
        .title_style(theme::accent());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if list.universe.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No tickers loaded", theme::warning())),
            inner,
        );
        return;
    }

    // Keep the cursor on screen.
    let height = inner.height as usize;
    let skip = list.cursor.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = list
        .universe
        .tickers()
        .iter()
        .enumerate()
        .skip(skip)
        .take(height)
        .map(|(i, info)| {
            let picked = list.is_selected(&info.symbol);
            let marker = if picked { "[x] " } else { "[ ] " };
            let style = if i == list.cursor {
                theme::cursor()
            } else if picked {
                theme::positive().add_modifier(Modifier::BOLD)
            } else {
                theme::text()
            };
            let mut spans = vec![Span::styled(marker, style), Span::styled(info.symbol.clone(), style)];
            if info.label != info.symbol {
                spans.push(Span::styled(format!(" {}", info.label), theme::muted()));
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

//! Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "Tab / Shift+Tab", "Cycle views forward / back");
    key(&mut lines, "?", "Open this help");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Charts");
    key(&mut lines, "j / k", "Move ticker cursor");
    key(&mut lines, "Space / Enter", "Select or deselect ticker");
    key(&mut lines, "[ / ]", "Previous / next ticker chart");
    key(&mut lines, "w M 6 9 h y", "Week, month, 60, 90, 180 days, year");
    key(&mut lines, "g", "Custom date range");
    key(&mut lines, "c / l / o", "Candlestick / line / OHLC graph");
    key(&mut lines, "m b e p v", "Toggle MA, Bollinger, EMA, pivots, VWAP");
    key(&mut lines, "x", "EMA vs SMA comparison (until the next key)");
    key(&mut lines, "f", "Refetch prices");
    lines.push(Line::from(""));

    section(&mut lines, "Rules");
    key(&mut lines, "h / l", "Choose indicator (on the selector row)");
    key(&mut lines, "j / k", "Move between bound inputs");
    key(&mut lines, "0-9 . -", "Type a bound");
    key(&mut lines, "Enter", "Set the rules");
    key(&mut lines, "r", "Show / hide current rules");
    key(&mut lines, "f", "Reload the reference series");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

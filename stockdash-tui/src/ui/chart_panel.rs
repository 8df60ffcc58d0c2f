//! Chart area: one ticker's figure per page.

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use stockdash_core::chart::{Figure, LineTrace, ScatterTrace, Trace};
use stockdash_core::reactor::{Render, TickerChart};

use crate::app::AppState;
use crate::panels::PriceChart;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.render {
        None => render_message(f, area, "Select tickers with Space to draw charts.", theme::muted()),
        Some(Render::Prompt(msg)) => render_message(f, area, msg, theme::warning()),
        Some(Render::Charts(charts)) => {
            let Some(chart) = charts.get(app.page) else {
                render_message(f, area, "Nothing to draw.", theme::muted());
                return;
            };
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(3)])
                .split(area);
            render_pager(f, rows[0], charts, app.page);
            render_ticker(f, rows[1], chart);
        }
    }
}

fn render_message(f: &mut Frame, area: Rect, msg: &str, style: Style) {
    let lines = vec![Line::from(""), Line::from(Span::styled(msg.to_string(), style))];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_pager(f: &mut Frame, area: Rect, charts: &[TickerChart], page: usize) {
    let mut spans = vec![Span::styled(
        format!(" {}/{} ", page + 1, charts.len()),
        theme::muted(),
    )];
    for (i, chart) in charts.iter().enumerate() {
        let style = match (i == page, chart.outcome.is_ok()) {
            (true, _) => theme::accent_bold(),
            (false, true) => theme::text(),
            (false, false) => theme::negative(),
        };
        spans.push(Span::styled(format!(" {} ", chart.ticker), style));
    }
    spans.push(Span::styled(" [ ] page", theme::muted()));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_ticker(f: &mut Frame, area: Rect, chart: &TickerChart) {
    match &chart.outcome {
        Err(e) => render_message(f, area, &format!("{}: {e}", chart.ticker), theme::negative()),
        Ok(fig) if PriceChart::supports(fig) => f.render_widget(PriceChart::new(fig), area),
        Ok(fig) => render_line_figure(f, area, fig),
    }
}

/// Line graphs and the EMA-vs-SMA scatter, drawn with braille datasets.
fn render_line_figure(f: &mut Frame, area: Rect, fig: &Figure) {
    let Some((y_lo, y_hi)) = fig.y_bounds() else {
        render_message(f, area, &format!("{}: no data in window", fig.title), theme::muted());
        return;
    };

    let mut data: Vec<(String, Vec<(f64, f64)>, GraphType)> = Vec::new();
    let mut dates: Option<&[NaiveDate]> = None;
    for trace in &fig.traces {
        match trace {
            Trace::Line(line) => {
                dates.get_or_insert(line.x.as_slice());
                data.push((line.name.clone(), line_points(line), GraphType::Line));
            }
            Trace::Scatter(scatter) => {
                data.push((scatter.name.clone(), scatter_points(scatter), GraphType::Scatter));
            }
            Trace::Candlestick(_) | Trace::Ohlc(_) => {}
        }
    }

    let (x_lo, x_hi) = match dates {
        Some(d) => (0.0, d.len().saturating_sub(1).max(1) as f64),
        None => data
            .iter()
            .flat_map(|(_, pts, _)| pts.iter().map(|p| p.0))
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })
            .unwrap_or((0.0, 1.0)),
    };
    let pad = ((y_hi - y_lo) * 0.05).max(0.5);
    let (y_lo, y_hi) = (y_lo - pad, y_hi + pad);

    let datasets: Vec<Dataset> = data
        .iter()
        .enumerate()
        .map(|(i, (name, points, graph))| {
            let color = if i == 0 { theme::ACCENT } else { theme::series_color(i - 1) };
            Dataset::default()
                .name(name.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(color))
                .graph_type(*graph)
                .data(points)
        })
        .collect();

    let x_labels = match dates {
        Some(d) => vec![
            Span::styled(d.first().map(|d| d.to_string()).unwrap_or_default(), theme::muted()),
            Span::styled(d.last().map(|d| d.to_string()).unwrap_or_default(), theme::muted()),
        ],
        None => vec![
            Span::styled(format!("{x_lo:.2}"), theme::muted()),
            Span::styled(format!("{x_hi:.2}"), theme::muted()),
        ],
    };
    let x_title = fig.layout.x_title.clone().unwrap_or_else(|| "Date".to_string());
    let y_title = fig.layout.y_title.clone().unwrap_or_else(|| "Price".to_string());

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", fig.title), theme::accent_bold())),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(x_title, theme::muted()))
                .style(theme::muted())
                .bounds([x_lo, x_hi])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title, theme::muted()))
                .style(theme::muted())
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::styled(format!("{y_lo:.2}"), theme::muted()),
                    Span::styled(format!("{y_hi:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// Row index against value; gaps are skipped.
fn line_points(line: &LineTrace) -> Vec<(f64, f64)> {
    line.y
        .iter()
        .enumerate()
        .filter_map(|(i, y)| y.map(|y| (i as f64, y)))
        .collect()
}

fn scatter_points(scatter: &ScatterTrace) -> Vec<(f64, f64)> {
    scatter
        .x
        .iter()
        .zip(&scatter.y)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{sample_render, sample_series, test_app};
    use crate::ui::tests::render_app;
    use stockdash_core::chart::{compose, compose_comparison, ChartKind, OverlaySet};

    #[test]
    fn empty_state_prompts_for_tickers() {
        let (app, _rx, _tx) = test_app();
        assert!(render_app(&app, 120, 30).contains("Select tickers"));
    }

    #[test]
    fn prompt_render_is_shown() {
        let (mut app, _rx, _tx) = test_app();
        app.render = Some(Render::Prompt("Select a stock ticker.".into()));
        assert!(render_app(&app, 120, 30).contains("Select a stock ticker."));
    }

    #[test]
    fn failed_ticker_page_shows_error() {
        let (mut app, _rx, _tx) = test_app();
        app.render = Some(sample_render(ChartKind::Candlestick, &OverlaySet::new()));
        let first = render_app(&app, 120, 30);
        assert!(first.contains("1/2"));
        assert!(first.contains("AAPL | 40 bars"));

        app.page = 1;
        let second = render_app(&app, 120, 30);
        assert!(second.contains("ZZZZ"));
        assert!(second.contains("no rows"));
    }

    #[test]
    fn line_and_comparison_figures_draw() {
        let (mut app, _rx, _tx) = test_app();
        let series = sample_series("AAPL", 40);
        for fig in [
            compose(&series, ChartKind::Line, &OverlaySet::new()),
            compose_comparison(&series),
        ] {
            app.render = Some(Render::Charts(vec![TickerChart {
                ticker: "AAPL".into(),
                outcome: Ok(fig),
            }]));
            let text = render_app(&app, 120, 30);
            assert!(text.contains("AAPL"));
        }
    }

    #[test]
    fn scatter_points_skip_gaps() {
        let fig = compose_comparison(&sample_series("AAPL", 25));
        let Trace::Scatter(s) = &fig.traces[0] else {
            panic!("expected scatter");
        };
        // The 20-row mean is the first to be defined.
        assert_eq!(scatter_points(s).len(), 25 - 19);
    }
}

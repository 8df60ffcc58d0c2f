//! Rule builder: pick an indicator, type bounds, review the current rules.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use stockdash_core::rules::{RuleMetric, RuleTable, TABLE_COLUMNS};

use crate::app::{AppState, RulesPanelState};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rules = &app.rules;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_setter(f, cols[0], rules);
    render_current(f, cols[1], rules);
}

fn render_setter(f: &mut Frame, area: Rect, rules: &RulesPanelState) {
    let (start, end) = rules.book.range();
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Reference: ", theme::muted()),
            Span::styled(rules.book.symbol().to_string(), theme::accent()),
            Span::styled(format!("  {start} to {end}"), theme::muted()),
        ]),
        Line::from(""),
    ];

    let selector_style = if rules.field == 0 { theme::cursor() } else { theme::text() };
    let metric_label = rules.metric.map_or("Select indicator", RuleMetric::label);
    lines.push(Line::from(vec![
        Span::styled("Indicator  ", theme::muted()),
        Span::styled(format!("< {metric_label} >"), selector_style),
    ]));
    lines.push(Line::from(""));

    if let Some(metric) = rules.metric {
        let snapshot = rules.snapshot(metric);
        let slots = RulesPanelState::slots(metric);
        for (i, (&slot, label)) in slots.iter().zip(metric.row_labels()).enumerate() {
            let focused = rules.field == i + 1;
            let input_style = if focused { theme::cursor() } else { theme::accent() };
            let current = match snapshot.and_then(|s| s.rows.get(i)) {
                Some((_, v)) if v.is_finite() => format!("{v:.2}"),
                Some(_) => "n/a".to_string(),
                None if rules.loading => "…".to_string(),
                None => "-".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{label:<18}"), theme::text()),
                Span::styled(format!("[{:<10}]", rules.inputs[slot]), input_style),
                Span::styled(format!("  current {current}"), theme::muted()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "[h/l]indicator [j/k]field [Enter]set rules [r]view rules",
        theme::muted(),
    )));

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::muted())
        .title(" Set rules ")
        .title_style(theme::accent());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_current(f: &mut Frame, area: Rect, rules: &RulesPanelState) {
    let block = Block::default()
        .title(" Current rules ")
        .title_style(theme::accent());

    if !rules.show_rules {
        let hint = Line::from(Span::styled("Press r to view the current rules.", theme::muted()));
        f.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    match rules.table() {
        Ok(table) => f.render_widget(rule_table(&table).block(block), area),
        Err(e) => {
            let alert = Line::from(Span::styled(e.to_string(), theme::warning()));
            f.render_widget(Paragraph::new(alert).block(block), area);
        }
    }
}

fn rule_table(table: &RuleTable) -> Table<'static> {
    let header = Row::new(TABLE_COLUMNS.map(|c| Cell::from(c).style(theme::accent_bold())));
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(*label).style(theme::text()),
                Cell::from(format!("{value}")).style(theme::positive()),
            ])
        })
        .collect();
    Table::new(rows, [Constraint::Length(18), Constraint::Min(8)]).header(header)
}

#[cfg(test)]
mod tests {
    use crate::app::tests::{sample_series, test_app};
    use crate::app::View;
    use crate::ui::tests::render_app;
    use crate::worker::WorkerResponse;

    #[test]
    fn no_metric_alert_when_viewing() {
        let (mut app, _rx, _tx) = test_app();
        app.view = View::Rules;
        app.rules.show_rules = true;
        let text = render_app(&app, 140, 30);
        assert!(text.contains("Please select an indicator first"));
    }

    #[test]
    fn table_lists_committed_bounds() {
        let (mut app, _rx, _tx) = test_app();
        app.view = View::Rules;
        app.rules.cycle_metric(true);
        app.rules.inputs = ["3".into(), "2".into(), "1".into()];
        app.commit_rules();
        app.rules.show_rules = true;
        let text = render_app(&app, 140, 30);
        assert!(text.contains("Indicator"));
        assert!(text.contains("Current Rules"));
        assert!(text.contains("Upper band limit"));
        assert!(text.contains("mean band limit"));
    }

    #[test]
    fn inputs_show_current_values() {
        let (mut app, _rx, _tx) = test_app();
        app.view = View::Rules;
        app.rules.cycle_metric(true);
        app.rules.cycle_metric(true);
        app.apply(WorkerResponse::RuleSeries(Ok(sample_series("AAPL", 60))));
        let text = render_app(&app, 140, 30);
        assert!(text.contains("Moving average"));
        assert!(text.contains("Upper limit"));
        assert!(text.contains("current "));
        assert!(!text.contains("mean band limit"));
    }
}

//! Price chart widget - candlestick or OHLC bars with indicator lines.
//!
//! Renders via direct buffer writes:
//! - Each row of the series = 1 terminal column (most recent rows win)
//! - Candles: block body between open and close, '│' wicks to high/low
//! - OHLC bars: '│' from low to high, '┤' at the open, '├' at the close
//! - Indicator traces: '•' per column in the series palette, legend on the last row

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use stockdash_core::chart::{Figure, LineTrace, OhlcTrace, Trace};

use crate::theme;

const LABEL_WIDTH: u16 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarStyle {
    Candle,
    Ohlc,
}

/// Candlestick/OHLC figure widget.
pub struct PriceChart<'a> {
    figure: &'a Figure,
}

impl<'a> PriceChart<'a> {
    pub fn new(figure: &'a Figure) -> Self {
        Self { figure }
    }

    /// Whether this widget knows how to draw the figure's base trace.
    pub fn supports(figure: &Figure) -> bool {
        matches!(
            figure.traces.first(),
            Some(Trace::Candlestick(_) | Trace::Ohlc(_))
        )
    }

    fn base(&self) -> Option<(&'a OhlcTrace, BarStyle)> {
        match self.figure.traces.first() {
            Some(Trace::Candlestick(t)) => Some((t, BarStyle::Candle)),
            Some(Trace::Ohlc(t)) => Some((t, BarStyle::Ohlc)),
            _ => None,
        }
    }

    fn lines(&self) -> impl Iterator<Item = &'a LineTrace> {
        self.figure.traces.iter().filter_map(|t| match t {
            Trace::Line(l) => Some(l),
            _ => None,
        })
    }
}

/// Map a price to a row in the plot area (0 = top).
fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
    if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
        return 0;
    }
    let frac = (price - y_min) / (y_max - y_min);
    let max_row = plot_height.saturating_sub(1) as f64;
    (max_row * (1.0 - frac)).round().clamp(0.0, max_row) as u16
}

impl<'a> Widget for PriceChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((base, bar_style)) = self.base().filter(|(b, _)| !b.x.is_empty()) else {
            Block::default()
                .title(format!(" {} [No Data] ", self.figure.title))
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .style(Style::default().bg(theme::BACKGROUND))
                .render(area, buf);
            return;
        };

        let Some((lo, hi)) = self.figure.y_bounds() else {
            return;
        };
        let range = hi - lo;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let (y_lower, y_upper) = (lo - pad, hi + pad);

        let up_color = theme::figure_color(base.increasing_color.as_deref(), theme::POSITIVE);
        let down_color = theme::figure_color(base.decreasing_color.as_deref(), theme::NEGATIVE);

        let first = base.x.first().map(|d| d.to_string()).unwrap_or_default();
        let last = base.x.last().map(|d| d.to_string()).unwrap_or_default();
        let title = format!(
            " {} | {} bars | {first} → {last} ",
            self.figure.title,
            base.x.len()
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::accent())
            .style(Style::default().bg(theme::BACKGROUND));
        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for y labels, bottom row for the legend.
        let plot_left = inner.x + LABEL_WIDTH;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(LABEL_WIDTH);
        let plot_height = inner.height.saturating_sub(1);
        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_rows = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (value, row) in y_labels.iter().zip(y_rows) {
            buf.set_string(inner.x, plot_top + row, format!("{value:>8.2}"), theme::muted());
        }

        let visible = base.x.len().min(plot_width as usize);
        let start = base.x.len() - visible;
        let to_y = |price: f64| plot_top + price_to_y(price, y_lower, y_upper, plot_height);

        for col in 0..visible {
            let i = start + col;
            let x = plot_left + col as u16;
            let (open, high, low, close) = (base.open[i], base.high[i], base.low[i], base.close[i]);
            let color = if close >= open { up_color } else { down_color };
            let style = Style::default().fg(color);

            let (high_y, low_y) = (to_y(high), to_y(low));
            let (open_y, close_y) = (to_y(open), to_y(close));

            match bar_style {
                BarStyle::Ohlc => {
                    for y in high_y..=low_y {
                        buf.set_string(x, y, "│", style);
                    }
                    buf.set_string(x, open_y, "┤", style);
                    buf.set_string(x, close_y, "├", style);
                }
                BarStyle::Candle => {
                    let (body_top, body_bot) = (open_y.min(close_y), open_y.max(close_y));
                    for y in high_y..body_top {
                        buf.set_string(x, y, "│", style);
                    }
                    let body = if close >= open { "█" } else { "▓" };
                    for y in body_top..=body_bot {
                        buf.set_string(x, y, body, style);
                    }
                    for y in (body_bot + 1)..=low_y {
                        buf.set_string(x, y, "│", style);
                    }
                }
            }
        }

        // Indicator lines over the bars.
        let mut legend_x = plot_left;
        let legend_y = plot_top + plot_height;
        for (idx, line) in self.lines().enumerate() {
            let color = theme::series_color(idx);
            let dot = Style::default().fg(color).add_modifier(Modifier::BOLD);
            let offset = line.y.len().saturating_sub(visible);
            for (col, value) in line.y.iter().skip(offset).enumerate() {
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    buf.set_string(plot_left + col as u16, to_y(v), "•", dot);
                }
            }

            let label = format!("• {} ", line.name);
            let width = label.chars().count() as u16;
            if legend_x + width <= inner.right() {
                buf.set_string(legend_x, legend_y, &label, Style::default().fg(color));
                legend_x += width;
            }
        }
    }
}

//! Keyboard input dispatch: overlays → global keys → view-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stockdash_core::chart::{ChartKind, OverlayKind};
use stockdash_core::reactor::UiEvent;
use stockdash_core::window::WindowPreset;

use crate::app::{AppState, Overlay, View};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    if app.overlay == Overlay::Range {
        handle_range_overlay(app, key);
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            app.view = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.view.prev()
            } else {
                app.view.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.view = app.view.prev();
            return;
        }
        KeyCode::Char('?') => {
            app.view = View::Help;
            return;
        }
        _ => {}
    }

    // 3. View-specific keys.
    match app.view {
        View::Charts => handle_charts_key(app, key),
        View::Rules => handle_rules_key(app, key),
        View::Help => {}
    }
}

fn handle_range_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.range_input.clear();
        }
        KeyCode::Enter => app.submit_range(),
        KeyCode::Backspace => {
            app.range_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == ' ' => {
            app.range_input.push(c);
        }
        _ => {}
    }
}

fn handle_charts_key(app: &mut AppState, key: KeyEvent) {
    let event = match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.tickers.move_down();
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.tickers.move_up();
            return;
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if app.tickers.toggle_cursor() {
                app.send_selection();
            }
            return;
        }
        KeyCode::Char(']') | KeyCode::Right => {
            app.next_page();
            return;
        }
        KeyCode::Char('[') | KeyCode::Left => {
            app.prev_page();
            return;
        }
        KeyCode::Char('g') => {
            app.overlay = Overlay::Range;
            return;
        }

        // Time windows
        KeyCode::Char('w') => UiEvent::TimeButton(WindowPreset::Week),
        KeyCode::Char('M') => UiEvent::TimeButton(WindowPreset::Month),
        KeyCode::Char('6') => UiEvent::TimeButton(WindowPreset::Days60),
        KeyCode::Char('9') => UiEvent::TimeButton(WindowPreset::Days90),
        KeyCode::Char('h') => UiEvent::TimeButton(WindowPreset::Days180),
        KeyCode::Char('y') => UiEvent::TimeButton(WindowPreset::Year),

        // Chart kinds
        KeyCode::Char('c') => UiEvent::ChartButton(ChartKind::Candlestick),
        KeyCode::Char('l') => UiEvent::ChartButton(ChartKind::Line),
        KeyCode::Char('o') => UiEvent::ChartButton(ChartKind::Ohlc),

        // Overlays
        KeyCode::Char('m') => UiEvent::OverlayButton(OverlayKind::MovingAverage),
        KeyCode::Char('b') => UiEvent::OverlayButton(OverlayKind::BollingerBands),
        KeyCode::Char('e') => UiEvent::OverlayButton(OverlayKind::ExponentialMovingAverage),
        KeyCode::Char('p') => UiEvent::OverlayButton(OverlayKind::PivotPoints),
        KeyCode::Char('v') => UiEvent::OverlayButton(OverlayKind::VolumeWeightedAveragePrice),

        KeyCode::Char('x') => UiEvent::EmaSmaButton,
        KeyCode::Char('f') => UiEvent::Refresh,
        _ => return,
    };
    app.send_event(event);
}

fn handle_rules_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.rules.field + 1 < app.rules.field_count() {
                app.rules.field += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.rules.field = app.rules.field.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left if app.rules.field == 0 => app.rules.cycle_metric(false),
        KeyCode::Char('l') | KeyCode::Right if app.rules.field == 0 => app.rules.cycle_metric(true),
        KeyCode::Char('r') => app.rules.show_rules = !app.rules.show_rules,
        KeyCode::Char('f') => app.request_rule_series(),
        KeyCode::Enter => app.commit_rules(),
        KeyCode::Backspace => app.rules.backspace_focused(),
        KeyCode::Char(c) => app.rules.edit_focused(c),
        _ => {}
    }
}

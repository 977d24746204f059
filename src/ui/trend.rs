// Historical trend rendering module
//
// Renders the last points of the history series as a sparkline with the
// window's min/avg/max underneath. With a node selected only pairs
// involving that node are shown.

use crate::app::AppState;
use crate::theme::{ACCENT_BLUE, SIGNAL_GREEN, SLATE};
use latglobe::latency::history::DEFAULT_CHART_WINDOW;
use latglobe::stats::aggregate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline},
    Frame,
};

pub fn render_trend(f: &mut Frame, area: Rect, app: &AppState) {
    let selected = app.selected().map(|n| n.id.as_str());
    let window = app.store.history().chart_window(DEFAULT_CHART_WINDOW, selected);
    let latencies: Vec<f64> = window.iter().map(|p| p.latency_ms).collect();
    let bars: Vec<u64> = latencies.iter().map(|ms| ms.round() as u64).collect();

    let title = format!(" 📈 {} (last {}) ", app.store.history_pair(), window.len());
    let block = Block::default()
        .title(vec![Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )])
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_BLUE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let footer = match aggregate(&latencies, app.store.latency_config()) {
        Ok(stats) => Line::from(Span::styled(
            format!(
                " min {:.1}  avg {:.1}  max {:.1} ms",
                stats.min_ms, stats.mean_ms, stats.max_ms
            ),
            Style::default().fg(SLATE),
        )),
        Err(_) => Line::from(Span::styled(
            match selected {
                Some(id) => format!(" (no history for {})", id),
                None => " (no history)".to_string(),
            },
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    };

    let sparkline = Sparkline::default()
        .data(&bars)
        .style(Style::default().fg(SIGNAL_GREEN));

    f.render_widget(sparkline, chunks[0]);
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

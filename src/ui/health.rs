// Network health rendering module
//
// Renders the aggregate statistics of the current sample snapshot and
// the tier distribution as gauges.

use crate::app::AppState;
use crate::theme::{health_color, tier_color, ACCENT_BLUE, SLATE};
use latglobe::latency::LatencyTier;
use latglobe::stats::LatencySummary;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

fn summary_lines(summary: &LatencySummary) -> Vec<Line<'static>> {
    let status = summary.health();
    vec![
        Line::from(vec![
            Span::styled(" Status: ", Style::default().fg(SLATE)),
            Span::styled(
                status.label(),
                Style::default().fg(health_color(status)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   Active connections: {}", summary.count),
                Style::default().fg(SLATE),
            ),
        ]),
        Line::from(vec![Span::styled(
            format!(
                " Avg {:.1}ms  Min {:.1}ms  Max {:.1}ms",
                summary.mean_ms, summary.min_ms, summary.max_ms
            ),
            Style::default().fg(SLATE),
        )]),
    ]
}

pub fn render_health(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title(Span::styled(
            "━ 💓 Network Health ━",
            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_BLUE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let summary = match app.store.summary() {
        Ok(summary) => summary,
        Err(e) => {
            let message = Paragraph::new(Line::from(Span::styled(
                format!(" No live samples ({})", e),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
            f.render_widget(message, inner);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Summary
            Constraint::Length(1), // Low
            Constraint::Length(1), // Medium
            Constraint::Length(1), // High
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(summary_lines(&summary)), chunks[0]);

    for (tier, chunk) in LatencyTier::ALL.iter().zip(&chunks[1..4]) {
        let ratio = summary.tiers.fraction(*tier);
        let label = format!(
            "{:<6} {:>2} ({:.0}%)",
            tier.as_str(),
            summary.tiers.get(*tier),
            ratio * 100.0
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(tier_color(*tier)).bg(Color::Rgb(30, 32, 48)))
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, *chunk);
    }
}

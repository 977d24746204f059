// Banner rendering module
//
// Renders the top banner with the title and live feed counters.

use crate::app::AppState;
use crate::theme::{ACCENT_BLUE, SIGNAL_AMBER, SLATE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let snapshot = app.store.snapshot();
    let live = app.edges().iter().filter(|e| !e.synthesized).count();

    let stats_text = format!(
        "   [Generation: {}] [Samples: {}] [Live links: {}/{}] [Ticks: {}]",
        snapshot.generation(),
        snapshot.len(),
        live,
        app.edges().len(),
        app.store.tick_count(),
    );

    let banner_text = vec![
        Line::from(vec![
            Span::styled(
                " ◍ LATGLOBE",
                Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "   Exchange latency across the cloud, live",
                Style::default().fg(SLATE),
            ),
        ]),
        Line::from(vec![Span::styled(stats_text, Style::default().fg(SIGNAL_AMBER))]),
    ];

    let banner = Paragraph::new(banner_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}

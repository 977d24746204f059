// Control panel rendering module
//
// Renders the search box, provider filter, visibility toggles and the
// refresh period.

use crate::app::{AppState, InputMode};
use crate::theme::{refresh_color, ACCENT_BLUE, SIGNAL_GREEN, SLATE};
use latglobe::engine::scheduler::DEFAULT_REFRESH_MS;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// `[key:ON]` / `[key:OFF]` indicator spans
fn toggle(key: &'static str, on: bool) -> Vec<Span<'static>> {
    let (state, color) = if on { ("ON", SIGNAL_GREEN) } else { ("OFF", SLATE) };
    vec![
        Span::styled(format!("[{}:", key), Style::default().fg(SLATE)),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("] ", Style::default().fg(SLATE)),
    ]
}

pub fn render_control_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let searching = app.input_mode == InputMode::Search;
    let query_style = if searching {
        Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(SLATE)
    };
    let query_text = match (searching, app.query.is_empty()) {
        (true, _) => format!("{}▏", app.query),
        (false, true) => "(press / to search)".to_string(),
        (false, false) => app.query.clone(),
    };

    let settings = &app.globe_settings;
    let mut toggles = vec![Span::raw(" ")];
    toggles.extend(toggle("R", settings.show_realtime));
    toggles.extend(toggle("H", settings.show_history));
    toggles.extend(toggle("G", settings.show_regions));
    toggles.extend(toggle("T", settings.labels_enabled));
    toggles.extend(toggle("Spin", settings.auto_spin));

    let refresh = &app.refresh_config;
    let refresh_style = Style::default()
        .fg(refresh_color(
            refresh.refresh_ms,
            DEFAULT_REFRESH_MS,
            refresh.recently_changed(Instant::now()),
        ))
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Search:   ", Style::default().fg(SLATE)),
            Span::styled(query_text, query_style),
        ]),
        Line::from(vec![
            Span::styled(" Provider: ", Style::default().fg(SLATE)),
            Span::styled(
                app.facet.label(),
                Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Refresh: ", Style::default().fg(SLATE)),
            Span::styled(format!("{:.1}s", refresh.refresh_ms as f64 / 1000.0), refresh_style),
        ]),
        Line::from(toggles),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                "━ 🎛 Controls ━",
                Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if searching { SIGNAL_GREEN } else { ACCENT_BLUE })),
    );

    f.render_widget(panel, area);
}

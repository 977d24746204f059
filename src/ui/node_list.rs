// Node list rendering module
//
// Renders the scrollable list of filtered exchange nodes with provider,
// location and tier-colored current latency.

use super::text::fit_width;
use crate::app::AppState;
use crate::theme::{provider_color, tier_color, SELECTION_BG, SIGNAL_AMBER, SLATE};
use latglobe::latency::classify_latency;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

const NAME_WIDTH: usize = 13;
const PROVIDER_WIDTH: usize = 6;
const LOCATION_WIDTH: usize = 14;

pub fn render_node_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let latency_config = *app.store.latency_config();

    let items: Vec<ListItem> = app
        .filtered_nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let tier = classify_latency(node.current_latency, &latency_config);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:2}. ", idx + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    fit_width(&node.name, NAME_WIDTH),
                    Style::default().fg(SLATE).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    fit_width(&node.provider.as_str().to_uppercase(), PROVIDER_WIDTH),
                    Style::default().fg(provider_color(node.provider)),
                ),
                Span::styled(fit_width(&node.location, LOCATION_WIDTH), Style::default().fg(SLATE)),
                Span::styled(
                    format!("{:>6.1}ms", node.current_latency),
                    Style::default().fg(tier_color(tier)),
                ),
            ]))
        })
        .collect();

    let items = if items.is_empty() {
        vec![ListItem::new(Span::styled(
            "  (no nodes match the filter)",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))]
    } else {
        items
    };

    let title = format!("━ 📡 Exchanges ({}) ", app.filtered_nodes().len());

    let list = List::new(items)
        .block(
            Block::default()
                .title(vec![
                    Span::styled(title, Style::default().fg(SIGNAL_AMBER).add_modifier(Modifier::BOLD)),
                    Span::styled("━━━━━━━", Style::default().fg(SIGNAL_AMBER)),
                ])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SIGNAL_AMBER)),
        )
        .highlight_style(Style::default().bg(SELECTION_BG));

    f.render_stateful_widget(list, area, &mut app.node_list_state);
}

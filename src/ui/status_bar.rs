// Status bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, dropping lower
// priority hints when the terminal is narrow, and the last refresh error.

use crate::app::{AppState, InputMode};
use crate::theme::{ACCENT_BLUE, SIGNAL_RED, SLATE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
}

const NORMAL_HINTS: [Hint; 9] = [
    Hint { priority: 1, key: "Q:", desc: "Quit | " },
    Hint { priority: 1, key: "/:", desc: "Search | " },
    Hint { priority: 1, key: "P:", desc: "Provider | " },
    Hint { priority: 1, key: "↑↓:", desc: "Select | " },
    Hint { priority: 2, key: "←→:", desc: "Rotate | " },
    Hint { priority: 2, key: "+/-:", desc: "Refresh | " },
    Hint { priority: 2, key: "R/H/G:", desc: "Links/History/Regions | " },
    Hint { priority: 3, key: "T:", desc: "Labels | " },
    Hint { priority: 3, key: "Space:", desc: "Spin " },
];

const SEARCH_HINTS: [Hint; 2] = [
    Hint { priority: 1, key: "Enter/Esc:", desc: "Done | " },
    Hint { priority: 1, key: "Backspace:", desc: "Delete " },
];

/// Hints that fit in `available` cells, filled in priority order and
/// returned in display order
fn visible_hints(hints: &[Hint], available: usize) -> Vec<&Hint> {
    let mut used = 0;
    let mut shown = vec![false; hints.len()];
    for priority in 1..=3 {
        for (idx, hint) in hints.iter().enumerate() {
            if hint.priority != priority {
                continue;
            }
            let len = hint.key.chars().count() + hint.desc.chars().count();
            if used + len <= available {
                shown[idx] = true;
                used += len;
            }
        }
    }
    hints
        .iter()
        .zip(shown)
        .filter_map(|(hint, show)| show.then_some(hint))
        .collect()
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let hints: &[Hint] = match app.input_mode {
        InputMode::Normal => &NORMAL_HINTS,
        InputMode::Search => &SEARCH_HINTS,
    };

    let error_text = app.last_error.as_ref().map(|e| format!(" ⚠ {}", e));
    let reserved = 4 + error_text.as_ref().map_or(0, |e| e.chars().count());
    let available = (area.width as usize).saturating_sub(reserved);

    let mut spans = vec![Span::styled(" ⌨ ", Style::default().fg(ACCENT_BLUE))];
    for hint in visible_hints(hints, available) {
        spans.push(Span::styled(
            hint.key,
            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(hint.desc, Style::default().fg(SLATE)));
    }
    if let Some(error) = error_text {
        spans.push(Span::styled(
            error,
            Style::default().fg(SIGNAL_RED).add_modifier(Modifier::BOLD),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Rgb(61, 89, 161))),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_hints_fit_on_wide_terminal() {
        assert_eq!(visible_hints(&NORMAL_HINTS, 500).len(), NORMAL_HINTS.len());
    }

    #[test]
    fn test_narrow_terminal_keeps_priority_one_first() {
        // "Q:Quit | " is 9 cells, "/:Search | " is 11
        let shown = visible_hints(&NORMAL_HINTS, 20);
        let keys: Vec<&str> = shown.iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["Q:", "/:"]);
        assert!(visible_hints(&NORMAL_HINTS, 0).is_empty());
    }
}

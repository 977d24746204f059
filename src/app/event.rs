// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use super::{AppState, InputMode};
use crossterm::event::KeyCode;
use std::time::Instant;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `/` - Edit the search query (`Enter` or `Esc` to leave)
/// - `p`, `P` - Cycle provider filter
/// - `r`, `R` - Toggle realtime latency edges
/// - `h`, `H` - Toggle the history panel
/// - `g`, `G` - Toggle cloud regions
/// - `t`, `T` - Toggle node labels
/// - `Space` - Toggle auto-spin
/// - `Left`/`Right` - Rotate the globe
/// - `Up`/`Down` - Select node
/// - `+`, `=` - Slower refresh (longer period)
/// - `-`, `_` - Faster refresh (shorter period)
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    if app.input_mode == InputMode::Search {
        handle_search_key(app, key);
        return true;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            true
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.cycle_provider();
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.toggle_realtime();
            true
        }
        KeyCode::Char('h') | KeyCode::Char('H') => {
            app.globe_settings.show_history = !app.globe_settings.show_history;
            true
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            app.globe_settings.show_regions = !app.globe_settings.show_regions;
            true
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.globe_settings.labels_enabled = !app.globe_settings.labels_enabled;
            true
        }
        KeyCode::Char(' ') => {
            app.globe_settings.auto_spin = !app.globe_settings.auto_spin;
            true
        }
        KeyCode::Left => {
            app.rotate_left();
            true
        }
        KeyCode::Right => {
            app.rotate_right();
            true
        }
        KeyCode::Up => {
            app.select_previous_node();
            true
        }
        KeyCode::Down => {
            app.select_next_node();
            true
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.decrease_refresh_rate(Instant::now());
            true
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            app.increase_refresh_rate(Instant::now());
            true
        }
        _ => true,
    }
}

fn handle_search_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use latglobe::registry::{CloudProvider, ProviderFacet};

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();

        assert!(app.running);
        assert!(!handle_key_event(&mut app, KeyCode::Char('q')));
        assert!(!app.running);

        app.running = true;
        assert!(!handle_key_event(&mut app, KeyCode::Esc));
        assert!(!app.running);
    }

    #[test]
    fn test_search_mode_captures_text() {
        let mut app = test_app();
        handle_key_event(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        // 'q' is text while searching, not quit
        for c in "qkrak".chars() {
            assert!(handle_key_event(&mut app, KeyCode::Char(c)));
        }
        assert!(app.running);
        assert_eq!(app.query, "qkrak");

        handle_key_event(&mut app, KeyCode::Backspace);
        handle_key_event(&mut app, KeyCode::Home);
        assert_eq!(app.query, "qkra");

        handle_key_event(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_provider_cycle_key() {
        let mut app = test_app();
        handle_key_event(&mut app, KeyCode::Char('p'));
        assert_eq!(app.facet, ProviderFacet::Only(CloudProvider::Aws));
        for _ in 0..3 {
            handle_key_event(&mut app, KeyCode::Char('P'));
        }
        assert_eq!(app.facet, ProviderFacet::All);
    }

    #[test]
    fn test_toggles() {
        let mut app = test_app();
        let before = app.globe_settings.clone();

        handle_key_event(&mut app, KeyCode::Char('h'));
        handle_key_event(&mut app, KeyCode::Char('g'));
        handle_key_event(&mut app, KeyCode::Char('t'));
        handle_key_event(&mut app, KeyCode::Char(' '));
        handle_key_event(&mut app, KeyCode::Char('r'));

        assert_eq!(app.globe_settings.show_history, !before.show_history);
        assert_eq!(app.globe_settings.show_regions, !before.show_regions);
        assert_eq!(app.globe_settings.labels_enabled, !before.labels_enabled);
        assert_eq!(app.globe_settings.auto_spin, !before.auto_spin);
        assert_eq!(app.globe_settings.show_realtime, !before.show_realtime);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = test_app();
        handle_key_event(&mut app, KeyCode::Down);
        handle_key_event(&mut app, KeyCode::Down);
        assert_eq!(app.selected_node, Some(1));
        handle_key_event(&mut app, KeyCode::Up);
        assert_eq!(app.selected().map(|n| n.id.as_str()), Some("binance"));

        handle_key_event(&mut app, KeyCode::Right);
        assert!(app.rotation > 0.0);
    }

    #[test]
    fn test_refresh_rate_controls() {
        let mut app = test_app();
        let initial = app.refresh_config.refresh_ms;

        handle_key_event(&mut app, KeyCode::Char('+'));
        assert!(app.refresh_config.refresh_ms > initial);

        handle_key_event(&mut app, KeyCode::Char('-'));
        assert_eq!(app.refresh_config.refresh_ms, initial);
    }
}

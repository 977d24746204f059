// UI rendering module
//
// This module contains all UI rendering components for latglobe.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod control;
mod globe;
mod health;
mod node_list;
mod status_bar;
mod text;
mod trend;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use banner::render_banner;
use control::render_control_panel;
use globe::render_globe;
use health::render_health;
use node_list::render_node_list;
use status_bar::render_status_bar;
use trend::render_trend;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: banner, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], app);

    // Body: globe + side panels
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Globe
            Constraint::Percentage(40), // Side panels
        ])
        .split(chunks[1]);

    render_globe(f, body_chunks[0], app);

    let trend_height = if app.globe_settings.show_history { 7 } else { 0 };
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),            // Controls
            Constraint::Min(5),               // Node list
            Constraint::Length(7),            // Health
            Constraint::Length(trend_height), // Trend
        ])
        .split(body_chunks[1]);

    render_control_panel(f, right_chunks[0], app);
    render_node_list(f, right_chunks[1], app);
    render_health(f, right_chunks[2], app);
    if app.globe_settings.show_history {
        render_trend(f, right_chunks[3], app);
    }

    render_status_bar(f, chunks[2], app);
}

// Theme module - Color palette and color helpers
//
// Dark "night globe" palette: a deep blue ocean, muted grid lines and a
// traffic-light scale for latency tiers.

use latglobe::latency::LatencyTier;
use latglobe::registry::CloudProvider;
use latglobe::stats::HealthStatus;
use ratatui::style::Color;

/// Primary accent - borders and titles
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);

/// Globe outline and graticule
pub const OCEAN_BLUE: Color = Color::Rgb(61, 89, 161);

/// Secondary text and inactive elements
pub const SLATE: Color = Color::Rgb(169, 177, 214);

/// Low latency / healthy
pub const SIGNAL_GREEN: Color = Color::Rgb(158, 206, 106);

/// Medium latency / degraded
pub const SIGNAL_AMBER: Color = Color::Rgb(224, 175, 104);

/// High latency / poor
pub const SIGNAL_RED: Color = Color::Rgb(247, 118, 142);

/// Selection background
pub const SELECTION_BG: Color = Color::Rgb(47, 51, 77);

pub fn tier_color(tier: LatencyTier) -> Color {
    match tier {
        LatencyTier::Low => SIGNAL_GREEN,
        LatencyTier::Medium => SIGNAL_AMBER,
        LatencyTier::High => SIGNAL_RED,
    }
}

pub fn provider_color(provider: CloudProvider) -> Color {
    match provider {
        CloudProvider::Aws => Color::Rgb(255, 153, 0),
        CloudProvider::Gcp => Color::Rgb(66, 133, 244),
        CloudProvider::Azure => Color::Rgb(0, 188, 242),
    }
}

pub fn health_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Excellent => SIGNAL_GREEN,
        HealthStatus::Good => SIGNAL_AMBER,
        HealthStatus::Poor => SIGNAL_RED,
    }
}

/// Dim a color toward black; `factor` 1.0 keeps it, 0.0 yields black
pub fn dim(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
        ),
        other => other,
    }
}

/// Color for the refresh period readout
///
/// - Green: default period or slower
/// - Amber: faster than default
/// - Red: more than twice as fast as default
///
/// A recently changed value is brightened by 20%.
pub fn refresh_color(period_ms: u64, default_ms: u64, recently_changed: bool) -> Color {
    let base = if period_ms >= default_ms {
        SIGNAL_GREEN
    } else if period_ms * 2 < default_ms {
        SIGNAL_RED
    } else {
        SIGNAL_AMBER
    };

    if !recently_changed {
        return base;
    }
    match base {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * 1.2).min(255.0) as u8,
            (g as f32 * 1.2).min(255.0) as u8,
            (b as f32 * 1.2).min(255.0) as u8,
        ),
        other => other,
    }
}

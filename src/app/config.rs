// Application configuration types
//
// Front end settings: globe toggles, refresh period tracking and the
// animation constants of the event loop. Engine settings live in
// `latglobe::engine::EngineConfig`.

use latglobe::engine::scheduler::{
    clamp_period_ms, DEFAULT_REFRESH_MS, MAX_REFRESH_MS, MIN_REFRESH_MS, REFRESH_STEP_MS,
};
use std::time::{Duration, Instant};

// ============================================================================
// Constants
// ============================================================================

/// Event loop poll interval
pub const UI_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Interval between auto-spin steps (100ms)
pub const SPIN_INTERVAL_MS: u128 = 100;

/// Rotation applied per auto-spin step, in radians
pub const SPIN_STEP_RAD: f64 = 0.02;

/// Rotation applied per arrow key press, in radians
pub const MANUAL_ROTATE_STEP_RAD: f64 = 0.15;

/// Duration to highlight a recently changed refresh period
pub const CHANGE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Maximum search query length in characters
pub const MAX_QUERY_LEN: usize = 32;

// ============================================================================
// Enums
// ============================================================================

/// Whether key presses drive commands or edit the search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Visibility toggles for the globe and side panels
#[derive(Debug, Clone)]
pub struct GlobeSettings {
    /// Draw latency edges between nodes (toggle with 'r')
    pub show_realtime: bool,

    /// Show the historical trend panel (toggle with 'h')
    pub show_history: bool,

    /// Draw cloud region rings (toggle with 'g')
    pub show_regions: bool,

    /// Print node labels next to markers (toggle with 't')
    pub labels_enabled: bool,

    /// Rotate the globe continuously (toggle with space)
    pub auto_spin: bool,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            show_realtime: true,
            show_history: true,
            show_regions: true,
            labels_enabled: true,
            auto_spin: true,
        }
    }
}

/// Sampling period as shown and adjusted by the user
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Period in milliseconds (1000-60000ms)
    pub refresh_ms: u64,

    /// Timestamp of last period change (for visual feedback)
    pub last_change: Option<Instant>,
}

impl RefreshConfig {
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            refresh_ms: clamp_period_ms(refresh_ms),
            last_change: None,
        }
    }

    /// Period one step slower, clamped to the maximum
    pub fn slower(&self) -> u64 {
        self.refresh_ms.saturating_add(REFRESH_STEP_MS).min(MAX_REFRESH_MS)
    }

    /// Period one step faster, clamped to the minimum
    pub fn faster(&self) -> u64 {
        self.refresh_ms.saturating_sub(REFRESH_STEP_MS).max(MIN_REFRESH_MS)
    }

    pub fn recently_changed(&self, now: Instant) -> bool {
        self.last_change
            .map(|t| now.duration_since(t) < CHANGE_HIGHLIGHT_DURATION)
            .unwrap_or(false)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_steps_are_clamped() {
        let config = RefreshConfig::new(MIN_REFRESH_MS);
        assert_eq!(config.faster(), MIN_REFRESH_MS);
        assert_eq!(config.slower(), MIN_REFRESH_MS + REFRESH_STEP_MS);

        let config = RefreshConfig::new(u64::MAX);
        assert_eq!(config.refresh_ms, MAX_REFRESH_MS);
        assert_eq!(config.slower(), MAX_REFRESH_MS);
    }

    #[test]
    fn test_recently_changed_window() {
        let now = Instant::now();
        let mut config = RefreshConfig::default();
        assert!(!config.recently_changed(now));

        config.last_change = Some(now);
        assert!(config.recently_changed(now + Duration::from_millis(100)));
        assert!(!config.recently_changed(now + CHANGE_HIGHLIGHT_DURATION));
    }
}

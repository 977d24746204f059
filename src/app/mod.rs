// Application state management
//
// This module contains the main AppState struct and re-exports
// configuration types from the config submodule.

pub mod config;
pub mod event;

pub use config::{GlobeSettings, InputMode, RefreshConfig};

use config::{MANUAL_ROTATE_STEP_RAD, MAX_QUERY_LEN, SPIN_INTERVAL_MS, SPIN_STEP_RAD};
use latglobe::engine::{self, EngineConfig, RefreshHandle, RefreshScheduler, TelemetryStore, TickOutcome};
use latglobe::latency::LatencyEdge;
use latglobe::registry::{Node, ProviderFacet};
use ratatui::widgets::ListState;
use std::f64::consts::TAU;
use std::time::Instant;

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Engine session state
    pub store: TelemetryStore,

    /// Periodic re-sampling timer
    pub scheduler: RefreshScheduler,

    /// Free-text node search
    pub query: String,

    /// Provider filter
    pub facet: ProviderFacet,

    pub input_mode: InputMode,

    pub globe_settings: GlobeSettings,

    pub refresh_config: RefreshConfig,

    /// Globe rotation around the vertical axis, in radians [0, TAU)
    pub rotation: f64,

    /// Index into `filtered_nodes` of the selected node
    pub selected_node: Option<usize>,

    /// List state for the node list (enables scrolling)
    pub node_list_state: ListState,

    /// Message of the last failed refresh, cleared on the next success
    pub last_error: Option<String>,

    /// Nodes passing the current search and provider filter
    filtered_nodes: Vec<Node>,

    /// Edges among `filtered_nodes`, rebuilt on tick or filter change
    edges: Vec<LatencyEdge>,

    /// Last auto-spin step
    last_spin: Instant,
}

impl AppState {
    /// Create the application state and run the initial sample
    pub fn new(config: &EngineConfig, query: String, facet: ProviderFacet) -> latglobe::Result<Self> {
        let store = TelemetryStore::new(config, engine::now_ms())?;
        let scheduler = RefreshScheduler::new(config.refresh_ms);
        let refresh_config = RefreshConfig::new(scheduler.period_ms());

        let mut state = Self {
            running: true,
            store,
            scheduler,
            query: query.chars().take(MAX_QUERY_LEN).collect(),
            facet,
            input_mode: InputMode::default(),
            globe_settings: GlobeSettings::default(),
            refresh_config,
            rotation: 0.0,
            selected_node: None,
            node_list_state: ListState::default(),
            last_error: None,
            filtered_nodes: Vec::new(),
            edges: Vec::new(),
            last_spin: Instant::now(),
        };
        state.refresh_view();
        Ok(state)
    }

    /// Arm the refresh timer; it runs while the returned handle lives
    pub fn start_refresh(&mut self, now: Instant) -> RefreshHandle {
        self.scheduler.start(now)
    }

    /// Update state on each loop iteration
    pub fn on_tick(&mut self, now: Instant) {
        if self.globe_settings.auto_spin
            && now.duration_since(self.last_spin).as_millis() >= SPIN_INTERVAL_MS
        {
            self.last_spin = now;
            self.rotate(SPIN_STEP_RAD);
        }

        let store = &mut self.store;
        match self.scheduler.poll(now, || store.tick(engine::now_ms())) {
            TickOutcome::Fired => {
                self.last_error = None;
                self.refresh_view();
            }
            TickOutcome::Failed => {
                self.last_error = Some(format!(
                    "refresh failed ({} so far)",
                    self.scheduler.failed_ticks()
                ));
            }
            TickOutcome::Idle => {}
        }
    }

    /// Re-run the filter and rebuild the edges
    pub fn refresh_view(&mut self) {
        self.filtered_nodes = self.store.filtered_nodes(&self.query, self.facet);
        self.edges = if self.globe_settings.show_realtime {
            self.store.build_graph(&self.filtered_nodes)
        } else {
            Vec::new()
        };

        // Keep the selection on a visible node
        match self.selected_node {
            Some(_) if self.filtered_nodes.is_empty() => self.select(None),
            Some(idx) if idx >= self.filtered_nodes.len() => {
                self.select(Some(self.filtered_nodes.len() - 1))
            }
            _ => {}
        }
    }

    pub fn filtered_nodes(&self) -> &[Node] {
        &self.filtered_nodes
    }

    pub fn edges(&self) -> &[LatencyEdge] {
        &self.edges
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected_node.and_then(|idx| self.filtered_nodes.get(idx))
    }

    fn select(&mut self, idx: Option<usize>) {
        self.selected_node = idx;
        self.node_list_state.select(idx);
    }

    /// Move node selection up (decrease index)
    pub fn select_previous_node(&mut self) {
        if self.filtered_nodes.is_empty() {
            self.select(None);
            return;
        }
        match self.selected_node {
            None => self.select(Some(self.filtered_nodes.len() - 1)),
            Some(idx) if idx > 0 => self.select(Some(idx - 1)),
            Some(_) => {}
        }
    }

    /// Move node selection down (increase index)
    pub fn select_next_node(&mut self) {
        if self.filtered_nodes.is_empty() {
            self.select(None);
            return;
        }
        match self.selected_node {
            None => self.select(Some(0)),
            Some(idx) if idx + 1 < self.filtered_nodes.len() => self.select(Some(idx + 1)),
            Some(_) => {}
        }
    }

    pub fn rotate(&mut self, delta: f64) {
        self.rotation = (self.rotation + delta).rem_euclid(TAU);
    }

    pub fn rotate_left(&mut self) {
        self.rotate(-MANUAL_ROTATE_STEP_RAD);
    }

    pub fn rotate_right(&mut self) {
        self.rotate(MANUAL_ROTATE_STEP_RAD);
    }

    pub fn cycle_provider(&mut self) {
        self.facet = self.facet.next();
        self.refresh_view();
    }

    pub fn toggle_realtime(&mut self) {
        self.globe_settings.show_realtime = !self.globe_settings.show_realtime;
        self.refresh_view();
    }

    pub fn push_query_char(&mut self, c: char) {
        if self.query.chars().count() < MAX_QUERY_LEN {
            self.query.push(c);
            self.refresh_view();
        }
    }

    pub fn pop_query_char(&mut self) {
        if self.query.pop().is_some() {
            self.refresh_view();
        }
    }

    /// Slow sampling down by one step (longer period)
    pub fn decrease_refresh_rate(&mut self, now: Instant) {
        let period = self.refresh_config.slower();
        self.apply_refresh_period(period, now);
    }

    /// Speed sampling up by one step (shorter period)
    pub fn increase_refresh_rate(&mut self, now: Instant) {
        let period = self.refresh_config.faster();
        self.apply_refresh_period(period, now);
    }

    fn apply_refresh_period(&mut self, period_ms: u64, now: Instant) {
        let applied = self.scheduler.set_period(period_ms, now);
        self.refresh_config.refresh_ms = applied;
        self.refresh_config.last_change = Some(now);
        tracing::info!(period_ms = applied, "Refresh period changed");
    }
}

// latglobe - Exchange latency on a terminal globe
// Renders synthetic latency telemetry between crypto exchange data centers

mod app;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::{config::UI_POLL_INTERVAL, event::handle_key_event, AppState};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use latglobe::engine::{scheduler::DEFAULT_REFRESH_MS, EngineConfig};
use latglobe::registry::ProviderFacet;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "latglobe")]
#[command(about = "Live exchange-to-exchange latency on a rotating terminal globe")]
struct Args {
    /// Seed for the synthetic latency generators (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Sampling period in milliseconds (clamped to 1000-60000)
    #[arg(long, default_value_t = DEFAULT_REFRESH_MS)]
    refresh_ms: u64,

    /// Initial provider filter: all, aws, gcp or azure
    #[arg(long, default_value = "all")]
    provider: ProviderFacet,

    /// Initial search query
    #[arg(long, default_value = "")]
    query: String,

    /// Write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file only; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = EngineConfig {
        seed: args.seed,
        refresh_ms: args.refresh_ms,
        ..EngineConfig::default()
    };
    tracing::info!(
        seed = ?config.seed,
        refresh_ms = config.refresh_ms,
        provider = args.provider.label(),
        "Starting latglobe"
    );

    // Build the engine before touching the terminal so errors print normally
    let mut app = AppState::new(&config, args.query, args.provider)
        .context("failed to initialize telemetry store")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    // The timer stops when this handle goes out of scope
    let _refresh = app.start_refresh(Instant::now());

    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(UI_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key.code);
                }
            }
        }
    }
}

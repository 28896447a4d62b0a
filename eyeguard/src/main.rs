use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyeguard_core::{Engine, EngineHandle};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

mod app;
mod config;
mod logging;
mod persistence;
mod ui;
mod view;

use app::{App, AppMode};
use persistence::JsonSettingsStore;
use view::{ChannelView, ViewUpdate};

const LOG_FILE: &str = "eyeguard.log";
const INPUT_POLL: Duration = Duration::from_millis(100);

fn log_path() -> PathBuf {
    config::project_dirs()
        .map(|dirs| dirs.data_dir().join(LOG_FILE))
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE))
}

fn main() -> Result<()> {
    let config = config::load_config()?;
    logging::init(
        &log_path(),
        config.log_level.as_deref().unwrap_or("info"),
    )?;
    info!("eyeguard starting");

    let store = JsonSettingsStore::open_default()?;
    info!("settings file at {:?}", store.path());

    let (view, updates) = ChannelView::new();
    let engine = Engine::new(
        Arc::new(view),
        Box::new(store),
        config.timing.constants(),
    )
    .with_refresh_cadence(config.timing.status_refresh_ticks);
    let handle = engine.handle();
    let engine_thread = engine.spawn().context("Failed to start the step engine")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config, handle.clone());
    let res = run_app(&mut terminal, app, &updates);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    stop_engine(&handle, engine_thread);

    if let Err(err) = res {
        error!("UI loop failed: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    info!("eyeguard stopped");
    Ok(())
}

fn stop_engine(handle: &EngineHandle, thread: std::thread::JoinHandle<()>) {
    handle.shutdown();
    if thread.join().is_err() {
        error!("step engine thread panicked");
    }
}

/// Returns false once the engine side of the channel is gone.
fn drain_updates(app: &mut App, updates: &Receiver<ViewUpdate>) -> bool {
    loop {
        match updates.try_recv() {
            Ok(update) => app.apply_update(update),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    updates: &Receiver<ViewUpdate>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        if !drain_updates(&mut app, updates) {
            anyhow::bail!("step engine stopped unexpectedly");
        }
        app.expire_toasts(Instant::now());

        let frame_time = last_frame.elapsed();
        last_frame = Instant::now();
        terminal.draw(|f| ui::draw(f, &mut app, frame_time))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.mode {
                        AppMode::Normal => match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Char('s') => app.toggle_protection(),
                            KeyCode::Char('b') => app.take_break_now(),
                            KeyCode::Esc | KeyCode::Char('c') => app.close_break_overlay(),
                            KeyCode::Char('w') if !app.break_overlay.visible => {
                                app.start_editing(AppMode::EditingWork)
                            }
                            KeyCode::Char('r') if !app.break_overlay.visible => {
                                app.start_editing(AppMode::EditingBreak)
                            }
                            KeyCode::Char('n') => app.toggle_notifications(),
                            KeyCode::Char('m') => app.toggle_sounds(),
                            KeyCode::Char('p') => app.toggle_protection_status(),
                            KeyCode::Char('a') => app.apply_settings(),
                            KeyCode::Char('?') => app.toggle_help(),
                            _ => {}
                        },
                        AppMode::EditingWork | AppMode::EditingBreak => match key.code {
                            KeyCode::Esc => app.cancel_input(),
                            KeyCode::Enter => app.handle_char('\n'),
                            KeyCode::Backspace => app.handle_backspace(),
                            KeyCode::Char(c) => app.handle_char(c),
                            _ => {}
                        },
                        AppMode::ShowHelp => match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Esc | KeyCode::Char('?') => app.toggle_help(),
                            _ => {}
                        },
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

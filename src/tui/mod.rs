// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, timer ticks)
// - Feeding inbound chat messages and finished catalogs into App

pub mod app;
pub mod clipboard;
pub mod components;
pub mod scroll;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::emotes::{Catalog, CatalogAggregator, JsonFetcher};
use crate::logging::LogBuffer;
use crate::models::ChatMessage;
use anyhow::{Context, Result};
use app::{App, InputMode, View, WHEEL_ROWS};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Redraw and animation interval
const TICK: Duration = Duration::from_millis(50);

/// Work a key press asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    RebuildCatalog,
}

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and restores the terminal when
/// done, even if the loop failed.
pub async fn run_tui<F>(
    mut msg_rx: mpsc::Receiver<ChatMessage>,
    log_buffer: LogBuffer,
    config: Config,
    aggregator: Arc<CatalogAggregator<F>>,
    source_label: String,
) -> Result<()>
where
    F: JsonFetcher + 'static,
{
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(config, log_buffer, source_label);

    let result = run_event_loop(&mut terminal, &mut app, &mut msg_rx, &aggregator).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on input, the redraw tick, inbound messages and finished catalog
/// builds with `tokio::select!`. All App mutation happens here.
async fn run_event_loop<F>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    msg_rx: &mut mpsc::Receiver<ChatMessage>,
    aggregator: &Arc<CatalogAggregator<F>>,
) -> Result<()>
where
    F: JsonFetcher + 'static,
{
    let mut tick_interval = tokio::time::interval(TICK);
    let (catalog_tx, mut catalog_rx) = mpsc::channel::<Catalog>(4);

    if app.config.catalog.enabled {
        spawn_rebuild(app, aggregator, &catalog_tx);
    }

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            action = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => return handle_key_event(app, key_event, Instant::now()),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event, Instant::now()),
                        _ => {}
                    }
                }
                None
            } => {
                if action == Some(Action::RebuildCatalog) {
                    spawn_rebuild(app, aggregator, &catalog_tx);
                }
            }

            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }

            Some(message) = msg_rx.recv() => {
                let now = Instant::now();
                app.ingest(message, now);
                // Drain a burst before the next redraw
                while let Ok(message) = msg_rx.try_recv() {
                    app.ingest(message, now);
                }
            }

            Some(catalog) = catalog_rx.recv() => {
                let generation = catalog.generation();
                if app.install_catalog(catalog) {
                    tracing::debug!("Installed catalog generation {}", generation);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Start a catalog build for the configured channel in the background
fn spawn_rebuild<F>(app: &mut App, aggregator: &Arc<CatalogAggregator<F>>, tx: &mpsc::Sender<Catalog>)
where
    F: JsonFetcher + 'static,
{
    if !app.config.catalog.enabled {
        app.show_toast("Emote catalogs are disabled", Instant::now());
        return;
    }

    let generation = app.begin_catalog_rebuild();
    let channel_id = app.config.channel_id.clone().unwrap_or_default();
    let aggregator = Arc::clone(aggregator);
    let tx = tx.clone();

    tracing::info!("Building emote catalog generation {}", generation);
    tokio::spawn(async move {
        let catalog = aggregator.build_catalog(&channel_id, generation).await;
        if tx.send(catalog).await.is_err() {
            tracing::debug!("UI closed before catalog generation {} landed", generation);
        }
    });
}

/// Handle keyboard input
/// Layered dispatch: search input → global → view-specific
fn handle_key_event(app: &mut App, key_event: KeyEvent, now: Instant) -> Option<Action> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    if app.input_mode != InputMode::Normal {
        handle_search_input(app, key_event.code, now);
        return None;
    }

    match key_event.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('e') => {
            app.toggle_emotes();
            return None;
        }
        KeyCode::Char('l') => {
            app.toggle_logs();
            return None;
        }
        KeyCode::Char('r') => return Some(Action::RebuildCatalog),
        KeyCode::Char('/') => {
            app.begin_search();
            return None;
        }
        _ => {}
    }

    match app.view {
        View::Feed => handle_feed_keys(app, key_event.code, now),
        View::Emotes => handle_emote_keys(app, key_event.code, now),
    }
    None
}

fn handle_search_input(app: &mut App, key: KeyCode, now: Instant) {
    match key {
        KeyCode::Enter => app.end_search(false, now),
        KeyCode::Esc => app.end_search(true, now),
        KeyCode::Backspace => app.search_backspace(now),
        KeyCode::Char(c) => app.search_push(c, now),
        _ => {}
    }
}

fn handle_feed_keys(app: &mut App, key: KeyCode, now: Instant) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_feed(-1, now),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_feed(1, now),
        KeyCode::PageUp => app.scroll_feed(-app.page_rows(), now),
        KeyCode::PageDown => app.scroll_feed(app.page_rows(), now),
        KeyCode::Home => app.scroll_feed(-(app.viewport.total() as isize), now),
        KeyCode::End | KeyCode::Char('G') => app.jump_to_latest(now),
        KeyCode::Char('p') => app.update_filter(now, |f| f.cycle_platform()),
        KeyCode::Char('m') => app.update_filter(now, |f| f.mods_only = !f.mods_only),
        KeyCode::Char('v') => app.update_filter(now, |f| f.vips_only = !f.vips_only),
        KeyCode::Char('s') => app.update_filter(now, |f| f.members_only = !f.members_only),
        KeyCode::Char('b') => app.update_filter(now, |f| f.hide_bots = !f.hide_bots),
        KeyCode::Char('x') => {
            app.clear_feed(now);
            app.show_toast("Feed cleared", now);
        }
        KeyCode::Esc if app.filter.is_active() => app.set_filter(Default::default(), now),
        _ => {}
    }
}

fn handle_emote_keys(app: &mut App, key: KeyCode, now: Instant) {
    let catalog = app.catalog();
    match key {
        KeyCode::Left | KeyCode::BackTab => app.emote_panel.previous_tab(),
        KeyCode::Right | KeyCode::Tab => app.emote_panel.next_tab(),
        KeyCode::Up | KeyCode::Char('k') => app.emote_panel.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.emote_panel.select_next(&catalog),
        KeyCode::PageUp => app.emote_panel.page(&catalog, -10),
        KeyCode::PageDown => app.emote_panel.page(&catalog, 10),
        KeyCode::Enter | KeyCode::Char('y') => {
            if let Some(entry) = app.emote_panel.selected_entry(&catalog) {
                let result = clipboard::copy_to_clipboard(&entry.code);
                let feedback = clipboard::copy_feedback(&entry.code, &result);
                app.show_toast(feedback, now);
            }
        }
        KeyCode::Esc => app.toggle_emotes(),
        _ => {}
    }
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent, now: Instant) {
    let rows = match mouse_event.kind {
        MouseEventKind::ScrollUp => -WHEEL_ROWS,
        MouseEventKind::ScrollDown => WHEEL_ROWS,
        _ => return,
    };
    match app.view {
        View::Feed => app.scroll_feed(rows, now),
        View::Emotes => {
            let catalog = app.catalog();
            app.emote_panel.page(&catalog, rows);
        }
    }
}

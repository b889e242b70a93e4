//! Full-screen terminal surface for the viewer.
//!
//! Two views share one event loop:
//! - a gallery of authors with unseen/seen ring state
//! - the playing card with a progress gauge and like/view counters
//!
//! The loop uses `tokio::select!` to handle state snapshots from the
//! controller and keyboard input, translating keys into viewer commands.
//! Holding playback is a key toggle here (space), so `pause`/`resume` map
//! one-to-one onto the command surface.

use crate::event::Command;
use crate::state::Update;
use crate::ui::render;
use crate::ui::styles::ViewerStyles;
use crossterm::{
    event::{Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::thread;
use tokio::sync::mpsc;

/// UI state for the full-screen mode.
struct ScreenState {
    last_update: Option<Update>,
    /// Gallery cursor; clamped to the author list on every update.
    selected: usize,
    should_exit: bool,
}

impl ScreenState {
    fn new() -> Self {
        Self {
            last_update: None,
            selected: 0,
            should_exit: false,
        }
    }

    fn author_count(&self) -> usize {
        self.last_update.as_ref().map_or(0, |u| u.authors.len())
    }

    fn is_open(&self) -> bool {
        self.last_update
            .as_ref()
            .is_some_and(|u| u.card.is_some())
    }
}

/// Run the full-screen UI until the user quits.
pub async fn run_screen(
    mut update_rx: mpsc::Receiver<Update>,
    cmd_tx: mpsc::Sender<Command>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    enable_raw_mode().map_err(to_boxed_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(to_boxed_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(to_boxed_err)?;
    let styles = ViewerStyles::default();
    let mut state = ScreenState::new();

    // Single background thread to poll crossterm events and forward them to
    // the async runtime. Exits when the receiver side is dropped.
    let (event_tx, mut event_rx) = mpsc::channel(32);
    thread::spawn(move || {
        loop {
            match crossterm::event::poll(std::time::Duration::from_millis(100)) {
                Ok(true) => match crossterm::event::read() {
                    Ok(ev) => {
                        if event_tx.try_send(ev).is_err() && event_tx.is_closed() {
                            break;
                        }
                    }
                    Err(_) => {}
                },
                Ok(false) => {}
                Err(_) => {
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    });

    let loop_result = event_loop(
        &mut terminal,
        &mut state,
        &mut update_rx,
        &mut event_rx,
        &cmd_tx,
        &styles,
    )
    .await;

    // Restore the terminal even when the loop failed mid-draw; a raw-mode
    // shell left behind is worse than the original error.
    let _ = cmd_tx.send(Command::Shutdown).await;
    let restore_result = restore_terminal();
    loop_result.and(restore_result)
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut ScreenState,
    update_rx: &mut mpsc::Receiver<Update>,
    event_rx: &mut mpsc::Receiver<Event>,
    cmd_tx: &mpsc::Sender<Command>,
    styles: &ViewerStyles,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    while !state.should_exit {
        tokio::select! {
            biased;

            maybe_update = update_rx.recv() => {
                match maybe_update {
                    Some(update) => {
                        state.selected = state.selected.min(update.authors.len().saturating_sub(1));
                        state.last_update = Some(update);
                    }
                    None => state.should_exit = true,
                }
            }

            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => handle_input(event, state, cmd_tx).await,
                    None => state.should_exit = true,
                }
            }
        }

        terminal
            .draw(|f| render::draw(f, &state.last_update, state.selected, styles))
            .map_err(to_boxed_err)?;
    }
    Ok(())
}

fn restore_terminal() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    disable_raw_mode().map_err(to_boxed_err)?;
    execute!(io::stdout(), LeaveAlternateScreen).map_err(to_boxed_err)?;
    Ok(())
}

async fn handle_input(event: Event, state: &mut ScreenState, cmd_tx: &mpsc::Sender<Command>) {
    let Event::Key(key) = event else { return };
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_exit = true;
        return;
    }

    if state.is_open() {
        let card = state
            .last_update
            .as_ref()
            .and_then(|u| u.card.as_ref());
        match key.code {
            KeyCode::Char('q') => state.should_exit = true,
            KeyCode::Esc => send(cmd_tx, Command::Close).await,
            KeyCode::Right | KeyCode::Char('n') => send(cmd_tx, Command::Next).await,
            KeyCode::Left | KeyCode::Char('p') => send(cmd_tx, Command::Previous).await,
            KeyCode::Char(' ') => {
                let paused = card.is_some_and(|c| c.paused);
                let cmd = if paused { Command::Resume } else { Command::Pause };
                send(cmd_tx, cmd).await;
            }
            KeyCode::Char('l') => {
                if let Some(card) = card {
                    send(cmd_tx, Command::ToggleLike(card.item_id.clone())).await;
                }
            }
            _ => {}
        }
        return;
    }

    // Gallery view.
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_exit = true,
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected + 1 < state.author_count() {
                state.selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right => {
            let author_id = state
                .last_update
                .as_ref()
                .and_then(|u| u.authors.get(state.selected))
                .map(|a| a.id.clone());
            if let Some(id) = author_id {
                send(cmd_tx, Command::Open(id)).await;
            }
        }
        _ => {}
    }
}

async fn send(cmd_tx: &mpsc::Sender<Command>, command: Command) {
    let _ = cmd_tx.send(command).await;
}

fn to_boxed_err<E: std::error::Error + Send + Sync + 'static>(
    e: E,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

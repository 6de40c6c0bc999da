use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, style, terminal};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::{App, LookupRequest};
use crate::lookup::{LookupError, Profile, UserLookup};
use crate::render;

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Everything the widget reacts to flows through one queue, so state is
/// only ever mutated from the event loop: keystrokes from the reader
/// thread, lookup completions from spawned fetch tasks.
enum UiEvent {
    Key(KeyEvent),
    LookupDone {
        seq: u64,
        result: Result<Profile, LookupError>,
    },
}

/// Puts the terminal into raw mode on the alternate screen; restores both
/// on drop, including on early returns and panics.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, TuiError> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive screen until the user quits with Esc or Ctrl-C.
pub async fn run(mut app: App, lookup: Arc<dyn UserLookup>) -> Result<(), TuiError> {
    let _guard = TerminalGuard::enter()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    let reader = spawn_key_reader(tx.clone(), shutdown.clone());

    info!("interactive screen started");
    loop {
        draw(&app)?;

        tokio::select! {
            ui_event = rx.recv() => match ui_event {
                None => break,
                Some(UiEvent::Key(key)) => {
                    if is_quit(&key) {
                        break;
                    }
                    if let Some(request) = apply_key(&mut app, key) {
                        start_lookup(request, lookup.clone(), tx.clone());
                    }
                }
                Some(UiEvent::LookupDone { seq, result }) => app.finish(seq, result),
            },
            _ = wait_until(app.debounce_deadline()) => {
                if let Some(request) = app.tick(Instant::now()) {
                    start_lookup(request, lookup.clone(), tx.clone());
                }
            }
        }
    }

    info!("interactive screen stopped");
    shutdown.store(true, Ordering::Relaxed);
    let _ = reader.join();
    Ok(())
}

/// Translate a keystroke into a widget event. Only Enter can start a
/// lookup here; characters and Backspace just edit the raw input.
fn apply_key(app: &mut App, key: KeyEvent) -> Option<LookupRequest> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_char(c, Instant::now());
            None
        }
        KeyCode::Backspace => {
            app.backspace(Instant::now());
            None
        }
        KeyCode::Enter => app.submit(),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    // Only key presses quit; some platforms also deliver Release/Repeat.
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Sleep until the debounce deadline, or forever when none is pending —
/// the select loop then only wakes for queue events.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Fetch off the event loop and report back through the queue. In-flight
/// lookups are never cancelled; the widget's sequence check decides what a
/// late completion is worth.
fn start_lookup(
    request: LookupRequest,
    lookup: Arc<dyn UserLookup>,
    tx: mpsc::UnboundedSender<UiEvent>,
) {
    tokio::spawn(async move {
        let result = lookup.fetch_profile(&request.login).await;
        // A closed queue just means the screen already shut down.
        let _ = tx.send(UiEvent::LookupDone {
            seq: request.seq,
            result,
        });
    });
}

fn spawn_key_reader(
    tx: mpsc::UnboundedSender<UiEvent>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.load(Ordering::Relaxed) {
            match event::poll(KEY_POLL_INTERVAL) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read() {
                        if tx.send(UiEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    debug!(error = %e, "key reader stopping");
                    break;
                }
            }
        }
    })
}

fn draw(app: &App) -> Result<(), TuiError> {
    let mut out = io::stdout();
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    for line in render::screen(app) {
        // Raw mode needs explicit carriage returns.
        queue!(out, style::Print(line), style::Print("\r\n"))?;
    }
    out.flush()?;
    Ok(())
}

// Raw single-key terminal input
//
// The terminal is only in raw mode while a read is in progress; the guard puts
// it back on every exit path. Log output between reads therefore renders
// normally.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, warn};

/// One keystroke as seen by the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character, case as typed
    Char(char),
    /// Ctrl-C; raw mode swallows SIGINT so it arrives as a key
    Interrupt,
    /// Arrows, function keys, etc.
    Other,
}

impl Key {
    /// Translate a crossterm key event. Releases are not keystrokes.
    pub fn from_event(event: KeyEvent) -> Option<Self> {
        if !matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return None;
        }

        let key = match event.code {
            KeyCode::Char('c' | 'C') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Key::Interrupt
            }
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        };
        Some(key)
    }
}

/// Raw mode for as long as the guard lives
struct RawModeGuard {
    was_enabled: bool,
}

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        let was_enabled = terminal::is_raw_mode_enabled()?;
        if !was_enabled {
            terminal::enable_raw_mode()?;
        }
        Ok(Self { was_enabled })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.was_enabled {
            return;
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Blocking single-key reader
pub struct InputReader {
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
}

impl InputReader {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Block until one key is pressed, with the terminal in raw mode for the
    /// duration of the call. Returns `None` once a stop has been requested.
    pub fn read_key(&self) -> io::Result<Option<Key>> {
        let _raw = RawModeGuard::enable()?;

        loop {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(None);
            }
            // poll only bounds the wait so the stop flag gets checked
            if !event::poll(self.poll_interval)? {
                continue;
            }
            if let Event::Key(key_event) = event::read()? {
                if let Some(key) = Key::from_event(key_event) {
                    return Ok(Some(key));
                }
            }
        }
    }
}

/// Anything the control loop can pull keys from
pub trait KeySource {
    /// Next key, or `None` once the source is exhausted or stopped
    fn next_key(&mut self) -> impl Future<Output = io::Result<Option<Key>>>;
}

/// Keys from the terminal, one blocking read at a time
///
/// Each read runs on the blocking pool. A read that is still in flight when
/// the caller stops waiting is kept and resumed by the next call, so no key
/// is lost and the terminal is never left in raw mode behind our back.
pub struct TerminalKeys {
    reader: Arc<InputReader>,
    pending: Option<JoinHandle<io::Result<Option<Key>>>>,
}

impl TerminalKeys {
    pub fn new(reader: InputReader) -> Self {
        Self {
            reader: Arc::new(reader),
            pending: None,
        }
    }

    /// Stop any in-flight read and wait for it to restore the terminal
    pub async fn close(mut self) -> io::Result<()> {
        self.reader.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            debug!("Waiting for pending key read to finish");
            handle.await.map_err(io::Error::other)??;
        }
        Ok(())
    }
}

impl KeySource for TerminalKeys {
    async fn next_key(&mut self) -> io::Result<Option<Key>> {
        let handle = self.pending.get_or_insert_with(|| {
            let reader = self.reader.clone();
            task::spawn_blocking(move || reader.read_key())
        });
        let joined = handle.await;
        self.pending = None;
        joined.map_err(io::Error::other)?
    }
}

// Lets keys come from another task (and from tests) instead of a terminal
impl KeySource for mpsc::Receiver<Key> {
    async fn next_key(&mut self) -> io::Result<Option<Key>> {
        Ok(self.recv().await)
    }
}

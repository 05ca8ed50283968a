//! Terminal event loop.
//!
//! A background thread polls crossterm and forwards key presses, resizes and
//! periodic ticks over a channel, so the main loop can block on one source.

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self as term, KeyEvent, KeyEventKind};

/// Events the main loop reacts to.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

/// Owns the polling thread's receiving end.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    /// Starts polling with the given tick rate in milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if term::poll(timeout).unwrap_or(false) {
                    let forwarded = match term::read() {
                        // Windows reports both press and release
                        Ok(term::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Ok(term::Event::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    };
                    if let Some(event) = forwarded {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    /// Blocks until the next event.
    ///
    /// # Errors
    ///
    /// Returns an error if the polling thread has stopped.
    pub fn next(&self) -> Result<Event> {
        self.rx
            .recv()
            .map_err(|e| eyre!("event thread stopped: {e}"))
    }
}

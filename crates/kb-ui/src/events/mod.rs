//! Event handling

use anyhow::Result;
use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input
    Input(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Nothing happened within the poll interval
    Tick,
}

impl Event {
    /// Map a terminal event; key releases and mouse events become ticks
    pub fn from_terminal(event: event::Event) -> Self {
        match event {
            event::Event::Key(key) if key.kind != KeyEventKind::Release => Event::Input(key),
            event::Event::Resize(w, h) => Event::Resize(w, h),
            _ => Event::Tick,
        }
    }
}

/// Wait up to `timeout` for the next event
pub fn next(timeout: Duration) -> Result<Event> {
    if event::poll(timeout)? {
        Ok(Event::from_terminal(event::read()?))
    } else {
        Ok(Event::Tick)
    }
}

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Polls the terminal for key presses between carousel frames.
///
/// The poll window doubles as the frame pacing: when it expires without
/// input the run loop falls through to the next carousel frame. Resize
/// needs no handling of its own since every iteration redraws.
pub struct KeyPoller {
    frame_budget: Duration,
}

impl KeyPoller {
    pub fn new(frame_budget: Duration) -> Self {
        Self { frame_budget }
    }

    /// Wait up to one frame budget for a key press.
    ///
    /// Returns `None` on timeout and for input the carousel does not react
    /// to (key releases, mouse, focus).
    pub fn next_key(&self) -> Result<Option<KeyEvent>> {
        if !event::poll(self.frame_budget)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

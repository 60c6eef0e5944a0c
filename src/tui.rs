use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::time::{Interval, MissedTickBehavior};

use crate::event::Event;

pub fn init() -> Result<DefaultTerminal> {
    ratatui::try_init().context("Failed to initialize terminal")
}

pub fn restore() -> Result<()> {
    ratatui::try_restore().context("Failed to restore terminal")
}

/// Merges terminal input with a periodic tick so spinners and the modal
/// key timeout advance without input.
pub struct EventHandler {
    stream: EventStream,
    tick: Interval,
}

impl EventHandler {
    pub fn new(tick_ms: u64) -> Self {
        let mut tick = tokio::time::interval(Duration::from_millis(tick_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            tick,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Ok(Event::Tick),
                maybe_event = self.stream.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => return Ok(Event::Resize),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => anyhow::bail!("Terminal event stream closed"),
                    }
                }
            }
        }
    }
}

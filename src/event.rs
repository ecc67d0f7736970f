use crate::model::types::{Level, Observation, Station, Trange};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Data loaded off the terminal thread, posted back to the event loop
#[derive(Debug)]
pub enum DataEvent {
  /// Fresh option lists plus the observations matching the current filters
  Snapshot {
    levels: Vec<Level>,
    tranges: Vec<Trange>,
    reports: Vec<String>,
    observations: Vec<Observation>,
  },
  /// Fresh station list
  Stations(Vec<Station>),
}

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// A background load finished
  Data(DataEvent),
  /// A background load failed
  Error(String),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let key_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if key_tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if key_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender for background tasks to post data and errors with
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

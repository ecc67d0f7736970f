use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{DataEvent, Event, EventHandler};
use crate::model::store::Store;
use crate::model::{FilterModel, Model};
use crate::ui;
use crate::ui::components::{
  ChoiceEvent, KeyResult, LevelSource, LevelsChoice, ReportChoice, ReportSource, TrangeChoice,
  TrangeSource,
};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// Current view. The data itself lives on the model; views only track
/// cursor position and whether a load is in flight.
#[derive(Debug)]
pub enum ViewState {
  ObservationList { selected: usize, loading: bool },
  StationList { selected: usize, loading: bool },
}

impl Default for ViewState {
  fn default() -> Self {
    ViewState::ObservationList {
      selected: 0,
      loading: true,
    }
  }
}

/// Main application state
pub struct App {
  /// Loaded data, option lists, and the active query record
  model: Model,

  /// Database handle, cloned into background loads
  store: Store,

  /// Current view
  view: ViewState,

  /// Current input mode
  mode: Mode,

  /// Filter choice overlays, one per query dimension
  levels_choice: LevelsChoice<Model>,
  trange_choice: TrangeChoice<Model>,
  report_choice: ReportChoice<Model>,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// Database path, for the header
  database_path: PathBuf,

  /// Event sender for background loads
  event_tx: mpsc::UnboundedSender<Event>,

  /// Last load error, shown in the status bar until the next key press
  status: Option<String>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, store: Store, database_path: PathBuf) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      model: Model::new(),
      store,
      view: ViewState::default(),
      mode: Mode::Normal,
      levels_choice: LevelsChoice::new(LevelSource),
      trange_choice: TrangeChoice::new(TrangeSource),
      report_choice: ReportChoice::new(ReportSource),
      command_input: String::new(),
      selected_suggestion: 0,
      config,
      database_path,
      event_tx: tx,
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(self.config.tick_rate_ms));
    self.event_tx = events.sender();

    // Initial data load
    self.reload_snapshot();
    self.reload_stations();

    // Main loop
    while !self.should_quit {
      self.sync_choices();

      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event)?;
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  /// Reload the option lists and the filtered observations in the
  /// background, posting the result back as a single snapshot.
  fn reload_snapshot(&mut self) {
    if let ViewState::ObservationList { loading, .. } = &mut self.view {
      *loading = true;
    }
    let store = self.store.clone();
    let record = self.model.record().clone();
    let tx = self.event_tx.clone();

    tokio::task::spawn_blocking(move || {
      let load = || -> Result<DataEvent> {
        Ok(DataEvent::Snapshot {
          levels: store.distinct_levels()?,
          tranges: store.distinct_tranges()?,
          reports: store.distinct_reports()?,
          observations: store.search(&record)?,
        })
      };
      let event = match load() {
        Ok(data) => Event::Data(data),
        Err(e) => Event::Error(e.to_string()),
      };
      let _ = tx.send(event);
    });
  }

  fn reload_stations(&mut self) {
    if let ViewState::StationList { loading, .. } = &mut self.view {
      *loading = true;
    }
    let store = self.store.clone();
    let tx = self.event_tx.clone();

    tokio::task::spawn_blocking(move || {
      let event = match store.stations() {
        Ok(stations) => Event::Data(DataEvent::Stations(stations)),
        Err(e) => Event::Error(e.to_string()),
      };
      let _ = tx.send(event);
    });
  }

  /// Let each choice widget catch up with the model. A no-op for widgets
  /// whose data topic has not changed since their last sync.
  fn sync_choices(&mut self) {
    self
      .levels_choice
      .sync_with(&self.model, self.model.record());
    self
      .trange_choice
      .sync_with(&self.model, self.model.record());
    self
      .report_choice
      .sync_with(&self.model, self.model.record());
  }

  fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Data(data) => self.handle_data(data),
      Event::Error(msg) => {
        tracing::error!(error = %msg, "background load failed");
        self.status = Some(msg);
        if let ViewState::ObservationList { loading, .. } | ViewState::StationList { loading, .. } =
          &mut self.view
        {
          *loading = false;
        }
      }
    }
    Ok(())
  }

  fn handle_data(&mut self, data: DataEvent) {
    match data {
      DataEvent::Snapshot {
        levels,
        tranges,
        reports,
        observations,
      } => {
        let reports: Vec<String> = reports
          .into_iter()
          .filter(|r| !self.config.hide_reports.contains(&r.to_lowercase()))
          .collect();
        self.model.set_levels(levels);
        self.model.set_tranges(tranges);
        self.model.set_reports(reports);
        self.model.set_observations(observations);

        if let ViewState::ObservationList { selected, loading } = &mut self.view {
          *selected = (*selected).min(self.model.observations().len().saturating_sub(1));
          *loading = false;
        }
      }
      DataEvent::Stations(stations) => {
        self.model.set_stations(stations);
        if let ViewState::StationList { selected, loading } = &mut self.view {
          *selected = (*selected).min(self.model.stations().len().saturating_sub(1));
          *loading = false;
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status = None;

    // An open choice overlay is modal: it sees every key first
    if self.levels_choice.is_active() {
      if let KeyResult::Event(ChoiceEvent::FilterApplied) =
        self.levels_choice.handle_key(key, &mut self.model)
      {
        self.reload_snapshot();
      }
      return;
    }
    if self.trange_choice.is_active() {
      if let KeyResult::Event(ChoiceEvent::FilterApplied) =
        self.trange_choice.handle_key(key, &mut self.model)
      {
        self.reload_snapshot();
      }
      return;
    }
    if self.report_choice.is_active() {
      if let KeyResult::Event(ChoiceEvent::FilterApplied) =
        self.report_choice.handle_key(key, &mut self.model)
      {
        self.reload_snapshot();
      }
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        self.should_quit = true;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Filter choices
      KeyCode::Char('l') => self.levels_choice.show(),
      KeyCode::Char('t') => self.trange_choice.show(),
      KeyCode::Char('p') => self.report_choice.show(),

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => self.enter_selected(),

      // Data
      KeyCode::Char('r') => {
        self.reload_snapshot();
        self.reload_stations();
      }
      KeyCode::Char('c') => {
        self.model.clear_filters();
        self.reload_snapshot();
      }

      // Mode switch
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Execute either the selected suggestion or the direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if let Some(suggestion) = suggestions.get(self.selected_suggestion) {
      suggestion.name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "observations" => {
        self.view = ViewState::ObservationList {
          selected: 0,
          loading: true,
        };
        self.reload_snapshot();
      }
      "stations" => {
        self.view = ViewState::StationList {
          selected: 0,
          loading: true,
        };
        self.reload_stations();
      }
      "reset" => {
        self.model.clear_filters();
        self.reload_snapshot();
      }
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        // Unknown command
      }
    }
    self.command_input.clear();
  }

  fn move_selection(&mut self, delta: i32) {
    let len = match &self.view {
      ViewState::ObservationList { .. } => self.model.observations().len(),
      ViewState::StationList { .. } => self.model.stations().len(),
    };
    if len == 0 {
      return;
    }
    match &mut self.view {
      ViewState::ObservationList { selected, .. } | ViewState::StationList { selected, .. } => {
        *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
      }
    }
  }

  /// Enter on a station narrows the query to that station and jumps to
  /// the observation view
  fn enter_selected(&mut self) {
    if let ViewState::StationList { selected, .. } = &self.view {
      if let Some(station) = self.model.stations().get(*selected) {
        self.model.set_station_filter(Some(station.id));
        self.view = ViewState::ObservationList {
          selected: 0,
          loading: true,
        };
        self.reload_snapshot();
      }
    }
  }

  // Accessors for UI rendering
  pub fn view(&self) -> &ViewState {
    &self.view
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn model(&self) -> &Model {
    &self.model
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  pub fn database(&self) -> &PathBuf {
    &self.database_path
  }

  pub fn title(&self) -> &str {
    self.config.title.as_deref().unwrap_or("observations")
  }

  pub fn levels_choice(&self) -> &LevelsChoice<Model> {
    &self.levels_choice
  }

  pub fn trange_choice(&self) -> &TrangeChoice<Model> {
    &self.trange_choice
  }

  pub fn report_choice(&self) -> &ReportChoice<Model> {
    &self.report_choice
  }
}

//! Reusable drop-down filter choice.
//!
//! Each query dimension (levels, time ranges, reports) provides a
//! `ChoiceSource`; the generic `QueryChoice` does everything else: it
//! rebuilds its option list when the source's data topic changes, mirrors
//! the model's active filter into the selection, and writes the user's
//! pick back through the source. Mirroring happens under `SyncState::
//! Updating`, during which write-backs are suppressed so that reflecting
//! model state into the widget can never echo into the model.

use super::KeyResult;
use crate::model::record::QueryRecord;
use crate::model::{DataTopic, FilterModel};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use std::marker::PhantomData;

/// One selectable entry: a label and the filter value it applies.
/// `value: None` is the no-filter sentinel (the "All ..." entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption<V> {
  pub label: String,
  pub value: Option<V>,
}

/// Whether the widget is taking user selections or mirroring model state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
  /// User interaction enabled, selections write to the model
  #[default]
  Idle,
  /// Options/selection are being rebuilt from the model; writes suppressed
  Updating,
}

/// Option list and filter plumbing for one query dimension
pub trait ChoiceSource<M: FilterModel> {
  type Value: Clone + PartialEq;

  /// Data category this choice tracks
  fn topic(&self) -> DataTopic;

  /// Overlay title
  fn title(&self) -> &'static str;

  /// Build the full option list, no-filter entry first.
  /// Must be a pure function of the model's current data.
  fn read_options(&self, model: &M) -> Vec<ChoiceOption<Self::Value>>;

  /// Filter value currently set on the given query record
  fn read_filter(&self, model: &M, record: &QueryRecord) -> Option<Self::Value>;

  /// Apply a new filter value; None clears the filter
  fn apply_filter(&self, model: &mut M, value: Option<Self::Value>);
}

/// Events emitted by a query choice that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceEvent {
  /// A selection was written to the model; the result set is stale
  FilterApplied,
  /// Overlay closed without touching the model
  Cancelled,
}

/// Drop-down choice overlay, generic over:
/// - `S`: the choice source (e.g. LevelSource)
/// - `M`: the model type the source works against
#[derive(Debug, Clone)]
pub struct QueryChoice<S, M>
where
  S: ChoiceSource<M>,
  M: FilterModel,
{
  source: S,
  options: Vec<ChoiceOption<S::Value>>,
  selected: usize,
  sync: SyncState,
  seen_generation: Option<u64>,
  active: bool,
  _model: PhantomData<M>,
}

impl<S, M> Default for QueryChoice<S, M>
where
  S: ChoiceSource<M> + Default,
  M: FilterModel,
{
  fn default() -> Self {
    Self::new(S::default())
  }
}

impl<S, M> QueryChoice<S, M>
where
  S: ChoiceSource<M>,
  M: FilterModel,
{
  pub fn new(source: S) -> Self {
    Self {
      source,
      options: Vec::new(),
      selected: 0,
      sync: SyncState::Idle,
      seen_generation: None,
      active: false,
      _model: PhantomData,
    }
  }

  /// Check if the overlay is currently open
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Current sync state (read-only; transitions are owned by the widget)
  pub fn sync_state(&self) -> SyncState {
    self.sync
  }

  pub fn options(&self) -> &[ChoiceOption<S::Value>] {
    &self.options
  }

  /// Open the overlay
  pub fn show(&mut self) {
    self.active = true;
  }

  /// Close the overlay
  pub fn hide(&mut self) {
    self.active = false;
  }

  /// Rebuild options and mirror the model's filter into the selection.
  ///
  /// Options are rebuilt only when the source's data topic generation
  /// moved since the last sync; the selection is re-mirrored whenever it
  /// no longer matches the filter on the record, which also covers filter
  /// changes made outside this widget (clearing all filters, narrowing to
  /// a station). Returns whether anything changed. The whole sync runs
  /// under `Updating`, so nothing in here can write back to the model.
  pub fn sync_with(&mut self, model: &M, record: &QueryRecord) -> bool {
    let generation = model.generation(self.source.topic());
    let filter = self.source.read_filter(model, record);
    let stale_options = self.seen_generation != Some(generation);

    if !stale_options && self.mirror_index(&filter) == self.selected {
      return false;
    }

    self.sync = SyncState::Updating;
    if stale_options {
      self.options = self.source.read_options(model);
    }
    self.selected = self.mirror_index(&filter);
    self.sync = SyncState::Idle;
    self.seen_generation = Some(generation);
    true
  }

  /// Option index the given filter value maps to.
  /// Unset filter, or a value no longer offered: fall back to "All".
  fn mirror_index(&self, filter: &Option<S::Value>) -> usize {
    match filter {
      None => 0,
      Some(value) => self
        .options
        .iter()
        .position(|opt| opt.value.as_ref() == Some(value))
        .unwrap_or(0),
    }
  }

  /// Write the selected option's value to the model.
  ///
  /// Guard: a no-op while `Updating`, for any selection index. Otherwise
  /// applies exactly one setter call: the no-filter sentinel clears the
  /// filter, any other value sets it. Returns whether a write happened.
  pub fn selected(&mut self, model: &mut M) -> bool {
    if self.sync == SyncState::Updating {
      return false;
    }
    let value = self
      .options
      .get(self.selected)
      .and_then(|opt| opt.value.clone());
    self.source.apply_filter(model, value);
    true
  }

  /// Handle a key event. Only consumes keys while the overlay is open.
  pub fn handle_key(&mut self, key: KeyEvent, model: &mut M) -> KeyResult<ChoiceEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(ChoiceEvent::Cancelled)
      }
      KeyCode::Enter => {
        if self.selected(model) {
          self.hide();
          KeyResult::Event(ChoiceEvent::FilterApplied)
        } else {
          KeyResult::Handled
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.navigate(1);
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.navigate(-1);
        KeyResult::Handled
      }
      // The overlay is modal: swallow everything else
      _ => KeyResult::Handled,
    }
  }

  fn navigate(&mut self, direction: i32) {
    if self.options.is_empty() {
      return;
    }
    let len = self.options.len();
    self.selected = if direction > 0 {
      (self.selected + 1) % len
    } else if self.selected == 0 {
      len - 1
    } else {
      self.selected - 1
    };
  }

  /// Render the choice overlay if open
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let max_label_len = self
      .options
      .iter()
      .map(|opt| opt.label.len())
      .max()
      .unwrap_or(10);
    let width = (max_label_len as u16 + 6)
      .min(area.width.saturating_sub(4))
      .max(24);
    let height = (self.options.len() as u16 + 2)
      .min(area.height.saturating_sub(4))
      .max(3);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.source.title()));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .options
      .iter()
      .map(|opt| {
        let line = Line::from(vec![Span::styled(
          opt.label.clone(),
          Style::default().fg(Color::Cyan),
        )]);
        ListItem::new(line)
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::types::Level;
  use crate::model::Model;
  use crate::ui::components::levels_choice::LevelSource;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn model_with_levels(levels: Vec<Level>) -> Model {
    let mut model = Model::new();
    model.set_levels(levels);
    model
  }

  fn synced_choice(model: &Model) -> QueryChoice<LevelSource, Model> {
    let mut choice = QueryChoice::new(LevelSource);
    let record = model.record().clone();
    choice.sync_with(model, &record);
    choice
  }

  #[test]
  fn test_sync_rebuilds_only_when_generation_moves() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    let mut choice = QueryChoice::new(LevelSource);
    let record = model.record().clone();

    assert!(choice.sync_with(&model, &record));
    assert!(!choice.sync_with(&model, &record));

    model.set_levels(vec![Level::new(1, 0, 0, 0), Level::new(2, 0, 0, 0)]);
    assert!(choice.sync_with(&model, &record));
    assert_eq!(choice.options().len(), 3);
  }

  #[test]
  fn test_sync_mirrors_active_filter() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(103, 2000, 0, 0)]);
    model.set_level_filter(Some(Level::new(103, 2000, 0, 0)));

    let choice = synced_choice(&model);
    assert_eq!(choice.selected, 2);
    assert_eq!(choice.sync_state(), SyncState::Idle);
  }

  #[test]
  fn test_sync_remirrors_after_filters_cleared_elsewhere() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(103, 2000, 0, 0)]);
    model.set_level_filter(Some(Level::new(103, 2000, 0, 0)));

    let mut choice = synced_choice(&model);
    assert_eq!(choice.selected, 2);

    // Filter dropped through another path: the levels topic is untouched
    model.clear_filters();
    let record = model.record().clone();

    assert!(choice.sync_with(&model, &record));
    assert_eq!(choice.selected, 0);
    assert_eq!(choice.options().len(), 3);
  }

  #[test]
  fn test_sync_remirrors_after_filter_set_elsewhere() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(2, 0, 0, 0)]);
    let mut choice = synced_choice(&model);
    assert_eq!(choice.selected, 0);

    model.set_level_filter(Some(Level::new(2, 0, 0, 0)));
    let record = model.record().clone();

    assert!(choice.sync_with(&model, &record));
    assert_eq!(choice.selected, 2);
    // Already in sync: nothing left to do
    assert!(!choice.sync_with(&model, &record));
  }

  #[test]
  fn test_sync_falls_back_to_all_when_filter_value_gone() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    model.set_level_filter(Some(Level::new(9, 9, 9, 9)));

    let choice = synced_choice(&model);
    assert_eq!(choice.selected, 0);
  }

  #[test]
  fn test_selected_is_noop_while_updating() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(2, 0, 0, 0)]);
    let mut choice = synced_choice(&model);

    choice.sync = SyncState::Updating;
    // For any selection index, no model mutation happens
    for index in 0..choice.options().len() {
      choice.selected = index;
      let generation = model.generation(DataTopic::Observations);
      assert!(!choice.selected(&mut model));
      assert_eq!(model.generation(DataTopic::Observations), generation);
      assert_eq!(model.record().level, None);
    }
  }

  #[test]
  fn test_enter_applies_filter_exactly_once() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(2, 0, 0, 0)]);
    let mut choice = synced_choice(&model);
    choice.show();

    choice.handle_key(key(KeyCode::Down), &mut model);
    let generation = model.generation(DataTopic::Observations);
    let result = choice.handle_key(key(KeyCode::Enter), &mut model);

    assert_eq!(result, KeyResult::Event(ChoiceEvent::FilterApplied));
    assert!(!choice.is_active());
    assert_eq!(model.record().level, Some(Level::new(1, 0, 0, 0)));
    // Exactly one setter call: one generation bump
    assert_eq!(model.generation(DataTopic::Observations), generation + 1);
  }

  #[test]
  fn test_escape_cancels_without_writing() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    let mut choice = synced_choice(&model);
    choice.show();
    choice.handle_key(key(KeyCode::Down), &mut model);

    let generation = model.generation(DataTopic::Observations);
    let result = choice.handle_key(key(KeyCode::Esc), &mut model);

    assert_eq!(result, KeyResult::Event(ChoiceEvent::Cancelled));
    assert!(!choice.is_active());
    assert_eq!(model.generation(DataTopic::Observations), generation);
  }

  #[test]
  fn test_navigation_wraps() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    let mut choice = synced_choice(&model);
    choice.show();

    // Two options: "All levels" + one level
    assert_eq!(choice.selected, 0);
    choice.handle_key(key(KeyCode::Char('j')), &mut model);
    assert_eq!(choice.selected, 1);
    choice.handle_key(key(KeyCode::Char('j')), &mut model);
    assert_eq!(choice.selected, 0);
    choice.handle_key(key(KeyCode::Char('k')), &mut model);
    assert_eq!(choice.selected, 1);
  }

  #[test]
  fn test_closed_overlay_ignores_keys() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    let mut choice = synced_choice(&model);

    let result = choice.handle_key(key(KeyCode::Enter), &mut model);
    assert_eq!(result, KeyResult::NotHandled);
    assert_eq!(model.record().level, None);
  }
}

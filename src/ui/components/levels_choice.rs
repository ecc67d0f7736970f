//! Level filter choice: "All levels" plus one entry per known level.

use super::query_choice::{ChoiceOption, ChoiceSource, QueryChoice};
use crate::model::record::QueryRecord;
use crate::model::types::Level;
use crate::model::{DataTopic, FilterModel};

/// Source for the vertical level dimension.
///
/// Labels are the four level components joined by commas with no spaces,
/// one option per level in the model's order. Duplicate levels from the
/// model are kept as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelSource;

impl<M: FilterModel> ChoiceSource<M> for LevelSource {
  type Value = Level;

  fn topic(&self) -> DataTopic {
    DataTopic::Levels
  }

  fn title(&self) -> &'static str {
    "Levels"
  }

  fn read_options(&self, model: &M) -> Vec<ChoiceOption<Level>> {
    let mut options = Vec::with_capacity(model.levels().len() + 1);
    options.push(ChoiceOption {
      label: "All levels".to_string(),
      value: None,
    });
    for level in model.levels() {
      options.push(ChoiceOption {
        label: level.to_string(),
        value: Some(*level),
      });
    }
    options
  }

  fn read_filter(&self, model: &M, record: &QueryRecord) -> Option<Level> {
    model.level_filter(record)
  }

  fn apply_filter(&self, model: &mut M, value: Option<Level>) {
    model.set_level_filter(value);
  }
}

/// Drop-down choice for the level filter
pub type LevelsChoice<M> = QueryChoice<LevelSource, M>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Model;
  use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn model_with_levels(levels: Vec<Level>) -> Model {
    let mut model = Model::new();
    model.set_levels(levels);
    model
  }

  #[test]
  fn test_options_are_all_levels_then_each_level() {
    let model = model_with_levels(vec![Level::new(0, 0, 0, 0), Level::new(1, 0, 0, 1)]);
    let options = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);

    assert_eq!(
      options,
      vec![
        ChoiceOption {
          label: "All levels".to_string(),
          value: None,
        },
        ChoiceOption {
          label: "0,0,0,0".to_string(),
          value: Some(Level::new(0, 0, 0, 0)),
        },
        ChoiceOption {
          label: "1,0,0,1".to_string(),
          value: Some(Level::new(1, 0, 0, 1)),
        },
      ]
    );
  }

  #[test]
  fn test_option_count_is_levels_plus_one() {
    for n in 0..4 {
      let levels: Vec<Level> = (0..n).map(|i| Level::new(i, 0, 0, 0)).collect();
      let model = model_with_levels(levels);
      let options = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
      assert_eq!(options.len(), n as usize + 1);
      assert_eq!(options[0].label, "All levels");
      assert_eq!(options[0].value, None);
    }
  }

  #[test]
  fn test_label_format() {
    let model = model_with_levels(vec![Level::new(1, 2, 3, 4)]);
    let options = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
    assert_eq!(options[1].label, "1,2,3,4");
  }

  #[test]
  fn test_read_options_is_idempotent() {
    let model = model_with_levels(vec![Level::new(103, 2000, 0, 0), Level::new(1, 0, 0, 0)]);
    let first = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
    let second = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
    assert_eq!(first, second);
  }

  #[test]
  fn test_duplicate_levels_are_kept() {
    let model = model_with_levels(vec![Level::new(1, 0, 0, 0), Level::new(1, 0, 0, 0)]);
    let options = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
    assert_eq!(options.len(), 3);
    assert_eq!(options[1], options[2]);
  }

  #[test]
  fn test_selecting_all_levels_clears_the_filter() {
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0)]);
    model.set_level_filter(Some(Level::new(1, 0, 0, 0)));

    let mut choice = LevelsChoice::new(LevelSource);
    let record = model.record().clone();
    choice.sync_with(&model, &record);
    choice.show();

    // sync_with mirrored the selection to the level entry; move to "All"
    choice.handle_key(key(KeyCode::Char('k')), &mut model);
    let generation = model.generation(DataTopic::Observations);
    choice.handle_key(key(KeyCode::Enter), &mut model);

    assert_eq!(model.record().level, None);
    assert_eq!(model.generation(DataTopic::Observations), generation + 1);
  }

  #[test]
  fn test_selecting_a_level_sets_that_exact_level() {
    let level = Level::new(103, 2000, 0, 0);
    let mut model = model_with_levels(vec![Level::new(1, 0, 0, 0), level]);

    let mut choice = LevelsChoice::new(LevelSource);
    let record = model.record().clone();
    choice.sync_with(&model, &record);
    choice.show();

    // Navigate to the second level entry and accept it
    choice.handle_key(key(KeyCode::Down), &mut model);
    choice.handle_key(key(KeyCode::Down), &mut model);
    let generation = model.generation(DataTopic::Observations);
    choice.handle_key(key(KeyCode::Enter), &mut model);

    assert_eq!(model.record().level, Some(level));
    assert_eq!(model.generation(DataTopic::Observations), generation + 1);
  }

  #[test]
  fn test_empty_level_list_still_offers_all_levels() {
    let model = Model::new();
    let options = <LevelSource as ChoiceSource<Model>>::read_options(&LevelSource, &model);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, "All levels");
  }
}

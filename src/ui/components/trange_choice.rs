//! Time range filter choice: "All time ranges" plus one entry per known trange.

use super::query_choice::{ChoiceOption, ChoiceSource, QueryChoice};
use crate::model::record::QueryRecord;
use crate::model::types::Trange;
use crate::model::{DataTopic, FilterModel};

/// Source for the time range dimension
#[derive(Debug, Clone, Copy, Default)]
pub struct TrangeSource;

impl<M: FilterModel> ChoiceSource<M> for TrangeSource {
  type Value = Trange;

  fn topic(&self) -> DataTopic {
    DataTopic::Tranges
  }

  fn title(&self) -> &'static str {
    "Time ranges"
  }

  fn read_options(&self, model: &M) -> Vec<ChoiceOption<Trange>> {
    let mut options = Vec::with_capacity(model.tranges().len() + 1);
    options.push(ChoiceOption {
      label: "All time ranges".to_string(),
      value: None,
    });
    for trange in model.tranges() {
      options.push(ChoiceOption {
        label: trange.to_string(),
        value: Some(*trange),
      });
    }
    options
  }

  fn read_filter(&self, model: &M, record: &QueryRecord) -> Option<Trange> {
    model.trange_filter(record)
  }

  fn apply_filter(&self, model: &mut M, value: Option<Trange>) {
    model.set_trange_filter(value);
  }
}

/// Drop-down choice for the time range filter
pub type TrangeChoice<M> = QueryChoice<TrangeSource, M>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Model;

  #[test]
  fn test_options_start_with_all_time_ranges() {
    let mut model = Model::new();
    model.set_tranges(vec![Trange::new(254, 0, 0), Trange::new(0, 0, 86400)]);

    let options = <TrangeSource as ChoiceSource<Model>>::read_options(&TrangeSource, &model);
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].label, "All time ranges");
    assert_eq!(options[0].value, None);
    assert_eq!(options[1].label, "254,0,0");
    assert_eq!(options[2].label, "0,0,86400");
  }

  #[test]
  fn test_apply_sets_trange_filter() {
    let mut model = Model::new();
    let trange = Trange::new(0, 0, 3600);

    <TrangeSource as ChoiceSource<Model>>::apply_filter(&TrangeSource, &mut model, Some(trange));
    assert_eq!(model.record().trange, Some(trange));

    <TrangeSource as ChoiceSource<Model>>::apply_filter(&TrangeSource, &mut model, None);
    assert_eq!(model.record().trange, None);
  }
}

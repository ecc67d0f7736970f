//! Report filter choice: "All reports" plus one entry per report memo.

use super::query_choice::{ChoiceOption, ChoiceSource, QueryChoice};
use crate::model::record::QueryRecord;
use crate::model::{DataTopic, FilterModel};

/// Source for the report (rep_memo) dimension
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSource;

impl<M: FilterModel> ChoiceSource<M> for ReportSource {
  type Value = String;

  fn topic(&self) -> DataTopic {
    DataTopic::Reports
  }

  fn title(&self) -> &'static str {
    "Reports"
  }

  fn read_options(&self, model: &M) -> Vec<ChoiceOption<String>> {
    let mut options = Vec::with_capacity(model.reports().len() + 1);
    options.push(ChoiceOption {
      label: "All reports".to_string(),
      value: None,
    });
    for report in model.reports() {
      options.push(ChoiceOption {
        label: report.clone(),
        value: Some(report.clone()),
      });
    }
    options
  }

  fn read_filter(&self, model: &M, record: &QueryRecord) -> Option<String> {
    model.report_filter(record)
  }

  fn apply_filter(&self, model: &mut M, value: Option<String>) {
    model.set_report_filter(value);
  }
}

/// Drop-down choice for the report filter
pub type ReportChoice<M> = QueryChoice<ReportSource, M>;

pub mod import;
pub mod record;
pub mod store;
pub mod types;

use record::QueryRecord;
use types::{Level, Observation, Station, Trange};

/// Data categories the UI registers interest in.
///
/// Each topic has a generation counter on the model; a widget remembers the
/// generation it last saw and rebuilds when the counter moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTopic {
  Levels,
  Tranges,
  Reports,
  Observations,
  Stations,
}

const TOPIC_COUNT: usize = 5;

fn topic_index(topic: DataTopic) -> usize {
  match topic {
    DataTopic::Levels => 0,
    DataTopic::Tranges => 1,
    DataTopic::Reports => 2,
    DataTopic::Observations => 3,
    DataTopic::Stations => 4,
  }
}

/// Contract between the query choice widgets and the model.
///
/// Widgets only ever talk to the model through this trait: option lists
/// come from the getters, the displayed selection from the `*_filter`
/// readers, and user selections go back through the setters.
pub trait FilterModel {
  /// Known levels, in the order they should be offered
  fn levels(&self) -> &[Level];
  /// Known time ranges, in the order they should be offered
  fn tranges(&self) -> &[Trange];
  /// Known report memos, in the order they should be offered
  fn reports(&self) -> &[String];

  /// Level filter currently set on the given query record
  fn level_filter(&self, record: &QueryRecord) -> Option<Level>;
  /// Set or clear (None) the level filter
  fn set_level_filter(&mut self, level: Option<Level>);

  /// Time range filter currently set on the given query record
  fn trange_filter(&self, record: &QueryRecord) -> Option<Trange>;
  /// Set or clear (None) the time range filter
  fn set_trange_filter(&mut self, trange: Option<Trange>);

  /// Report filter currently set on the given query record
  fn report_filter(&self, record: &QueryRecord) -> Option<String>;
  /// Set or clear (None) the report filter
  fn set_report_filter(&mut self, report: Option<String>);

  /// Current generation of a data topic
  fn generation(&self, topic: DataTopic) -> u64;
}

/// In-memory snapshot of the loaded data plus the active query record.
///
/// The store refreshes the snapshot through the `set_*` data methods;
/// filter changes arrive through the `FilterModel` setters. Either path
/// bumps the generation of the topics it invalidates.
#[derive(Debug, Default)]
pub struct Model {
  levels: Vec<Level>,
  tranges: Vec<Trange>,
  reports: Vec<String>,
  observations: Vec<Observation>,
  stations: Vec<Station>,
  record: QueryRecord,
  generations: [u64; TOPIC_COUNT],
}

impl Model {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self) -> &QueryRecord {
    &self.record
  }

  pub fn observations(&self) -> &[Observation] {
    &self.observations
  }

  pub fn stations(&self) -> &[Station] {
    &self.stations
  }

  /// Replace the known levels, bumping the topic generation on change
  pub fn set_levels(&mut self, levels: Vec<Level>) {
    if self.levels != levels {
      self.levels = levels;
      self.bump(DataTopic::Levels);
    }
  }

  pub fn set_tranges(&mut self, tranges: Vec<Trange>) {
    if self.tranges != tranges {
      self.tranges = tranges;
      self.bump(DataTopic::Tranges);
    }
  }

  pub fn set_reports(&mut self, reports: Vec<String>) {
    if self.reports != reports {
      self.reports = reports;
      self.bump(DataTopic::Reports);
    }
  }

  /// Replace the filtered observation list. Always bumps: the result set
  /// is what every reload is about, even when it comes back identical.
  pub fn set_observations(&mut self, observations: Vec<Observation>) {
    self.observations = observations;
    self.bump(DataTopic::Observations);
  }

  pub fn set_stations(&mut self, stations: Vec<Station>) {
    self.stations = stations;
    self.bump(DataTopic::Stations);
  }

  /// Set or clear the station filter
  pub fn set_station_filter(&mut self, station: Option<i64>) {
    self.record.station = station;
    self.bump(DataTopic::Observations);
  }

  /// Drop every filter from the query record
  pub fn clear_filters(&mut self) {
    if !self.record.is_empty() {
      self.record.clear();
      self.bump(DataTopic::Observations);
    }
  }

  fn bump(&mut self, topic: DataTopic) {
    self.generations[topic_index(topic)] += 1;
  }
}

impl FilterModel for Model {
  fn levels(&self) -> &[Level] {
    &self.levels
  }

  fn tranges(&self) -> &[Trange] {
    &self.tranges
  }

  fn reports(&self) -> &[String] {
    &self.reports
  }

  fn level_filter(&self, record: &QueryRecord) -> Option<Level> {
    record.level
  }

  fn set_level_filter(&mut self, level: Option<Level>) {
    self.record.level = level;
    self.bump(DataTopic::Observations);
  }

  fn trange_filter(&self, record: &QueryRecord) -> Option<Trange> {
    record.trange
  }

  fn set_trange_filter(&mut self, trange: Option<Trange>) {
    self.record.trange = trange;
    self.bump(DataTopic::Observations);
  }

  fn report_filter(&self, record: &QueryRecord) -> Option<String> {
    record.report.clone()
  }

  fn set_report_filter(&mut self, report: Option<String>) {
    self.record.report = report;
    self.bump(DataTopic::Observations);
  }

  fn generation(&self, topic: DataTopic) -> u64 {
    self.generations[topic_index(topic)]
  }
}

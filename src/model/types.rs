use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// Vertical level of an observation: two (type, value) pairs.
///
/// Formats as the four components joined by commas with no spaces,
/// e.g. `103,2000,0,0`. This is the canonical label form used by the
/// level choice and the observation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level {
  pub ltype1: i32,
  pub l1: i32,
  pub ltype2: i32,
  pub l2: i32,
}

impl Level {
  pub fn new(ltype1: i32, l1: i32, ltype2: i32, l2: i32) -> Self {
    Self {
      ltype1,
      l1,
      ltype2,
      l2,
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{},{},{}", self.ltype1, self.l1, self.ltype2, self.l2)
  }
}

impl Ord for Level {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .ltype1
      .cmp(&other.ltype1)
      .then(self.l1.cmp(&other.l1))
      .then(self.ltype2.cmp(&other.ltype2))
      .then(self.l2.cmp(&other.l2))
  }
}

impl PartialOrd for Level {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// Time range of an observation: period indicator plus two offsets in seconds.
///
/// Formats as the three components joined by commas, e.g. `254,0,0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trange {
  pub pind: i32,
  pub p1: i32,
  pub p2: i32,
}

impl Trange {
  pub fn new(pind: i32, p1: i32, p2: i32) -> Self {
    Self { pind, p1, p2 }
  }
}

impl fmt::Display for Trange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{},{}", self.pind, self.p1, self.p2)
  }
}

impl Ord for Trange {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .pind
      .cmp(&other.pind)
      .then(self.p1.cmp(&other.p1))
      .then(self.p2.cmp(&other.p2))
  }
}

impl PartialOrd for Trange {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// A single observed value
#[derive(Debug, Clone)]
pub struct Observation {
  pub station_id: i64,
  /// Report memo identifying the ingestion source (e.g. "synop", "temp")
  pub report: String,
  /// Variable code, e.g. "B12101" (temperature)
  pub varcode: String,
  pub level: Level,
  pub trange: Trange,
  pub datetime: NaiveDateTime,
  /// Values are kept string-typed; interpretation depends on the varcode
  pub value: String,
}

/// An observing station
#[derive(Debug, Clone)]
pub struct Station {
  pub id: i64,
  pub lat: f64,
  pub lon: f64,
  /// Mobile station identifier; None for fixed stations
  pub ident: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_level_display() {
    assert_eq!(Level::new(1, 2, 3, 4).to_string(), "1,2,3,4");
    assert_eq!(Level::new(0, 0, 0, 0).to_string(), "0,0,0,0");
    assert_eq!(Level::new(103, 2000, 0, 0).to_string(), "103,2000,0,0");
  }

  #[test]
  fn test_level_display_negative_components() {
    // Nothing in the format inserts spaces or reorders components
    assert_eq!(Level::new(-1, 0, -1, 0).to_string(), "-1,0,-1,0");
  }

  #[test]
  fn test_level_ordering() {
    let mut levels = vec![
      Level::new(103, 2000, 0, 0),
      Level::new(1, 0, 0, 0),
      Level::new(103, 10, 0, 0),
    ];
    levels.sort();
    assert_eq!(levels[0], Level::new(1, 0, 0, 0));
    assert_eq!(levels[1], Level::new(103, 10, 0, 0));
    assert_eq!(levels[2], Level::new(103, 2000, 0, 0));
  }

  #[test]
  fn test_trange_display() {
    assert_eq!(Trange::new(254, 0, 0).to_string(), "254,0,0");
    assert_eq!(Trange::new(0, 0, 86400).to_string(), "0,0,86400");
  }

  #[test]
  fn test_trange_ordering() {
    assert!(Trange::new(0, 0, 0) < Trange::new(0, 0, 1));
    assert!(Trange::new(1, 0, 0) > Trange::new(0, 9, 9));
  }
}

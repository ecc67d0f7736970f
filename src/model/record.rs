use super::types::{Level, Trange};

/// The active query filters.
///
/// A cleared field means "no constraint" on that dimension. The record is
/// what choice widgets read their displayed selection from, and what the
/// store turns into WHERE clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRecord {
  pub level: Option<Level>,
  pub trange: Option<Trange>,
  pub report: Option<String>,
  pub station: Option<i64>,
  pub varcode: Option<String>,
}

impl QueryRecord {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when no filter is set on any dimension
  pub fn is_empty(&self) -> bool {
    self.level.is_none()
      && self.trange.is_none()
      && self.report.is_none()
      && self.station.is_none()
      && self.varcode.is_none()
  }

  /// Drop every filter
  pub fn clear(&mut self) {
    *self = Self::default();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_record_is_empty() {
    assert!(QueryRecord::new().is_empty());
  }

  #[test]
  fn test_any_field_makes_record_non_empty() {
    let mut rec = QueryRecord::new();
    rec.level = Some(Level::new(1, 0, 0, 0));
    assert!(!rec.is_empty());

    let mut rec = QueryRecord::new();
    rec.report = Some("synop".to_string());
    assert!(!rec.is_empty());
  }

  #[test]
  fn test_clear() {
    let mut rec = QueryRecord::new();
    rec.level = Some(Level::new(1, 0, 0, 0));
    rec.trange = Some(Trange::new(254, 0, 0));
    rec.clear();
    assert!(rec.is_empty());
  }
}

//! SQLite-backed observation store.
//!
//! The store is the durable side of the model: the UI never touches it
//! directly, it only sees the snapshots the app loads from here on a
//! blocking task. The connection is shared behind a mutex so those tasks
//! can clone the handle.

use super::record::QueryRecord;
use super::types::{Level, Observation, Station, Trange};
use chrono::NaiveDateTime;
use color_eyre::{eyre::eyre, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Cap on rows returned by a single observation query
const MAX_RESULTS: usize = 1000;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Schema for the observation tables.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS station (
    id INTEGER PRIMARY KEY,
    lat REAL NOT NULL,
    lon REAL NOT NULL,
    ident TEXT
);

CREATE TABLE IF NOT EXISTS observation (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_id INTEGER NOT NULL,
    report TEXT NOT NULL,
    varcode TEXT NOT NULL,
    ltype1 INTEGER NOT NULL,
    l1 INTEGER NOT NULL,
    ltype2 INTEGER NOT NULL,
    l2 INTEGER NOT NULL,
    pind INTEGER NOT NULL,
    p1 INTEGER NOT NULL,
    p2 INTEGER NOT NULL,
    datetime TEXT NOT NULL,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observation_level
    ON observation(ltype1, l1, ltype2, l2);

CREATE INDEX IF NOT EXISTS idx_observation_datetime
    ON observation(datetime);
"#;

/// Handle to the observation database. Cheap to clone.
#[derive(Clone)]
pub struct Store {
  conn: Arc<Mutex<Connection>>,
}

impl Store {
  /// Open or create the database at the given path
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Open or create the database at the default location
  pub fn open_default() -> Result<Self> {
    Self::open(&Self::default_path()?)
  }

  /// Open an in-memory database (tests)
  pub fn open_in_memory() -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::from_connection(conn)
  }

  /// Default database path: $XDG_DATA_HOME/osserva/observations.db
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("osserva").join("observations.db"))
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Arc::new(Mutex::new(conn)),
    };
    store.run_migrations()?;
    Ok(store)
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self.lock()?;
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
    Ok(())
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  /// Insert observations in a single transaction, returning the count
  pub fn insert_observations(&self, observations: &[Observation]) -> Result<usize> {
    let mut conn = self.lock()?;
    let tx = conn
      .transaction()
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    {
      let mut stmt = tx
        .prepare(
          "INSERT INTO observation
             (station_id, report, varcode, ltype1, l1, ltype2, l2, pind, p1, p2, datetime, value)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| eyre!("Failed to prepare insert: {}", e))?;

      for obs in observations {
        stmt
          .execute(params![
            obs.station_id,
            obs.report,
            obs.varcode,
            obs.level.ltype1,
            obs.level.l1,
            obs.level.ltype2,
            obs.level.l2,
            obs.trange.pind,
            obs.trange.p1,
            obs.trange.p2,
            obs.datetime.format(DATETIME_FORMAT).to_string(),
            obs.value,
          ])
          .map_err(|e| eyre!("Failed to insert observation: {}", e))?;
      }
    }

    tx.commit()
      .map_err(|e| eyre!("Failed to commit observations: {}", e))?;
    Ok(observations.len())
  }

  /// Insert or replace a station record
  pub fn upsert_station(&self, station: &Station) -> Result<()> {
    let conn = self.lock()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO station (id, lat, lon, ident) VALUES (?, ?, ?, ?)",
        params![station.id, station.lat, station.lon, station.ident],
      )
      .map_err(|e| eyre!("Failed to upsert station {}: {}", station.id, e))?;
    Ok(())
  }

  /// Distinct levels present in the database, in level order
  pub fn distinct_levels(&self) -> Result<Vec<Level>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare(
        "SELECT DISTINCT ltype1, l1, ltype2, l2 FROM observation
         ORDER BY ltype1, l1, ltype2, l2",
      )
      .map_err(|e| eyre!("Failed to prepare level query: {}", e))?;

    let rows = stmt
      .query_map([], |row| {
        Ok(Level::new(
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
        ))
      })
      .map_err(|e| eyre!("Failed to query levels: {}", e))?;

    rows
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read level row: {}", e))
  }

  /// Distinct time ranges present in the database, in trange order
  pub fn distinct_tranges(&self) -> Result<Vec<Trange>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare("SELECT DISTINCT pind, p1, p2 FROM observation ORDER BY pind, p1, p2")
      .map_err(|e| eyre!("Failed to prepare trange query: {}", e))?;

    let rows = stmt
      .query_map([], |row| {
        Ok(Trange::new(row.get(0)?, row.get(1)?, row.get(2)?))
      })
      .map_err(|e| eyre!("Failed to query tranges: {}", e))?;

    rows
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read trange row: {}", e))
  }

  /// Distinct report memos present in the database, alphabetically
  pub fn distinct_reports(&self) -> Result<Vec<String>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare("SELECT DISTINCT report FROM observation ORDER BY report")
      .map_err(|e| eyre!("Failed to prepare report query: {}", e))?;

    let rows = stmt
      .query_map([], |row| row.get(0))
      .map_err(|e| eyre!("Failed to query reports: {}", e))?;

    rows
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read report row: {}", e))
  }

  /// All known stations, by id
  pub fn stations(&self) -> Result<Vec<Station>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare("SELECT id, lat, lon, ident FROM station ORDER BY id")
      .map_err(|e| eyre!("Failed to prepare station query: {}", e))?;

    let rows = stmt
      .query_map([], |row| {
        Ok(Station {
          id: row.get(0)?,
          lat: row.get(1)?,
          lon: row.get(2)?,
          ident: row.get(3)?,
        })
      })
      .map_err(|e| eyre!("Failed to query stations: {}", e))?;

    rows
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read station row: {}", e))
  }

  /// Observations matching the query record, newest first
  pub fn search(&self, record: &QueryRecord) -> Result<Vec<Observation>> {
    let mut sql = String::from(
      "SELECT station_id, report, varcode, ltype1, l1, ltype2, l2, pind, p1, p2, datetime, value
       FROM observation",
    );
    let mut clauses: Vec<&str> = Vec::new();
    let mut bindings: Vec<Value> = Vec::new();

    if let Some(level) = record.level {
      clauses.push("ltype1 = ? AND l1 = ? AND ltype2 = ? AND l2 = ?");
      bindings.push(Value::from(level.ltype1));
      bindings.push(Value::from(level.l1));
      bindings.push(Value::from(level.ltype2));
      bindings.push(Value::from(level.l2));
    }
    if let Some(trange) = record.trange {
      clauses.push("pind = ? AND p1 = ? AND p2 = ?");
      bindings.push(Value::from(trange.pind));
      bindings.push(Value::from(trange.p1));
      bindings.push(Value::from(trange.p2));
    }
    if let Some(ref report) = record.report {
      clauses.push("report = ?");
      bindings.push(Value::from(report.clone()));
    }
    if let Some(station) = record.station {
      clauses.push("station_id = ?");
      bindings.push(Value::from(station));
    }
    if let Some(ref varcode) = record.varcode {
      clauses.push("varcode = ?");
      bindings.push(Value::from(varcode.clone()));
    }

    if !clauses.is_empty() {
      sql.push_str(" WHERE ");
      sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY datetime DESC, station_id, varcode LIMIT ?");
    bindings.push(Value::from(MAX_RESULTS as i64));

    let conn = self.lock()?;
    let mut stmt = conn
      .prepare(&sql)
      .map_err(|e| eyre!("Failed to prepare observation query: {}", e))?;

    let rows = stmt
      .query_map(params_from_iter(bindings), |row| {
        let datetime: String = row.get(10)?;
        let datetime = NaiveDateTime::parse_from_str(&datetime, DATETIME_FORMAT).map_err(|e| {
          rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Observation {
          station_id: row.get(0)?,
          report: row.get(1)?,
          varcode: row.get(2)?,
          level: Level::new(row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?),
          trange: Trange::new(row.get(7)?, row.get(8)?, row.get(9)?),
          datetime,
          value: row.get(11)?,
        })
      })
      .map_err(|e| eyre!("Failed to query observations: {}", e))?;

    rows
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read observation row: {}", e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn datetime(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
      .unwrap()
      .and_hms_opt(h, 0, 0)
      .unwrap()
  }

  fn observation(level: Level, report: &str, h: u32) -> Observation {
    Observation {
      station_id: 1,
      report: report.to_string(),
      varcode: "B12101".to_string(),
      level,
      trange: Trange::new(254, 0, 0),
      datetime: datetime(h),
      value: "295.15".to_string(),
    }
  }

  #[test]
  fn test_distinct_levels_sorted_and_deduplicated() {
    let store = Store::open_in_memory().unwrap();
    store
      .insert_observations(&[
        observation(Level::new(103, 2000, 0, 0), "synop", 0),
        observation(Level::new(1, 0, 0, 0), "synop", 1),
        observation(Level::new(103, 2000, 0, 0), "temp", 2),
      ])
      .unwrap();

    let levels = store.distinct_levels().unwrap();
    assert_eq!(
      levels,
      vec![Level::new(1, 0, 0, 0), Level::new(103, 2000, 0, 0)]
    );
  }

  #[test]
  fn test_search_unfiltered_returns_all_newest_first() {
    let store = Store::open_in_memory().unwrap();
    store
      .insert_observations(&[
        observation(Level::new(1, 0, 0, 0), "synop", 6),
        observation(Level::new(1, 0, 0, 0), "synop", 12),
      ])
      .unwrap();

    let result = store.search(&QueryRecord::new()).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].datetime, datetime(12));
    assert_eq!(result[1].datetime, datetime(6));
  }

  #[test]
  fn test_search_by_level() {
    let store = Store::open_in_memory().unwrap();
    store
      .insert_observations(&[
        observation(Level::new(1, 0, 0, 0), "synop", 0),
        observation(Level::new(103, 2000, 0, 0), "synop", 1),
      ])
      .unwrap();

    let mut record = QueryRecord::new();
    record.level = Some(Level::new(103, 2000, 0, 0));

    let result = store.search(&record).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].level, Level::new(103, 2000, 0, 0));
  }

  #[test]
  fn test_search_by_report_and_level() {
    let store = Store::open_in_memory().unwrap();
    store
      .insert_observations(&[
        observation(Level::new(1, 0, 0, 0), "synop", 0),
        observation(Level::new(1, 0, 0, 0), "temp", 1),
        observation(Level::new(103, 2000, 0, 0), "temp", 2),
      ])
      .unwrap();

    let mut record = QueryRecord::new();
    record.level = Some(Level::new(1, 0, 0, 0));
    record.report = Some("temp".to_string());

    let result = store.search(&record).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].report, "temp");
    assert_eq!(result[0].datetime, datetime(1));
  }

  #[test]
  fn test_stations_roundtrip() {
    let store = Store::open_in_memory().unwrap();
    store
      .upsert_station(&Station {
        id: 7,
        lat: 44.5,
        lon: 11.3,
        ident: None,
      })
      .unwrap();
    store
      .upsert_station(&Station {
        id: 3,
        lat: 45.4,
        lon: 12.3,
        ident: Some("ship42".to_string()),
      })
      .unwrap();

    let stations = store.stations().unwrap();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].id, 3);
    assert_eq!(stations[0].ident.as_deref(), Some("ship42"));
    assert_eq!(stations[1].id, 7);
  }

  #[test]
  fn test_empty_database_has_no_options() {
    let store = Store::open_in_memory().unwrap();
    assert!(store.distinct_levels().unwrap().is_empty());
    assert!(store.distinct_tranges().unwrap().is_empty());
    assert!(store.distinct_reports().unwrap().is_empty());
  }
}

//! CSV import for observation files.
//!
//! Row format, one observation per line:
//!
//! ```text
//! station_id,lat,lon,ident,report,datetime,varcode,ltype1,l1,ltype2,l2,pind,p1,p2,value
//! ```
//!
//! Fields may be double-quoted; a doubled quote inside a quoted field is a
//! literal quote. A header line repeating the column names is skipped.

use super::store::Store;
use super::types::{Level, Observation, Station, Trange};
use chrono::NaiveDateTime;
use color_eyre::{eyre::eyre, Result};
use std::path::Path;

const FIELD_COUNT: usize = 15;

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
  pub observations: usize,
  pub stations: usize,
}

/// Import a CSV file into the store.
///
/// The whole file is parsed before anything is written, so a malformed
/// line leaves the database untouched.
pub fn import_file(store: &Store, path: &Path) -> Result<ImportStats> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;

  let mut observations = Vec::new();
  let mut stations: Vec<Station> = Vec::new();

  for (lineno, line) in contents.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    if lineno == 0 && line.starts_with("station_id") {
      continue;
    }

    let (station, observation) =
      parse_row(line).map_err(|e| eyre!("{}:{}: {}", path.display(), lineno + 1, e))?;

    if !stations.iter().any(|s| s.id == station.id) {
      stations.push(station);
    }
    observations.push(observation);
  }

  for station in &stations {
    store.upsert_station(station)?;
  }
  let inserted = store.insert_observations(&observations)?;

  tracing::info!(
    observations = inserted,
    stations = stations.len(),
    file = %path.display(),
    "import finished"
  );

  Ok(ImportStats {
    observations: inserted,
    stations: stations.len(),
  })
}

fn parse_row(line: &str) -> Result<(Station, Observation)> {
  let fields = split_line(line);
  if fields.len() != FIELD_COUNT {
    return Err(eyre!(
      "expected {} fields, found {}",
      FIELD_COUNT,
      fields.len()
    ));
  }

  let station = Station {
    id: parse_int(&fields[0], "station_id")?,
    lat: parse_float(&fields[1], "lat")?,
    lon: parse_float(&fields[2], "lon")?,
    ident: if fields[3].is_empty() {
      None
    } else {
      Some(fields[3].clone())
    },
  };

  let datetime = NaiveDateTime::parse_from_str(&fields[5], "%Y-%m-%d %H:%M:%S")
    .map_err(|e| eyre!("bad datetime {:?}: {}", fields[5], e))?;

  let observation = Observation {
    station_id: station.id,
    report: fields[4].clone(),
    varcode: fields[6].clone(),
    level: Level::new(
      parse_i32(&fields[7], "ltype1")?,
      parse_i32(&fields[8], "l1")?,
      parse_i32(&fields[9], "ltype2")?,
      parse_i32(&fields[10], "l2")?,
    ),
    trange: Trange::new(
      parse_i32(&fields[11], "pind")?,
      parse_i32(&fields[12], "p1")?,
      parse_i32(&fields[13], "p2")?,
    ),
    datetime,
    value: fields[14].clone(),
  };

  Ok((station, observation))
}

fn parse_int(field: &str, name: &str) -> Result<i64> {
  field
    .parse()
    .map_err(|e| eyre!("bad {} {:?}: {}", name, field, e))
}

fn parse_i32(field: &str, name: &str) -> Result<i32> {
  field
    .parse()
    .map_err(|e| eyre!("bad {} {:?}: {}", name, field, e))
}

fn parse_float(field: &str, name: &str) -> Result<f64> {
  field
    .parse()
    .map_err(|e| eyre!("bad {} {:?}: {}", name, field, e))
}

/// Split one CSV line into unescaped fields
fn split_line(line: &str) -> Vec<String> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;
  let mut chars = line.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        // Doubled quote inside a quoted field is a literal quote
        if chars.peek() == Some(&'"') {
          chars.next();
          current.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' => in_quotes = true,
      ',' if !in_quotes => {
        fields.push(std::mem::take(&mut current));
      }
      _ => current.push(c),
    }
  }
  fields.push(current);
  fields
}

use crate::config::ColumnConfig;
use crate::error::DataError;
use crate::types::Incident;
use csv::ReaderBuilder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The loaded dataset. Write-once: built by `load`, read-only afterwards.
#[derive(Debug)]
pub struct IncidentTable {
    incidents: Vec<Incident>,
    year_bounds: Option<(i32, i32)>,
}

impl IncidentTable {
    pub fn load(path: &Path, columns: &ColumnConfig) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, columns)
    }

    /// Parse the table from any CSV reader. `load` wraps this with file
    /// opening; tests feed it in-memory strings.
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Self, DataError> {
        let mut rdr = ReaderBuilder::new().from_reader(reader);
        let headers = rdr.headers()?.clone();

        // Resolve every required column up front so a bad export fails at
        // startup with the column named, not row by row.
        let col = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let region_idx = col(&columns.region)?;
        let country_idx = col(&columns.country)?;
        let provstate_idx = col(&columns.provstate)?;
        let city_idx = col(&columns.city)?;
        let year_idx = col(&columns.year)?;
        let lat_idx = col(&columns.latitude)?;
        let lon_idx = col(&columns.longitude)?;
        let kill_idx = col(&columns.kill)?;
        let wound_idx = col(&columns.wound)?;
        let attack_idx = col(&columns.attack_type)?;

        let mut incidents = Vec::new();

        for result in rdr.records() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();

            // A row without a parseable year can't land in any view; skip it.
            let year: i32 = match field(year_idx).parse() {
                Ok(y) => y,
                Err(_) => continue,
            };

            incidents.push(Incident {
                region: field(region_idx).to_string(),
                country: field(country_idx).to_string(),
                provstate: field(provstate_idx).to_string(),
                city: field(city_idx).to_string(),
                year,
                latitude: parse_coord(field(lat_idx)),
                longitude: parse_coord(field(lon_idx)),
                kill: parse_count(field(kill_idx)),
                wound: parse_count(field(wound_idx)),
                attack: parse_count(field(attack_idx)),
            });
        }

        let year_bounds = incidents
            .iter()
            .map(|i| i.year)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
                None => Some((y, y)),
            });

        Ok(IncidentTable {
            incidents,
            year_bounds,
        })
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Unique region names, for the region selector.
    pub fn regions(&self) -> BTreeSet<&str> {
        self.incidents.iter().map(|i| i.region.as_str()).collect()
    }

    /// Unique countries with at least one row in `region`.
    /// Empty set for a region the table has never seen.
    pub fn countries_in(&self, region: &str) -> BTreeSet<&str> {
        self.incidents
            .iter()
            .filter(|i| i.region == region)
            .map(|i| i.country.as_str())
            .collect()
    }

    /// Min/max year across the table, `None` when the table is empty.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }
}

/// Count cells in the source table are floats with gaps: "", "5", "5.0".
/// Anything unparseable or negative counts as zero.
fn parse_count(raw: &str) -> u32 {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.round() as u32,
        _ => 0,
    }
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

use crate::data::IncidentTable;
use crate::error::DataError;
use std::collections::HashMap;

/// Country name to representative coordinates, used to center the map view
/// when a country is selected.
#[derive(Debug)]
pub struct LocationIndex {
    coords: HashMap<String, (f64, f64)>,
}

impl LocationIndex {
    /// Collapse the table to one coordinate pair per country. Later rows win;
    /// rows without coordinates don't contribute.
    pub fn build(table: &IncidentTable) -> Self {
        let mut coords = HashMap::new();
        for incident in table.incidents() {
            if let (Some(lat), Some(lon)) = (incident.latitude, incident.longitude) {
                coords.insert(incident.country.clone(), (lat, lon));
            }
        }
        LocationIndex { coords }
    }

    pub fn lookup(&self, country: &str) -> Result<(f64, f64), DataError> {
        self.coords
            .get(country)
            .copied()
            .ok_or_else(|| DataError::UnknownCountry(country.to_string()))
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

use crate::data::IncidentTable;
use crate::types::{Filter, Incident};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Summed counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub kill: u64,
    pub wound: u64,
    /// Sum of attack-type codes, not a count of attacks. The source column is
    /// categorical and downstream charts sum it anyway; preserved as-is.
    pub attack: u64,
}

impl Totals {
    fn absorb(&mut self, incident: &Incident) {
        self.kill += u64::from(incident.kill);
        self.wound += u64::from(incident.wound);
        self.attack += u64::from(incident.attack);
    }
}

/// One map-view group: all filtered rows sharing the full geo tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRow {
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub totals: Totals,
}

/// One trend/share-view group: all filtered rows sharing (region, country, year).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRow {
    pub region: String,
    pub country: String,
    pub year: i32,
    #[serde(flatten)]
    pub totals: Totals,
}

fn matches(incident: &Incident, filter: &Filter) -> bool {
    // An unset country matches nothing: the region had no countries to pick
    // a default from, and every view renders empty.
    let Some(country) = filter.country.as_deref() else {
        return false;
    };
    incident.region == filter.region
        && incident.country == country
        && incident.year >= filter.year_min
        && incident.year <= filter.year_max
}

// f64 coordinates keyed by their bit pattern. Two groups are the same group
// exactly when the source cells were byte-identical, which is how the
// table-collapse in the source data behaves.
#[derive(PartialEq, Eq, Hash)]
struct GeoKey<'a> {
    provstate: &'a str,
    city: &'a str,
    year: i32,
    lat_bits: u64,
    lon_bits: u64,
}

/// Group the filtered rows by the full geo tuple and sum their counts.
/// Rows without coordinates can't be placed on the map and are excluded.
/// Output is sorted by (year, provstate, city, latitude, longitude), so a
/// fixed table and filter always reproduce the same payload.
pub fn by_location(table: &IncidentTable, filter: &Filter) -> Vec<GeoRow> {
    let mut groups: HashMap<GeoKey, Totals> = HashMap::new();

    for incident in table.incidents() {
        if !matches(incident, filter) {
            continue;
        }
        let (Some(lat), Some(lon)) = (incident.latitude, incident.longitude) else {
            continue;
        };
        let key = GeoKey {
            provstate: &incident.provstate,
            city: &incident.city,
            year: incident.year,
            lat_bits: lat.to_bits(),
            lon_bits: lon.to_bits(),
        };
        groups.entry(key).or_default().absorb(incident);
    }

    let country = filter.country.clone().unwrap_or_default();
    let mut rows: Vec<GeoRow> = groups
        .into_iter()
        .map(|(key, totals)| GeoRow {
            region: filter.region.clone(),
            country: country.clone(),
            provstate: key.provstate.to_string(),
            city: key.city.to_string(),
            year: key.year,
            latitude: f64::from_bits(key.lat_bits),
            longitude: f64::from_bits(key.lon_bits),
            totals,
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.year, &a.provstate, &a.city)
            .cmp(&(b.year, &b.provstate, &b.city))
            .then(a.latitude.total_cmp(&b.latitude))
            .then(a.longitude.total_cmp(&b.longitude))
    });

    rows
}

/// Group the filtered rows by year and sum their counts, sorted by year.
pub fn by_year(table: &IncidentTable, filter: &Filter) -> Vec<YearRow> {
    let mut groups: BTreeMap<i32, Totals> = BTreeMap::new();

    for incident in table.incidents() {
        if matches(incident, filter) {
            groups.entry(incident.year).or_default().absorb(incident);
        }
    }

    let country = filter.country.clone().unwrap_or_default();
    groups
        .into_iter()
        .map(|(year, totals)| YearRow {
            region: filter.region.clone(),
            country: country.clone(),
            year,
            totals,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;

    fn table(rows: &str) -> IncidentTable {
        let csv = format!(
            "iyear,region_txt,country_txt,provstate,city,latitude,longitude,nkill,nwound,attacktype1\n{rows}"
        );
        IncidentTable::from_reader(csv.as_bytes(), &ColumnConfig::default()).unwrap()
    }

    fn south_asia_table() -> IncidentTable {
        table(
            "2010,South Asia,India,Punjab,Amritsar,31.63,74.87,5,2,1\n\
             2011,South Asia,India,Delhi,New Delhi,28.61,77.21,3,1,2\n\
             2010,South Asia,Pakistan,Punjab,Lahore,31.55,74.34,1,0,1\n",
        )
    }

    fn india_filter(year_min: i32, year_max: i32) -> Filter {
        Filter {
            region: "South Asia".to_string(),
            country: Some("India".to_string()),
            year_min,
            year_max,
        }
    }

    #[test]
    fn year_grouping_sums_per_year() {
        let rows = by_year(&south_asia_table(), &india_filter(2010, 2011));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2010);
        assert_eq!(rows[0].totals.kill, 5);
        assert_eq!(rows[1].year, 2011);
        assert_eq!(rows[1].totals.kill, 3);

        let kill: u64 = rows.iter().map(|r| r.totals.kill).sum();
        let wound: u64 = rows.iter().map(|r| r.totals.wound).sum();
        assert_eq!((kill, wound), (8, 3));
    }

    #[test]
    fn window_outside_data_is_empty_not_an_error() {
        let rows = by_year(&south_asia_table(), &india_filter(2012, 2012));
        assert!(rows.is_empty());

        let rows = by_location(&south_asia_table(), &india_filter(2012, 2012));
        assert!(rows.is_empty());
    }

    #[test]
    fn single_year_window_is_inclusive_on_both_ends() {
        let rows = by_year(&south_asia_table(), &india_filter(2010, 2010));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2010);
        assert_eq!(rows[0].totals.kill, 5);
    }

    #[test]
    fn unset_country_matches_nothing() {
        let filter = Filter {
            region: "South Asia".to_string(),
            country: None,
            year_min: 1970,
            year_max: 2020,
        };
        assert!(by_year(&south_asia_table(), &filter).is_empty());
        assert!(by_location(&south_asia_table(), &filter).is_empty());
    }

    #[test]
    fn location_grouping_collapses_repeat_sites() {
        let table = table(
            "2010,South Asia,India,Punjab,Amritsar,31.63,74.87,5,2,1\n\
             2010,South Asia,India,Punjab,Amritsar,31.63,74.87,2,3,1\n\
             2010,South Asia,India,Punjab,Amritsar,31.64,74.87,1,1,1\n",
        );
        let rows = by_location(&table, &india_filter(2010, 2010));

        assert_eq!(rows.len(), 2);
        // Identical coordinates merge, the nearby-but-distinct pair doesn't.
        assert_eq!(rows[0].totals.kill, 7);
        assert_eq!(rows[0].totals.wound, 5);
        assert_eq!(rows[0].totals.attack, 2);
        assert_eq!(rows[1].totals.kill, 1);
    }

    #[test]
    fn location_grouping_skips_unmapped_rows() {
        let table = table(
            "2010,South Asia,India,Punjab,Amritsar,31.63,74.87,5,2,1\n\
             2010,South Asia,India,Delhi,New Delhi,,,3,1,2\n",
        );

        let geo = by_location(&table, &india_filter(2010, 2010));
        assert_eq!(geo.len(), 1);

        // The coordinate-less row still counts toward the year views.
        let years = by_year(&table, &india_filter(2010, 2010));
        assert_eq!(years[0].totals.kill, 8);
    }

    #[test]
    fn year_and_location_totals_agree_for_mapped_data() {
        let table = south_asia_table();
        let filter = india_filter(2010, 2011);

        let by_loc = by_location(&table, &filter);
        let by_yr = by_year(&table, &filter);

        let loc_sum: u64 = by_loc.iter().map(|r| r.totals.kill + r.totals.wound).sum();
        let yr_sum: u64 = by_yr.iter().map(|r| r.totals.kill + r.totals.wound).sum();
        assert_eq!(loc_sum, yr_sum);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let table = south_asia_table();
        let filter = india_filter(2010, 2011);

        assert_eq!(by_location(&table, &filter), by_location(&table, &filter));
        assert_eq!(by_year(&table, &filter), by_year(&table, &filter));
    }

    #[test]
    fn geo_rows_serialize_with_flattened_totals() {
        let rows = by_location(&south_asia_table(), &india_filter(2010, 2010));
        let json = serde_json::to_value(&rows).unwrap();

        assert_eq!(json[0]["city"], "Amritsar");
        assert_eq!(json[0]["kill"], 5);
        assert_eq!(json[0]["wound"], 2);
        assert_eq!(json[0]["attack"], 1);
    }

    #[test]
    fn attack_codes_are_summed_not_counted() {
        let table = table(
            "2010,South Asia,India,Punjab,Amritsar,31.63,74.87,0,0,3\n\
             2010,South Asia,India,Punjab,Amritsar,31.63,74.87,0,0,9\n",
        );
        let rows = by_year(&table, &india_filter(2010, 2010));
        // Two attacks with codes 3 and 9 report 12, not 2.
        assert_eq!(rows[0].totals.attack, 12);
    }
}

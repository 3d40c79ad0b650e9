use crate::config::DashboardConfig;
use crate::data::IncidentTable;
use crate::types::Filter;

/// The three user-controlled selector values.
///
/// Changing the region recomputes the legal country set and resets the
/// country to its lexicographically first member (`BTreeSet` iteration
/// order); that rule is the contract, not an accident of the container.
/// Year changes clamp to the table's bounds and never cascade further.
#[derive(Debug, Clone)]
pub struct SelectorState {
    region: String,
    country: Option<String>,
    year_min: i32,
    year_max: i32,
}

impl SelectorState {
    pub fn new(table: &IncidentTable, defaults: &DashboardConfig) -> Self {
        let mut state = SelectorState {
            region: String::new(),
            country: None,
            year_min: defaults.default_year_min,
            year_max: defaults.default_year_max,
        };
        state.set_region(table, &defaults.default_region);
        state.set_years(table, defaults.default_year_min, defaults.default_year_max);
        state
    }

    pub fn set_region(&mut self, table: &IncidentTable, region: &str) {
        self.region = region.to_string();
        self.country = default_country(table, region);
    }

    /// Accepted only when the country belongs to the active region's set.
    pub fn set_country(&mut self, table: &IncidentTable, country: &str) {
        if table.countries_in(&self.region).contains(country) {
            self.country = Some(country.to_string());
        }
    }

    pub fn set_years(&mut self, table: &IncidentTable, a: i32, b: i32) {
        let (year_min, year_max) = normalize_years(table, a, b);
        self.year_min = year_min;
        self.year_max = year_max;
    }

    pub fn filter(&self) -> Filter {
        Filter {
            region: self.region.clone(),
            country: self.country.clone(),
            year_min: self.year_min,
            year_max: self.year_max,
        }
    }
}

/// The default country for a fresh region selection: lexicographically first
/// in the region's country set, `None` when the set is empty.
pub fn default_country(table: &IncidentTable, region: &str) -> Option<String> {
    table
        .countries_in(region)
        .into_iter()
        .next()
        .map(str::to_string)
}

/// Swap an inverted year pair, then clamp both ends to the table's bounds.
pub fn normalize_years(table: &IncidentTable, a: i32, b: i32) -> (i32, i32) {
    let (mut year_min, mut year_max) = if a <= b { (a, b) } else { (b, a) };
    if let Some((lo, hi)) = table.year_bounds() {
        year_min = year_min.clamp(lo, hi);
        year_max = year_max.clamp(lo, hi);
    }
    (year_min, year_max)
}

/// Build the filter for one stateless request: absent parameters fall back to
/// the configured defaults, an absent country resolves through the cascade,
/// and the year window is normalized. A country supplied by the caller is
/// passed through untouched; a mismatched one simply matches nothing.
pub fn resolve_filter(
    table: &IncidentTable,
    defaults: &DashboardConfig,
    region: Option<String>,
    country: Option<String>,
    year_min: Option<i32>,
    year_max: Option<i32>,
) -> Filter {
    let region = region.unwrap_or_else(|| defaults.default_region.clone());
    let country = country.or_else(|| default_country(table, &region));
    let (year_min, year_max) = normalize_years(
        table,
        year_min.unwrap_or(defaults.default_year_min),
        year_max.unwrap_or(defaults.default_year_max),
    );
    Filter {
        region,
        country,
        year_min,
        year_max,
    }
}

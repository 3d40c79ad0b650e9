/// One row of the source table. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Incident {
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: i32,
    // The source table has empty coordinate cells; such rows still count
    // toward the per-year views but never appear on the map.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub kill: u32,
    pub wound: u32,
    /// Attack-type code. Categorical in the source table, but summed like a
    /// count downstream; kept that way for output compatibility.
    pub attack: u32,
}

/// The active selection driving all three views.
///
/// `country` is unset when the selected region has no countries; every query
/// over such a filter yields an empty result. When set, membership in the
/// region is guaranteed by the selector cascade, not re-checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub region: String,
    pub country: Option<String>,
    pub year_min: i32,
    pub year_max: i32,
}

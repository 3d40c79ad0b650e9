use crate::aggregate::{GeoRow, YearRow};
use crate::location::LocationIndex;
use crate::types::Filter;
use serde::Serialize;

/// Zoom applied when the camera centers on a selected country.
const COUNTRY_ZOOM: f64 = 3.0;
/// Whole-world zoom used when no center is available.
const WORLD_ZOOM: f64 = 1.0;

/// One marker on the scatter map. `size` and `color_value` both scale with
/// the wound sum; the remaining fields feed the hover text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
    pub size: u64,
    pub color_value: u64,
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: i32,
    pub kill: u64,
    pub wound: u64,
    pub attack: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCamera {
    pub center: Option<Coord>,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub points: Vec<MapPoint>,
    pub camera: MapCamera,
}

/// Aligned series over the year axis: kills as a line, attacks and wounds as
/// stacked bars. All four arrays share the same length and ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub years: Vec<i32>,
    pub kills: Vec<u64>,
    pub attacks: Vec<u64>,
    pub wounds: Vec<u64>,
}

/// The three slices of the proportion chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ShareView {
    pub kill: u64,
    pub wound: u64,
    pub attack: u64,
}

pub fn map_view(rows: &[GeoRow], index: &LocationIndex, filter: &Filter) -> MapView {
    let points = rows
        .iter()
        .map(|row| MapPoint {
            lon: row.longitude,
            lat: row.latitude,
            size: row.totals.wound,
            color_value: row.totals.wound,
            region: row.region.clone(),
            country: row.country.clone(),
            provstate: row.provstate.clone(),
            city: row.city.clone(),
            year: row.year,
            kill: row.totals.kill,
            wound: row.totals.wound,
            attack: row.totals.attack,
        })
        .collect();

    // Center on the selected country when the index knows it; a missing
    // country (or one with no coordinates anywhere) falls back to the wide
    // view rather than failing the request.
    let camera = match filter.country.as_deref().map(|c| index.lookup(c)) {
        Some(Ok((lat, lon))) => MapCamera {
            center: Some(Coord { lat, lon }),
            zoom: COUNTRY_ZOOM,
        },
        _ => MapCamera {
            center: None,
            zoom: WORLD_ZOOM,
        },
    };

    MapView { points, camera }
}

pub fn trend_view(rows: &[YearRow]) -> TrendView {
    let mut view = TrendView {
        years: Vec::with_capacity(rows.len()),
        kills: Vec::with_capacity(rows.len()),
        attacks: Vec::with_capacity(rows.len()),
        wounds: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        view.years.push(row.year);
        view.kills.push(row.totals.kill);
        view.attacks.push(row.totals.attack);
        view.wounds.push(row.totals.wound);
    }
    view
}

pub fn share_view(rows: &[YearRow]) -> ShareView {
    rows.iter().fold(ShareView::default(), |acc, row| ShareView {
        kill: acc.kill + row.totals.kill,
        wound: acc.wound + row.totals.wound,
        attack: acc.attack + row.totals.attack,
    })
}

use crate::aggregate;
use crate::config::AppConfig;
use crate::data::IncidentTable;
use crate::location::LocationIndex;
use crate::selection;
use crate::views::{self, MapView, ShareView, TrendView};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub struct AppState {
    pub table: IncidentTable,
    pub index: LocationIndex,
    pub config: AppConfig,
}

pub async fn start_server(config: AppConfig, table: IncidentTable) -> Result<()> {
    let index = LocationIndex::build(&table);
    info!(countries = index.len(), "location index built");

    let port = config.server.port;
    let state = Arc::new(AppState {
        table,
        index,
        config,
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/meta", get(meta_handler))
        .route("/api/regions", get(regions_handler))
        .route("/api/countries", get(countries_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Serialize)]
struct MetaResponse {
    rows: usize,
    regions: Vec<String>,
    year_min: Option<i32>,
    year_max: Option<i32>,
    default_region: String,
    default_year_min: i32,
    default_year_max: i32,
}

/// Dataset summary the page needs to build its selectors.
async fn meta_handler(State(state): State<Arc<AppState>>) -> Json<MetaResponse> {
    let bounds = state.table.year_bounds();
    Json(MetaResponse {
        rows: state.table.len(),
        regions: state.table.regions().into_iter().map(String::from).collect(),
        year_min: bounds.map(|(lo, _)| lo),
        year_max: bounds.map(|(_, hi)| hi),
        default_region: state.config.dashboard.default_region.clone(),
        default_year_min: state.config.dashboard.default_year_min,
        default_year_max: state.config.dashboard.default_year_max,
    })
}

#[derive(Serialize)]
struct RegionsResponse {
    regions: Vec<String>,
}

async fn regions_handler(State(state): State<Arc<AppState>>) -> Json<RegionsResponse> {
    Json(RegionsResponse {
        regions: state.table.regions().into_iter().map(String::from).collect(),
    })
}

#[derive(Deserialize)]
struct CountriesParams {
    region: String,
}

#[derive(Serialize)]
struct CountriesResponse {
    countries: Vec<String>,
    /// The country the cascade would select for this region.
    default: Option<String>,
}

async fn countries_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountriesParams>,
) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state
            .table
            .countries_in(&params.region)
            .into_iter()
            .map(String::from)
            .collect(),
        default: selection::default_country(&state.table, &params.region),
    })
}

#[derive(Deserialize)]
struct DashboardParams {
    region: Option<String>,
    country: Option<String>,
    year_min: Option<i32>,
    year_max: Option<i32>,
}

#[derive(Serialize)]
struct DashboardResponse {
    region: String,
    country: Option<String>,
    year_min: i32,
    year_max: i32,
    map: MapView,
    trend: TrendView,
    share: ShareView,
}

/// One atomic recomputation per request: resolve the filter, aggregate at
/// both granularities, shape the three payloads. No state survives the call.
async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Json<DashboardResponse> {
    let filter = selection::resolve_filter(
        &state.table,
        &state.config.dashboard,
        params.region,
        params.country,
        params.year_min,
        params.year_max,
    );

    let geo_rows = aggregate::by_location(&state.table, &filter);
    let year_rows = aggregate::by_year(&state.table, &filter);

    Json(DashboardResponse {
        map: views::map_view(&geo_rows, &state.index, &filter),
        trend: views::trend_view(&year_rows),
        share: views::share_view(&year_rows),
        region: filter.region,
        country: filter.country,
        year_min: filter.year_min,
        year_max: filter.year_max,
    })
}
